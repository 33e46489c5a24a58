use super::LoadContext;
use crate::{join::Located, EntityRef, ModelId, RelationFixer};

use graft_core::{driver::Executor, schema::ColumnId, stmt::Value, Result};

use by_address::ByAddress;
use indexmap::{IndexMap, IndexSet};
use std::{collections::HashMap, sync::Arc};

/// Loads entities of one type by identifier.
///
/// Deferred relations hand their collected target identifiers to a
/// selector once the rows of the current select are consumed.
pub trait Selector: Send + Sync {
    fn model(&self) -> ModelId;

    /// Loads the entities with the given identifiers, sharing the caches of
    /// `cx`. Identifiers without a row are silently missing from the result.
    fn select_in(
        &self,
        cx: &mut LoadContext,
        exec: &mut dyn Executor,
        ids: &[Value],
    ) -> Result<Vec<EntityRef>>;

    fn identifier_of(&self, entity: &EntityRef) -> Result<Value>;
}

/// A relation whose targets are loaded by a second select.
///
/// Used when one join cannot produce the target: its concrete type is only
/// known from a discriminator column, or it is reached through an
/// association table row.
#[derive(Clone)]
pub struct DeferredRelation {
    /// Columns holding the target identifier.
    pub(crate) target_key: Vec<ColumnId>,
    pub(crate) selector: TargetSelector,
    pub(crate) fixer: RelationFixer,
    pub(crate) index: Option<ColumnId>,
}

#[derive(Clone)]
pub(crate) enum TargetSelector {
    Fixed(Arc<dyn Selector>),
    Discriminated {
        column: ColumnId,
        targets: Vec<(Value, Arc<dyn Selector>)>,
    },
}

/// A deferred relation attached to a node, with its columns resolved to the
/// nodes selecting them.
#[derive(Clone)]
pub(crate) struct DeferredLink {
    pub(crate) relation: DeferredRelation,
    pub(crate) key: Vec<Located>,
    pub(crate) discriminator: Option<Located>,
    pub(crate) index: Option<Located>,
}

/// One recorded `(source, target identifier, selector)` awaiting phase two.
pub(crate) struct Pending {
    pub(crate) source: EntityRef,
    pub(crate) source_key: Value,
    pub(crate) target: Value,
    pub(crate) selector: Arc<dyn Selector>,
    pub(crate) fixer: RelationFixer,
    pub(crate) index: Option<Value>,
}

impl DeferredRelation {
    pub fn new(
        target_key: Vec<ColumnId>,
        selector: Arc<dyn Selector>,
        fixer: RelationFixer,
    ) -> DeferredRelation {
        DeferredRelation {
            target_key,
            selector: TargetSelector::Fixed(selector),
            fixer,
            index: None,
        }
    }

    /// A polymorphic relation: the selector is picked by the value of
    /// `discriminator`. Register the candidates with
    /// [`target`](Self::target).
    pub fn discriminated(
        target_key: Vec<ColumnId>,
        discriminator: ColumnId,
        fixer: RelationFixer,
    ) -> DeferredRelation {
        DeferredRelation {
            target_key,
            selector: TargetSelector::Discriminated {
                column: discriminator,
                targets: vec![],
            },
            fixer,
            index: None,
        }
    }

    pub fn target(mut self, value: impl Into<Value>, selector: Arc<dyn Selector>) -> DeferredRelation {
        match &mut self.selector {
            TargetSelector::Discriminated { targets, .. } => targets.push((value.into(), selector)),
            TargetSelector::Fixed(fixed) => *fixed = selector,
        }
        self
    }

    /// Applies the fixer in the order of `index` for each source entity.
    pub fn ordered_by(mut self, index: ColumnId) -> DeferredRelation {
        self.index = Some(index);
        self
    }

    pub(crate) fn discriminator(&self) -> Option<ColumnId> {
        match &self.selector {
            TargetSelector::Discriminated { column, .. } => Some(*column),
            TargetSelector::Fixed(_) => None,
        }
    }

    pub(crate) fn set_discriminator(&mut self, discriminator: ColumnId) {
        if let TargetSelector::Discriminated { column, .. } = &mut self.selector {
            *column = discriminator;
        }
    }
}

impl LoadContext {
    /// Runs phase two: one select per distinct selector over every
    /// identifier recorded for it, then every recorded fixer.
    ///
    /// No fixer runs before all selects have completed. The first failing
    /// select aborts the whole resolution.
    pub fn resolve_deferred(&mut self, exec: &mut dyn Executor) -> Result<()> {
        let pending = self.take_pending();
        if pending.is_empty() {
            return Ok(());
        }

        let mut groups: IndexMap<ByAddress<Arc<dyn Selector>>, IndexSet<Value>> = IndexMap::new();
        let mut group_of = Vec::with_capacity(pending.len());

        for entry in &pending {
            let group = groups.entry(ByAddress(entry.selector.clone()));
            group_of.push(group.index());
            group.or_default().insert(entry.target.clone());
        }

        let mut found = Vec::with_capacity(groups.len());

        for (selector, ids) in &groups {
            let ids: Vec<Value> = ids.iter().cloned().collect();
            tracing::trace!(
                model = ?selector.model(),
                ids = ids.len(),
                "graft.deferred: loading targets"
            );

            let mut by_id = HashMap::with_capacity(ids.len());
            for entity in selector.select_in(self, exec, &ids)? {
                by_id.insert(selector.identifier_of(&entity)?, entity);
            }
            found.push(by_id);
        }

        // Unordered relations keep recording order. Ordered ones are applied
        // afterwards, per source, by index.
        let mut order: Vec<usize> = (0..pending.len())
            .filter(|i| pending[*i].index.is_none())
            .collect();
        let mut ordered: Vec<usize> = (0..pending.len())
            .filter(|i| pending[*i].index.is_some())
            .collect();
        ordered.sort_by(|a, b| {
            let (a, b) = (&pending[*a], &pending[*b]);
            (&a.source_key, &a.index).cmp(&(&b.source_key, &b.index))
        });
        order.extend(ordered);

        for i in order {
            let entry = &pending[i];
            match found[group_of[i]].get(&entry.target) {
                Some(target) => entry.fixer.apply(&entry.source, target)?,
                None => tracing::debug!(
                    id = ?entry.target,
                    "graft.deferred: target not found, relation left unset"
                ),
            }
        }

        Ok(())
    }
}
