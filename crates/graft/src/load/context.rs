use super::Pending;
use crate::{join::NodeId, EntityRef, ModelId};

use graft_core::{stmt::Value, Result};

use std::{collections::HashMap, fmt};

/// State of one load call.
///
/// Holds the entity cache, which guarantees one instance per
/// `(ModelId, identifier)`, the relations already applied, and the deferred
/// relations waiting for their second select. A context is created by the outermost `select` and handed
/// down to every nested select it triggers; it is dropped when the call
/// returns, on success or on error.
#[derive(Default)]
pub struct LoadContext {
    entities: HashMap<(ModelId, Value), EntityRef>,
    applied: HashMap<AppliedKey, Vec<RelationSite>>,
    pending: Vec<Pending>,
}

/// One application of a relation fixer: parent, child and position.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct AppliedKey {
    pub(crate) parent: (ModelId, Value),
    pub(crate) child: (ModelId, Value),
    pub(crate) index: Option<Value>,
}

/// Where a relation is declared: a join node, or one of the deferred
/// relations of a node. Trees are identified by address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RelationSite {
    pub(crate) tree: usize,
    pub(crate) node: NodeId,
    pub(crate) deferred: Option<usize>,
}

impl LoadContext {
    pub fn new() -> LoadContext {
        LoadContext::default()
    }

    /// Number of distinct entities materialized so far.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn get(&self, model: ModelId, id: &Value) -> Option<&EntityRef> {
        self.entities.get(&(model, id.clone()))
    }

    /// Returns the cached entity, creating it with `instantiate` on first
    /// sight.
    pub(crate) fn resolve(
        &mut self,
        model: ModelId,
        id: Value,
        instantiate: impl FnOnce() -> Result<EntityRef>,
    ) -> Result<EntityRef> {
        use std::collections::hash_map::Entry;

        match self.entities.entry((model, id)) {
            Entry::Occupied(entry) => Ok(entry.get().clone()),
            Entry::Vacant(entry) => Ok(entry.insert(instantiate()?).clone()),
        }
    }

    /// Records the application of a relation fixer and returns `true` when
    /// it should run.
    ///
    /// Within one tree, a key seen again through the same site is a fan-out
    /// duplicate, while another site is a distinct relation between the same
    /// entities. A key already applied by another tree means a nested select
    /// reloaded an entity from the cache; its relations are not applied twice.
    pub(crate) fn mark_applied(&mut self, key: AppliedKey, site: RelationSite) -> bool {
        let sites = self.applied.entry(key).or_default();
        if sites
            .iter()
            .any(|seen| seen.tree != site.tree || *seen == site)
        {
            return false;
        }
        sites.push(site);
        true
    }

    pub(crate) fn defer(&mut self, pending: Pending) {
        self.pending.push(pending);
    }

    pub(crate) fn take_pending(&mut self) -> Vec<Pending> {
        std::mem::take(&mut self.pending)
    }
}

impl fmt::Debug for LoadContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadContext")
            .field("entities", &self.entities.len())
            .field("applied", &self.applied.len())
            .field("pending", &self.pending.len())
            .finish()
    }
}
