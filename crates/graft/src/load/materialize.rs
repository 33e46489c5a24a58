use super::{
    context::{AppliedKey, RelationSite},
    DeferredLink, LoadContext, Pending, TargetSelector,
};
use crate::{
    join::{LinkKind, Located, NodeAliases, NodeId},
    EntityRef, JoinTree, Mapping, Query, RelationFixer, RowReader,
};

use graft_core::{driver::Row, stmt::Value, Error, Result};

use std::{
    collections::{HashMap, HashSet, VecDeque},
    sync::Arc,
};

/// Turns the rows of a [`Query`] into a graph of entities.
#[derive(Debug, Clone, Copy)]
pub struct Materializer<'a> {
    tree: &'a JoinTree,
    query: &'a Query,
}

/// Materialization state of one select, possibly spanning several chunked
/// executions.
pub(crate) struct Pass<'a> {
    tree: &'a JoinTree,
    query: &'a Query,
    transformers: HashMap<NodeId, Transformer<'a>>,
    roots: Vec<EntityRef>,
    seen_roots: HashSet<Value>,

    /// `(merge node, entity id)` already merged.
    merged: HashSet<(NodeId, Value)>,

    ordered: Vec<OrderedFix>,
}

/// A mapping bound to the aliases its node uses in one query.
#[derive(Clone, Copy)]
struct Transformer<'a> {
    mapping: &'a Arc<dyn Mapping>,
    aliases: &'a NodeAliases,
}

#[derive(Clone)]
struct Bean {
    entity: EntityRef,
    id: Value,
}

struct OrderedFix {
    node: NodeId,
    parent_id: Value,
    index: Value,
    parent: EntityRef,
    child: EntityRef,
    fixer: RelationFixer,
}

impl<'a> Materializer<'a> {
    /// `query` must have been built from `tree`.
    pub fn new(tree: &'a JoinTree, query: &'a Query) -> Materializer<'a> {
        Materializer { tree, query }
    }

    /// Materializes `rows` and returns the distinct root entities in the
    /// order they first appear.
    ///
    /// Deferred relations met on the way are recorded in `cx`; complete them
    /// with [`LoadContext::resolve_deferred`].
    pub fn transform(
        &self,
        cx: &mut LoadContext,
        rows: impl IntoIterator<Item = Row>,
        size_hint: usize,
    ) -> Result<Vec<EntityRef>> {
        let mut pass = self.pass(size_hint);
        for row in rows {
            pass.consume(cx, &row)?;
        }
        pass.finish()
    }

    pub(crate) fn pass(&self, size_hint: usize) -> Pass<'a> {
        Pass {
            tree: self.tree,
            query: self.query,
            transformers: HashMap::new(),
            roots: Vec::with_capacity(size_hint),
            seen_roots: HashSet::with_capacity(size_hint),
            merged: HashSet::new(),
            ordered: vec![],
        }
    }
}

impl<'a> Pass<'a> {
    pub(crate) fn consume(&mut self, cx: &mut LoadContext, row: &Row) -> Result<()> {
        let tree = self.tree;

        let root = self.transformer(NodeId::ROOT)?;
        let reader = root.reader(row);
        let id = root.mapping.identifier(&reader)?;
        if id.is_absent() {
            return Ok(());
        }

        let entity = cx.resolve(root.mapping.model(), id.clone(), || {
            root.mapping.instantiate(&reader)
        })?;
        if self.seen_roots.insert(id.clone()) {
            self.roots.push(entity.clone());
        }

        let mut queue = VecDeque::from([(NodeId::ROOT, Bean { entity, id })]);

        while let Some((node_id, bean)) = queue.pop_front() {
            let node = tree.node(node_id);

            for (i, deferred) in node.deferred.iter().enumerate() {
                self.record_deferred(cx, row, (node_id, i), deferred, &bean)?;
            }

            for link in &node.links {
                match &link.kind {
                    LinkKind::Passive => queue.push_back((link.child, bean.clone())),
                    LinkKind::Merge => {
                        let merge = self.transformer(link.child)?;
                        let reader = merge.reader(row);
                        if merge.mapping.identifier(&reader)?.is_absent() {
                            continue;
                        }
                        if self.merged.insert((link.child, bean.id.clone())) {
                            merge.mapping.merge(&bean.entity, &reader)?;
                        }
                        queue.push_back((link.child, bean.clone()));
                    }
                    LinkKind::Relation { fixer, index } => {
                        let child = self.transformer(link.child)?;
                        let reader = child.reader(row);
                        let id = child.mapping.identifier(&reader)?;
                        if id.is_absent() {
                            continue;
                        }

                        let entity = cx.resolve(child.mapping.model(), id.clone(), || {
                            child.mapping.instantiate(&reader)
                        })?;
                        let index = index.map(|index| self.read(row, index)).transpose()?;

                        let key = AppliedKey {
                            parent: (bean.entity.model(), bean.id.clone()),
                            child: (entity.model(), id.clone()),
                            index: index.clone(),
                        };
                        if cx.mark_applied(key, self.site(link.child, None)) {
                            match index {
                                Some(index) => self.ordered.push(OrderedFix {
                                    node: link.child,
                                    parent_id: bean.id.clone(),
                                    index,
                                    parent: bean.entity.clone(),
                                    child: entity.clone(),
                                    fixer: fixer.clone(),
                                }),
                                None => fixer.apply(&bean.entity, &entity)?,
                            }
                        }

                        queue.push_back((link.child, Bean { entity, id }));
                    }
                }
            }
        }

        Ok(())
    }

    /// Applies the buffered ordered relations and returns the roots.
    pub(crate) fn finish(mut self) -> Result<Vec<EntityRef>> {
        self.ordered.sort_by(|a, b| {
            (a.node, &a.parent_id, &a.index).cmp(&(b.node, &b.parent_id, &b.index))
        });

        for fix in &self.ordered {
            fix.fixer.apply(&fix.parent, &fix.child)?;
        }

        Ok(self.roots)
    }

    fn record_deferred(
        &mut self,
        cx: &mut LoadContext,
        row: &Row,
        (node, i): (NodeId, usize),
        deferred: &DeferredLink,
        bean: &Bean,
    ) -> Result<()> {
        let parts = deferred
            .key
            .iter()
            .map(|located| self.read(row, *located))
            .collect::<Result<Vec<_>>>()?;
        let target = Value::from_key_parts(parts);
        if target.is_absent() {
            return Ok(());
        }

        let selector = match &deferred.relation.selector {
            TargetSelector::Fixed(selector) => selector.clone(),
            TargetSelector::Discriminated { targets, .. } => {
                let Some(column) = deferred.discriminator else {
                    return Err(Error::invalid_join("discriminator column is not bound"));
                };
                let value = self.read(row, column)?;
                match targets.iter().find(|(candidate, _)| *candidate == value) {
                    Some((_, selector)) => selector.clone(),
                    None => return Err(Error::invalid_discriminator(value)),
                }
            }
        };

        let index = deferred
            .index
            .map(|located| self.read(row, located))
            .transpose()?;

        let key = AppliedKey {
            parent: (bean.entity.model(), bean.id.clone()),
            child: (selector.model(), target.clone()),
            index: index.clone(),
        };
        if !cx.mark_applied(key, self.site(node, Some(i))) {
            return Ok(());
        }

        cx.defer(Pending {
            source: bean.entity.clone(),
            source_key: bean.id.clone(),
            target,
            selector,
            fixer: deferred.relation.fixer.clone(),
            index,
        });
        Ok(())
    }

    fn site(&self, node: NodeId, deferred: Option<usize>) -> RelationSite {
        RelationSite {
            tree: self.tree as *const JoinTree as usize,
            node,
            deferred,
        }
    }

    fn transformer(&mut self, node: NodeId) -> Result<Transformer<'a>> {
        if let Some(transformer) = self.transformers.get(&node) {
            return Ok(*transformer);
        }

        let transformer = Transformer {
            mapping: self.tree.node(node).mapping()?,
            aliases: self.query.aliases(node),
        };
        self.transformers.insert(node, transformer);
        Ok(transformer)
    }

    fn read(&self, row: &Row, located: Located) -> Result<Value> {
        RowReader::new(row, self.query.aliases(located.node)).get(located.column)
    }
}

impl<'a> Transformer<'a> {
    fn reader<'r>(&self, row: &'r Row) -> RowReader<'r>
    where
        'a: 'r,
    {
        RowReader::new(row, self.aliases)
    }
}
