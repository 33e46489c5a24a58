use super::{LoadContext, Materializer, Selector};
use crate::{EntityRef, JoinTree, ModelId, Query};

use graft_core::{driver::Executor, stmt::Value, trace_query, Result};
use graft_sql::{Serializer, Statement};

use indexmap::IndexSet;
use std::{cell::RefCell, rc::Rc};

/// Loads root entities by identifier through one [`JoinTree`], then
/// resolves the tree's deferred relations.
///
/// Identifiers are split into chunks no larger than the executor's `IN`
/// bound. All full chunks share one rendered statement and the remainder
/// chunk gets a second one.
#[derive(Debug, Clone)]
pub struct EntityLoader {
    tree: JoinTree,
    query: Query,
    max_in_operator_size: Option<usize>,
}

#[derive(Debug)]
pub struct Builder {
    tree: JoinTree,
    max_in_operator_size: Option<usize>,
}

impl EntityLoader {
    pub fn new(tree: JoinTree) -> EntityLoader {
        EntityLoader::builder(tree).build()
    }

    pub fn builder(tree: JoinTree) -> Builder {
        Builder {
            tree,
            max_in_operator_size: None,
        }
    }

    pub fn tree(&self) -> &JoinTree {
        &self.tree
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    /// Loads the entities with the given identifiers, in a fresh context.
    pub fn select(&self, exec: &mut dyn Executor, ids: &[Value]) -> Result<Vec<EntityRef>> {
        let mut cx = LoadContext::new();
        self.select_in(&mut cx, exec, ids)
    }

    /// Typed variant of [`select`](Self::select).
    pub fn select_as<E: 'static>(
        &self,
        exec: &mut dyn Executor,
        ids: &[Value],
    ) -> Result<Vec<Rc<RefCell<E>>>> {
        self.select(exec, ids)?
            .iter()
            .map(EntityRef::downcast::<E>)
            .collect()
    }
}

impl Selector for EntityLoader {
    fn model(&self) -> ModelId {
        self.tree.root_mapping().model()
    }

    fn select_in(
        &self,
        cx: &mut LoadContext,
        exec: &mut dyn Executor,
        ids: &[Value],
    ) -> Result<Vec<EntityRef>> {
        let ids: Vec<Value> = ids
            .iter()
            .filter(|id| !id.is_absent())
            .cloned()
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect();
        if ids.is_empty() {
            return Ok(vec![]);
        }

        let capability = exec.capability().clone();
        let bound = self
            .max_in_operator_size
            .unwrap_or(capability.max_in_operator_size)
            .max(1);
        let serializer = Serializer::new(capability.flavor);

        let mut pass = Materializer::new(&self.tree, &self.query).pass(ids.len());
        let mut variants: Vec<(usize, String)> = Vec::with_capacity(2);

        for chunk in ids.chunks(bound) {
            let sql = match variants.iter().find(|(len, _)| *len == chunk.len()) {
                Some((_, sql)) => sql.clone(),
                None => {
                    let stmt: Statement = self
                        .query
                        .select_by_ids(chunk, capability.row_value_in)
                        .into();
                    let mut scratch: Vec<Value> = vec![];
                    let sql = serializer.serialize(&stmt, &mut scratch);
                    variants.push((chunk.len(), sql.clone()));
                    sql
                }
            };

            let params: Vec<Value> = chunk
                .iter()
                .flat_map(|id| id.key_parts().iter().cloned())
                .collect();

            trace_query!(sql, params.len());
            for row in exec.exec_select(&sql, &params)? {
                pass.consume(cx, &row)?;
            }
        }

        let roots = pass.finish()?;
        cx.resolve_deferred(exec)?;
        Ok(roots)
    }

    fn identifier_of(&self, entity: &EntityRef) -> Result<Value> {
        self.tree.root_mapping().identifier_of(entity)
    }
}

impl Builder {
    /// Overrides the executor's `IN` bound.
    pub fn max_in_operator_size(mut self, max: usize) -> Builder {
        self.max_in_operator_size = Some(max);
        self
    }

    pub fn build(self) -> EntityLoader {
        let query = self.tree.build_select_query();
        EntityLoader {
            tree: self.tree,
            query,
            max_in_operator_size: self.max_in_operator_size,
        }
    }
}
