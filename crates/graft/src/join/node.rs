use super::{JoinLink, NodeName};
use crate::{load::DeferredLink, Mapping};

use graft_core::{
    schema::{ColumnId, Table},
    Error, Result,
};

use std::{fmt, sync::Arc};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct NodeId(pub(crate) usize);

impl NodeId {
    pub(crate) const ROOT: NodeId = NodeId(0);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NodeRole {
    Root,
    Entity,
    Merge,
    Passive,
}

#[derive(Clone)]
pub(crate) struct JoinNode {
    pub(crate) name: NodeName,
    pub(crate) table: Arc<Table>,
    pub(crate) table_alias: Option<String>,

    /// Columns selected for this node, in select order.
    pub(crate) columns: Vec<ColumnId>,

    pub(crate) mapping: Option<Arc<dyn Mapping>>,
    pub(crate) role: NodeRole,
    pub(crate) parent: Option<NodeId>,
    pub(crate) links: Vec<JoinLink>,
    pub(crate) deferred: Vec<DeferredLink>,
}

impl JoinNode {
    /// Root, relation and merge nodes all have an entity to work on. Passive
    /// nodes do not.
    pub(crate) fn has_inflater(&self) -> bool {
        self.role != NodeRole::Passive
    }

    pub(crate) fn mapping(&self) -> Result<&Arc<dyn Mapping>> {
        self.mapping
            .as_ref()
            .ok_or_else(|| Error::missing_inflater(self.name.as_str()))
    }

    pub(crate) fn select(&mut self, column: ColumnId) {
        if !self.columns.contains(&column) {
            self.columns.push(column);
        }
    }
}

impl fmt::Debug for JoinNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JoinNode")
            .field("name", &self.name)
            .field("table", &self.table.name)
            .field("role", &self.role)
            .field("columns", &self.columns)
            .field("links", &self.links)
            .finish()
    }
}
