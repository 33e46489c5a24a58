use super::{JoinType, NodeId};
use crate::RelationFixer;

use graft_core::schema::ColumnId;

/// A column together with the node whose select list carries it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Located {
    pub(crate) column: ColumnId,
    pub(crate) node: NodeId,
}

/// Edge from a node to one of its children.
#[derive(Debug, Clone)]
pub(crate) struct JoinLink {
    /// Join column on the parent side. It may live on an ancestor of the
    /// parent when the parent is a merge node.
    pub(crate) left: Located,

    /// Join column on the child's table.
    pub(crate) right: ColumnId,

    /// Never `Auto` once the link is built.
    pub(crate) join_type: JoinType,

    pub(crate) kind: LinkKind,

    pub(crate) child: NodeId,
}

#[derive(Debug, Clone)]
pub(crate) enum LinkKind {
    /// The child is its own entity, attached to the parent by the fixer.
    /// With an index column, the fixer runs in index order.
    Relation {
        fixer: RelationFixer,
        index: Option<Located>,
    },

    /// The child's columns are folded into the parent's entity.
    Merge,

    /// Only used to reach descendants.
    Passive,
}
