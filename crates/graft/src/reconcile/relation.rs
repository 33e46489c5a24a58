use graft_core::{
    schema::{ColumnId, Table},
    stmt::Value,
};

use std::{fmt, sync::Arc};

/// Which side of a relation is written first.
///
/// Only inserts follow the order. Link rows are always deleted before
/// children.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum WriteOrder {
    /// Insert children, then link rows.
    #[default]
    ChildrenThenLinks,

    /// Insert link rows, then children.
    LinksThenChildren,
}

/// Association table owning a many-to-many relation.
#[derive(Debug, Clone)]
pub struct AssociationTable {
    pub table: Arc<Table>,

    /// Columns referencing the parent, matching the parent key parts.
    pub parent: Vec<ColumnId>,

    /// Columns referencing the child, matching the child key parts.
    pub child: Vec<ColumnId>,

    /// Position column of ordered relations.
    pub index: Option<ColumnId>,
}

/// Position column stored on the child table of an ordered one-to-many
/// relation. Children are addressed by the table's primary key.
#[derive(Debug, Clone)]
pub struct ChildIndex {
    pub table: Arc<Table>,
    pub column: ColumnId,
}

type Children<P, C> = Box<dyn for<'a> Fn(&'a P) -> &'a [C] + Send + Sync>;
type Reverse<P, C> = Box<dyn Fn(&mut C, Option<&P>) + Send + Sync>;

pub(crate) enum Ownership<P, C> {
    /// The child row holds the foreign key to the parent.
    Child {
        reverse: Option<Reverse<P, C>>,
        index: Option<ChildIndex>,
    },

    Association(AssociationTable),
}

/// Policy of one to-many relation.
pub struct Relation<P, C> {
    pub(crate) children: Children<P, C>,
    pub(crate) parent_id: Box<dyn Fn(&P) -> Value + Send + Sync>,
    pub(crate) child_id: Box<dyn Fn(&C) -> Value + Send + Sync>,
    pub(crate) ordered: bool,
    pub(crate) delete_removed: bool,
    pub(crate) ownership: Ownership<P, C>,
    pub(crate) write_order: WriteOrder,
}

impl AssociationTable {
    pub fn new(table: Arc<Table>, parent: Vec<ColumnId>, child: Vec<ColumnId>) -> AssociationTable {
        AssociationTable {
            table,
            parent,
            child,
            index: None,
        }
    }

    pub fn with_index(mut self, index: ColumnId) -> AssociationTable {
        self.index = Some(index);
        self
    }
}

impl<P, C> Relation<P, C> {
    /// A one-to-many relation whose children reference the parent.
    pub fn owned_by_child(
        children: impl for<'a> Fn(&'a P) -> &'a [C] + Send + Sync + 'static,
        parent_id: impl Fn(&P) -> Value + Send + Sync + 'static,
        child_id: impl Fn(&C) -> Value + Send + Sync + 'static,
    ) -> Relation<P, C> {
        Relation {
            children: Box::new(children),
            parent_id: Box::new(parent_id),
            child_id: Box::new(child_id),
            ordered: false,
            delete_removed: false,
            ownership: Ownership::Child {
                reverse: None,
                index: None,
            },
            write_order: WriteOrder::default(),
        }
    }

    /// A relation stored as rows of an association table.
    pub fn association(
        children: impl for<'a> Fn(&'a P) -> &'a [C] + Send + Sync + 'static,
        parent_id: impl Fn(&P) -> Value + Send + Sync + 'static,
        child_id: impl Fn(&C) -> Value + Send + Sync + 'static,
        table: AssociationTable,
    ) -> Relation<P, C> {
        let ordered = table.index.is_some();
        Relation {
            ordered,
            ownership: Ownership::Association(table),
            ..Relation::owned_by_child(children, parent_id, child_id)
        }
    }

    /// Sets the child's pointer back to its parent: `Some` when attached,
    /// `None` when detached from a relation that does not delete orphans.
    pub fn with_reverse(
        mut self,
        reverse: impl Fn(&mut C, Option<&P>) + Send + Sync + 'static,
    ) -> Relation<P, C> {
        if let Ownership::Child { reverse: slot, .. } = &mut self.ownership {
            *slot = Some(Box::new(reverse));
        }
        self
    }

    /// Orders a child-owned relation by a position column on the child
    /// table.
    pub fn with_index_column(mut self, index: ChildIndex) -> Relation<P, C> {
        if let Ownership::Child { index: slot, .. } = &mut self.ownership {
            *slot = Some(index);
            self.ordered = true;
        }
        self
    }

    /// Deletes children removed from the collection instead of detaching
    /// them.
    pub fn delete_removed(mut self, delete_removed: bool) -> Relation<P, C> {
        self.delete_removed = delete_removed;
        self
    }

    pub fn write_order(mut self, write_order: WriteOrder) -> Relation<P, C> {
        self.write_order = write_order;
        self
    }

    pub fn is_ordered(&self) -> bool {
        self.ordered
    }
}

impl<P, C> fmt::Debug for Relation<P, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ownership = match &self.ownership {
            Ownership::Child { .. } => "child",
            Ownership::Association(_) => "association",
        };
        f.debug_struct("Relation")
            .field("ownership", &ownership)
            .field("ordered", &self.ordered)
            .field("delete_removed", &self.delete_removed)
            .field("write_order", &self.write_order)
            .finish()
    }
}
