use super::TableId;
use crate::stmt;

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Uniquely identifies the column in the schema.
    pub id: ColumnId,

    /// The name of the column in the database.
    pub name: String,

    /// The column type, from graft's point of view.
    pub ty: stmt::Type,

    /// Whether or not the column is nullable. `None` when the mapping did not
    /// declare it, which leaves join strictness undecided.
    pub nullable: Option<bool>,

    /// True if the column is part of the table's primary key
    pub primary_key: bool,
}

/// Structural identity of a column: its table and position.
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
pub struct ColumnId {
    pub table: TableId,
    pub index: usize,
}

impl Column {
    /// Returns `true` only when the column is declared nullable.
    pub fn is_nullable(&self) -> bool {
        self.nullable == Some(true)
    }
}

impl From<&Column> for ColumnId {
    fn from(value: &Column) -> Self {
        value.id
    }
}

impl fmt::Debug for ColumnId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "ColumnId({}/{})", self.table.0, self.index)
    }
}
