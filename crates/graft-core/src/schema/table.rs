use super::{Column, ColumnId, PrimaryKey, TableBuilder};

use std::fmt;

/// A database table
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Uniquely identifies a table
    pub id: TableId,

    /// Name of the table
    pub name: String,

    /// The table's columns
    pub columns: Vec<Column>,

    pub primary_key: PrimaryKey,
}

/// Uniquely identifies a table
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
pub struct TableId(pub usize);

impl Table {
    pub fn builder(id: TableId, name: impl Into<String>) -> TableBuilder {
        TableBuilder::new(id, name.into())
    }

    pub fn primary_key_columns(&self) -> impl ExactSizeIterator<Item = &Column> + '_ {
        self.primary_key
            .columns
            .iter()
            .map(|column_id| &self.columns[column_id.index])
    }

    /// Returns the column, if it belongs to this table.
    pub fn column(&self, id: impl Into<ColumnId>) -> Option<&Column> {
        let id = id.into();
        if id.table != self.id {
            return None;
        }
        self.columns.get(id.index)
    }

    pub fn column_by_name(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }

    /// Returns the identifier of the named column.
    ///
    /// Intended for configuration code where a missing column is a
    /// programming error.
    #[track_caller]
    pub fn expect_column(&self, name: &str) -> ColumnId {
        match self.column_by_name(name) {
            Some(column) => column.id,
            None => panic!("table `{}` has no column `{}`", self.name, name),
        }
    }

    pub fn contains(&self, id: ColumnId) -> bool {
        self.column(id).is_some()
    }
}

impl fmt::Debug for TableId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "TableId({})", self.0)
    }
}
