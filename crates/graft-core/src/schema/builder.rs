use super::{Column, ColumnId, PrimaryKey, Table, TableId};
use crate::stmt;

use std::sync::Arc;

/// Assembles a [`Table`] column by column.
#[derive(Debug)]
pub struct TableBuilder {
    table: Table,
}

impl TableBuilder {
    pub(super) fn new(id: TableId, name: String) -> Self {
        Self {
            table: Table {
                id,
                name,
                columns: vec![],
                primary_key: PrimaryKey::default(),
            },
        }
    }

    /// Adds a non-null primary key column.
    pub fn primary_key(mut self, name: impl Into<String>, ty: stmt::Type) -> Self {
        let id = self.push(name.into(), ty, Some(false), true);
        self.table.primary_key.columns.push(id);
        self
    }

    /// Adds a non-null column.
    pub fn column(self, name: impl Into<String>, ty: stmt::Type) -> Self {
        self.column_with(name, ty, Some(false))
    }

    /// Adds a nullable column.
    pub fn nullable(self, name: impl Into<String>, ty: stmt::Type) -> Self {
        self.column_with(name, ty, Some(true))
    }

    /// Adds a column with explicit (possibly unknown) nullability.
    pub fn column_with(
        mut self,
        name: impl Into<String>,
        ty: stmt::Type,
        nullable: Option<bool>,
    ) -> Self {
        self.push(name.into(), ty, nullable, false);
        self
    }

    pub fn build(self) -> Arc<Table> {
        Arc::new(self.table)
    }

    fn push(&mut self, name: String, ty: stmt::Type, nullable: Option<bool>, pk: bool) -> ColumnId {
        let id = ColumnId {
            table: self.table.id,
            index: self.table.columns.len(),
        };
        self.table.columns.push(Column {
            id,
            name,
            ty,
            nullable,
            primary_key: pk,
        });
        id
    }
}
