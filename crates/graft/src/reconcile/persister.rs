use super::execute_write;

use graft_core::{driver::Executor, err, schema::Table, stmt::Value, Result};
use graft_sql::stmt::{ColumnRef, Delete, Expr, Insert, Update};

use std::{fmt, sync::Arc};

/// Writes child entities of one type.
///
/// The reconciler asks it which children already exist and which changed
/// while planning, and hands it the child writes when the plan is applied.
pub trait Persister<C> {
    fn is_persisted(&self, child: &C) -> bool;

    /// Dirty check between the persisted and the new state of a child.
    fn has_changed(&self, old: &C, new: &C) -> bool;

    fn insert(&mut self, exec: &mut dyn Executor, children: &[C]) -> Result<u64>;

    /// Receives `(persisted state, new state)` pairs.
    fn update(&mut self, exec: &mut dyn Executor, children: &[(C, C)]) -> Result<u64>;

    fn delete(&mut self, exec: &mut dyn Executor, children: &[C]) -> Result<u64>;
}

type ToRow<C> = Box<dyn Fn(&C) -> Vec<Value> + Send + Sync>;
type IsPersisted<C> = Box<dyn Fn(&C) -> bool + Send + Sync>;

/// A [`Persister`] writing one row per child into a single table.
///
/// `to_row` yields one value per table column, in column order. A child
/// counts as changed when any of those values differ.
pub struct SqlPersister<C> {
    table: Arc<Table>,
    to_row: ToRow<C>,
    is_persisted: IsPersisted<C>,
}

impl<C> SqlPersister<C> {
    pub fn new(
        table: Arc<Table>,
        to_row: impl Fn(&C) -> Vec<Value> + Send + Sync + 'static,
        is_persisted: impl Fn(&C) -> bool + Send + Sync + 'static,
    ) -> SqlPersister<C> {
        SqlPersister {
            table,
            to_row: Box::new(to_row),
            is_persisted: Box::new(is_persisted),
        }
    }

    pub fn table(&self) -> &Arc<Table> {
        &self.table
    }

    /// Renders `child` as a row, one value per column.
    fn row(&self, child: &C) -> Result<Vec<Value>> {
        let row = (self.to_row)(child);
        if row.len() != self.table.columns.len() {
            return Err(err!(
                "row for table `{}` has {} values, expected {}",
                self.table.name,
                row.len(),
                self.table.columns.len()
            ));
        }
        Ok(row)
    }

    fn key_filter(&self, row: &[Value]) -> Expr {
        Expr::and(
            self.table
                .primary_key
                .columns
                .iter()
                .map(|column| {
                    Expr::eq(
                        ColumnRef::bare(&self.table.columns[column.index].name),
                        row[column.index].clone(),
                    )
                })
                .collect(),
        )
    }
}

impl<C> Persister<C> for SqlPersister<C> {
    fn is_persisted(&self, child: &C) -> bool {
        (self.is_persisted)(child)
    }

    fn has_changed(&self, old: &C, new: &C) -> bool {
        (self.to_row)(old) != (self.to_row)(new)
    }

    fn insert(&mut self, exec: &mut dyn Executor, children: &[C]) -> Result<u64> {
        let columns: Vec<String> = self.table.columns.iter().map(|c| c.name.clone()).collect();
        let mut affected = 0;

        for child in children {
            affected += execute_write(
                exec,
                Insert {
                    table: self.table.name.clone(),
                    columns: columns.clone(),
                    values: self.row(child)?,
                },
            )?;
        }

        Ok(affected)
    }

    fn update(&mut self, exec: &mut dyn Executor, children: &[(C, C)]) -> Result<u64> {
        let mut affected = 0;

        for (old, new) in children {
            let old = self.row(old)?;
            let new = self.row(new)?;

            let assignments: Vec<_> = self
                .table
                .columns
                .iter()
                .filter(|column| !column.primary_key && old[column.id.index] != new[column.id.index])
                .map(|column| (column.name.clone(), new[column.id.index].clone()))
                .collect();
            if assignments.is_empty() {
                continue;
            }

            affected += execute_write(
                exec,
                Update {
                    table: self.table.name.clone(),
                    assignments,
                    filter: self.key_filter(&old),
                },
            )?;
        }

        Ok(affected)
    }

    fn delete(&mut self, exec: &mut dyn Executor, children: &[C]) -> Result<u64> {
        let mut affected = 0;

        for child in children {
            affected += execute_write(
                exec,
                Delete {
                    table: self.table.name.clone(),
                    filter: self.key_filter(&self.row(child)?),
                },
            )?;
        }

        Ok(affected)
    }
}

impl<C> fmt::Debug for SqlPersister<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqlPersister")
            .field("table", &self.table.name)
            .finish()
    }
}
