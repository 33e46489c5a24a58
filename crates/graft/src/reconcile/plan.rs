use super::{execute_write, AssociationTable, ChildIndex, Persister};

use graft_core::{
    driver::Executor,
    schema::{ColumnId, Table},
    stmt::Value,
    Result,
};
use graft_sql::stmt::{ColumnRef, Delete, Expr, Insert, Update};

/// Association row of a relation.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkRow {
    pub parent: Value,
    pub child: Value,

    /// Position, for ordered relations.
    pub index: Option<usize>,
}

/// Moves a child to another position without touching its other columns.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexUpdate {
    pub parent: Value,
    pub child: Value,

    /// Position being replaced. Association rows are matched on it, since
    /// a child may sit at several positions.
    pub from: Option<usize>,

    pub to: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Step<C> {
    DeleteLinks(Vec<LinkRow>),
    DeleteChildren(Vec<C>),

    /// `(persisted state, new state)` pairs.
    UpdateChildren(Vec<(C, C)>),
    InsertChildren(Vec<C>),
    InsertLinks(Vec<LinkRow>),
    UpdateIndexes(Vec<IndexUpdate>),
}

/// Where link rows and positions are written.
#[derive(Debug, Clone)]
pub(crate) enum Target {
    Child(Option<ChildIndex>),
    Association(AssociationTable),
}

/// Ordered writes reconciling one parent's relation.
#[derive(Debug, Clone)]
pub struct ReconcilePlan<C> {
    steps: Vec<Step<C>>,
    target: Target,
}

impl<C> ReconcilePlan<C> {
    pub(crate) fn new(steps: Vec<Step<C>>, target: Target) -> ReconcilePlan<C> {
        ReconcilePlan { steps, target }
    }

    pub fn steps(&self) -> &[Step<C>] {
        &self.steps
    }

    /// True when the relation is already in sync.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Runs the plan step by step and returns the number of affected rows.
    ///
    /// Nothing is rolled back when a statement fails; the caller owns the
    /// transaction.
    pub fn apply<S>(&self, persister: &mut S, exec: &mut dyn Executor) -> Result<u64>
    where
        S: Persister<C> + ?Sized,
    {
        let mut affected = 0;

        for step in &self.steps {
            affected += match step {
                Step::DeleteChildren(children) => persister.delete(exec, children)?,
                Step::UpdateChildren(pairs) => persister.update(exec, pairs)?,
                Step::InsertChildren(children) => persister.insert(exec, children)?,
                Step::DeleteLinks(rows) => {
                    let table = self.association()?;
                    let mut n = 0;
                    for row in rows {
                        n += execute_write(exec, delete_link(table, row))?;
                    }
                    n
                }
                Step::InsertLinks(rows) => {
                    let table = self.association()?;
                    let mut n = 0;
                    for row in rows {
                        n += execute_write(exec, insert_link(table, row))?;
                    }
                    n
                }
                Step::UpdateIndexes(updates) => {
                    let mut n = 0;
                    for update in updates {
                        n += execute_write(exec, self.update_index(update)?)?;
                    }
                    n
                }
            };
        }

        Ok(affected)
    }

    fn association(&self) -> Result<&AssociationTable> {
        match &self.target {
            Target::Association(table) => Ok(table),
            Target::Child(_) => Err(graft_core::err!(
                "link rows planned for a relation without association table"
            )),
        }
    }

    fn update_index(&self, update: &IndexUpdate) -> Result<Update> {
        match &self.target {
            Target::Association(table) => {
                let Some(index) = table.index else {
                    return Err(graft_core::err!(
                        "association table `{}` has no index column",
                        table.table.name
                    ));
                };
                let mut filter = link_filter(table, &update.parent, &update.child);
                if let Some(from) = update.from {
                    filter.push(Expr::eq(
                        bare(&table.table, index),
                        Value::from(from),
                    ));
                }
                Ok(Update {
                    table: table.table.name.clone(),
                    assignments: vec![(name(&table.table, index), Value::from(update.to))],
                    filter: Expr::and(filter),
                })
            }
            Target::Child(Some(index)) => {
                let table = &index.table;
                let key: Vec<_> = table
                    .primary_key
                    .columns
                    .iter()
                    .map(|column| bare(table, *column))
                    .collect();
                Ok(Update {
                    table: table.name.clone(),
                    assignments: vec![(name(table, index.column), Value::from(update.to))],
                    filter: Expr::key_eq(&key, &update.child),
                })
            }
            Target::Child(None) => Err(graft_core::err!(
                "index update planned for an unordered relation"
            )),
        }
    }
}

fn name(table: &Table, column: ColumnId) -> String {
    table.columns[column.index].name.clone()
}

fn bare(table: &Table, column: ColumnId) -> ColumnRef {
    ColumnRef::bare(name(table, column))
}

fn bare_all(table: &Table, columns: &[ColumnId]) -> Vec<ColumnRef> {
    columns.iter().map(|column| bare(table, *column)).collect()
}

fn link_filter(table: &AssociationTable, parent: &Value, child: &Value) -> Vec<Expr> {
    vec![
        Expr::key_eq(&bare_all(&table.table, &table.parent), parent),
        Expr::key_eq(&bare_all(&table.table, &table.child), child),
    ]
}

fn delete_link(table: &AssociationTable, row: &LinkRow) -> Delete {
    let mut filter = link_filter(table, &row.parent, &row.child);
    if let (Some(column), Some(index)) = (table.index, row.index) {
        filter.push(Expr::eq(bare(&table.table, column), Value::from(index)));
    }
    Delete {
        table: table.table.name.clone(),
        filter: Expr::and(filter),
    }
}

fn insert_link(table: &AssociationTable, row: &LinkRow) -> Insert {
    let mut columns: Vec<String> = table
        .parent
        .iter()
        .chain(&table.child)
        .map(|column| name(&table.table, *column))
        .collect();
    let mut values: Vec<Value> = row
        .parent
        .key_parts()
        .iter()
        .chain(row.child.key_parts())
        .cloned()
        .collect();

    if let (Some(column), Some(index)) = (table.index, row.index) {
        columns.push(name(&table.table, column));
        values.push(Value::from(index));
    }

    Insert {
        table: table.table.name.clone(),
        columns,
        values,
    }
}
