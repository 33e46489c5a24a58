//! Writes the difference between two versions of a parent's to-many
//! relation.
//!
//! A [`Reconciler`] diffs the old and new children of one parent under a
//! [`Relation`] policy and produces a [`ReconcilePlan`]: the ordered inserts,
//! updates and deletes of child rows and association rows needed to bring the
//! database in line. Applying the plan runs the child writes through a
//! [`Persister`] and renders association rows itself.

mod persister;
pub use persister::{Persister, SqlPersister};

mod plan;
pub use plan::{IndexUpdate, LinkRow, ReconcilePlan, Step};

mod reconciler;
pub use reconciler::Reconciler;

mod relation;
pub use relation::{AssociationTable, ChildIndex, Relation, WriteOrder};

use graft_core::{driver::Executor, stmt::Value, trace_query, Result};
use graft_sql::{Serializer, Statement};

/// Renders and runs one write statement.
pub(crate) fn execute_write(exec: &mut dyn Executor, stmt: impl Into<Statement>) -> Result<u64> {
    let mut params: Vec<Value> = vec![];
    let sql = Serializer::new(exec.capability().flavor).serialize(&stmt.into(), &mut params);
    trace_query!(sql, params.len());
    exec.exec_write(&sql, &params)
}
