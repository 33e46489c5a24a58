pub mod diff;
pub use diff::{diff, diff_list, CollectionDiff, DiffState, IndexedDiff};

mod entity;
pub use entity::{EntityRef, ModelId};

pub mod join;
pub use join::{JoinTree, JoinType, NodeName, Query};

pub mod load;
pub use load::{DeferredRelation, EntityLoader, LoadContext, Materializer, Selector};

mod mapping;
pub use mapping::{EntityMapping, Mapping, RowReader};

pub mod reconcile;
pub use reconcile::{Persister, ReconcilePlan, Reconciler, Relation};

mod relation;
pub use relation::RelationFixer;

pub use graft_core::{driver, driver::Executor, schema, stmt, Error, Result};
