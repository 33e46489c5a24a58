//! Shared fixtures for the end-to-end tests: a small `User` domain stored in
//! an in-memory SQLite database.

mod db;
pub use db::Db;

mod logging;
pub use logging::LoggingExecutor;

pub mod models;

pub mod schema;
pub use schema::Schema;

pub mod prelude {
    pub use crate::models::*;
    pub use crate::{Db, Schema};

    pub use graft::stmt::Value;
    pub use graft_test_util::{prelude::*, ExecKind};
}
