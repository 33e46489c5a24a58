mod capability;
pub use capability::{Capability, Flavor};

mod cursor;
pub use cursor::{Cursor, Row};

use crate::{stmt::Value, Result};

/// Runs SQL statements on behalf of the engine.
///
/// Parameters are positional: `params[0]` binds to the first placeholder.
/// Timeouts, cancellation and transactions are the implementor's concern.
pub trait Executor {
    /// Describes the dialect, which informs statement rendering and chunking.
    fn capability(&self) -> &Capability;

    /// Runs a row-returning statement.
    fn exec_select(&mut self, sql: &str, params: &[Value]) -> Result<Cursor>;

    /// Runs a DML statement and returns the number of affected rows.
    fn exec_write(&mut self, sql: &str, params: &[Value]) -> Result<u64>;
}

impl<E: Executor + ?Sized> Executor for &mut E {
    fn capability(&self) -> &Capability {
        (**self).capability()
    }

    fn exec_select(&mut self, sql: &str, params: &[Value]) -> Result<Cursor> {
        (**self).exec_select(sql, params)
    }

    fn exec_write(&mut self, sql: &str, params: &[Value]) -> Result<u64> {
        (**self).exec_write(sql, params)
    }
}
