use crate::{Exec, ExecKind, ExecLog};

use graft_core::{
    driver::{Capability, Cursor, Executor},
    stmt::Value,
    Result,
};

type OnSelect = Box<dyn FnMut(&str, &[Value]) -> Result<Cursor>>;
type OnWrite = Box<dyn FnMut(&str, &[Value]) -> Result<u64>>;

/// Executor answering statements from closures and logging every one.
///
/// Without handlers, selects return no rows and writes report one affected
/// row.
pub struct MockExecutor {
    capability: Capability,
    log: ExecLog,
    on_select: OnSelect,
    on_write: OnWrite,
}

impl MockExecutor {
    pub fn new(capability: Capability) -> MockExecutor {
        MockExecutor {
            capability,
            log: ExecLog::new(),
            on_select: Box::new(|_, _| Ok(Cursor::empty())),
            on_write: Box::new(|_, _| Ok(1)),
        }
    }

    pub fn on_select(
        mut self,
        f: impl FnMut(&str, &[Value]) -> Result<Cursor> + 'static,
    ) -> MockExecutor {
        self.on_select = Box::new(f);
        self
    }

    pub fn on_write(mut self, f: impl FnMut(&str, &[Value]) -> Result<u64> + 'static) -> MockExecutor {
        self.on_write = Box::new(f);
        self
    }

    /// Shared handle on the statement log.
    pub fn log(&self) -> ExecLog {
        self.log.clone()
    }
}

impl Executor for MockExecutor {
    fn capability(&self) -> &Capability {
        &self.capability
    }

    fn exec_select(&mut self, sql: &str, params: &[Value]) -> Result<Cursor> {
        self.log.push(Exec {
            kind: ExecKind::Select,
            sql: sql.to_string(),
            params: params.to_vec(),
        });
        (self.on_select)(sql, params)
    }

    fn exec_write(&mut self, sql: &str, params: &[Value]) -> Result<u64> {
        self.log.push(Exec {
            kind: ExecKind::Write,
            sql: sql.to_string(),
            params: params.to_vec(),
        });
        (self.on_write)(sql, params)
    }
}

/// Filters a canned result to the rows whose `key` column holds one of
/// `params`, which is how a single-key `IN` select answers.
pub fn rows_matching(columns: &[&str], rows: &[Vec<Value>], key: &str, params: &[Value]) -> Cursor {
    let position = columns.iter().position(|column| *column == key);
    let matching = rows
        .iter()
        .filter(|row| match position {
            Some(position) => params.contains(&row[position]),
            None => false,
        })
        .cloned()
        .collect();
    Cursor::new(columns.iter().copied(), matching)
}
