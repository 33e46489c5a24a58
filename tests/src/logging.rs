use graft::{
    driver::{Capability, Cursor, Executor},
    stmt::Value,
    Result,
};
use graft_test_util::{Exec, ExecKind, ExecLog};

/// Wraps an executor and records every statement it runs.
#[derive(Debug)]
pub struct LoggingExecutor<E> {
    inner: E,
    log: ExecLog,
}

impl<E: Executor> LoggingExecutor<E> {
    pub fn new(inner: E) -> LoggingExecutor<E> {
        LoggingExecutor {
            inner,
            log: ExecLog::new(),
        }
    }

    pub fn log(&self) -> &ExecLog {
        &self.log
    }

    pub fn inner(&self) -> &E {
        &self.inner
    }

    /// The wrapped executor; statements run through it are not logged.
    pub fn inner_mut(&mut self) -> &mut E {
        &mut self.inner
    }

    fn record(&self, kind: ExecKind, sql: &str, params: &[Value]) {
        self.log.push(Exec {
            kind,
            sql: sql.to_string(),
            params: params.to_vec(),
        });
    }
}

impl<E: Executor> Executor for LoggingExecutor<E> {
    fn capability(&self) -> &Capability {
        self.inner.capability()
    }

    fn exec_select(&mut self, sql: &str, params: &[Value]) -> Result<Cursor> {
        self.record(ExecKind::Select, sql, params);
        self.inner.exec_select(sql, params)
    }

    fn exec_write(&mut self, sql: &str, params: &[Value]) -> Result<u64> {
        self.record(ExecKind::Write, sql, params);
        self.inner.exec_write(sql, params)
    }
}
