use graft_core::stmt::Value;

use std::{
    fmt,
    sync::{Arc, Mutex, MutexGuard},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecKind {
    Select,
    Write,
}

/// One statement handed to an executor.
#[derive(Debug, Clone, PartialEq)]
pub struct Exec {
    pub kind: ExecKind,
    pub sql: String,
    pub params: Vec<Value>,
}

/// Statements executed so far, oldest first. Clones share the log.
#[derive(Clone, Default)]
pub struct ExecLog {
    execs: Arc<Mutex<Vec<Exec>>>,
}

impl ExecLog {
    pub fn new() -> ExecLog {
        ExecLog::default()
    }

    pub fn push(&self, exec: Exec) {
        self.lock().push(exec);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Removes and returns the oldest statement.
    #[track_caller]
    pub fn pop(&self) -> Exec {
        let mut execs = self.lock();
        if execs.is_empty() {
            panic!("no statements in log");
        }
        execs.remove(0)
    }

    pub fn execs(&self) -> Vec<Exec> {
        self.lock().clone()
    }

    /// SQL text of every logged statement, oldest first.
    pub fn sql(&self) -> Vec<String> {
        self.lock().iter().map(|exec| exec.sql.clone()).collect()
    }

    pub fn count(&self, kind: ExecKind) -> usize {
        self.lock().iter().filter(|exec| exec.kind == kind).count()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Exec>> {
        // A panicking test poisons the lock; the log itself stays usable.
        self.execs.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl fmt::Debug for ExecLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecLog")
            .field("execs", &*self.lock())
            .finish()
    }
}
