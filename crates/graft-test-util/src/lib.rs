#[macro_use]
mod macros;

mod exec_log;
pub use exec_log::{Exec, ExecKind, ExecLog};

mod mock;
pub use mock::{rows_matching, MockExecutor};

mod persister;
pub use persister::RecordingPersister;

pub mod prelude {
    pub use crate::{assert_err, assert_none, assert_ok};
}
