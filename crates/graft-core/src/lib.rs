#[macro_use]
mod macros;

pub mod driver;
pub use driver::Executor;

mod error;
pub use error::Error;

pub mod schema;

pub mod stmt;

/// A Result type alias that uses graft's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

#[doc(hidden)]
pub use tracing;
