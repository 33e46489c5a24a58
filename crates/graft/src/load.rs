mod context;
pub use context::LoadContext;

mod deferred;
pub use deferred::{DeferredRelation, Selector};
pub(crate) use deferred::{DeferredLink, Pending, TargetSelector};

mod loader;
pub use loader::{Builder, EntityLoader};

mod materialize;
pub use materialize::Materializer;

#[cfg(test)]
mod fixtures;
