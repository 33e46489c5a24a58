use super::Error;
use crate::stmt::Value;

/// Error when a polymorphic relation reads a discriminator value that no
/// target selector is registered for.
#[derive(Debug)]
pub(super) struct InvalidDiscriminator {
    value: Value,
}

impl std::error::Error for InvalidDiscriminator {}

impl core::fmt::Display for InvalidDiscriminator {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "no target selector for discriminator {:?}", self.value)
    }
}

impl Error {
    /// Creates an invalid discriminator error.
    pub fn invalid_discriminator(value: Value) -> Error {
        Error::from(super::ErrorKind::InvalidDiscriminator(
            InvalidDiscriminator { value },
        ))
    }

    /// Returns `true` if this error is an invalid discriminator error.
    pub fn is_invalid_discriminator(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::InvalidDiscriminator(_))
    }
}
