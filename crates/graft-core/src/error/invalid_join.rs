use super::Error;

/// Error when a join's columns do not fit the tree it is attached to, for
/// example a left column that no ancestor node selects from.
#[derive(Debug)]
pub(super) struct InvalidJoin {
    message: Box<str>,
}

impl std::error::Error for InvalidJoin {}

impl core::fmt::Display for InvalidJoin {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid join: {}", self.message)
    }
}

impl Error {
    /// Creates an invalid join error.
    pub fn invalid_join(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidJoin(InvalidJoin {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is an invalid join error.
    pub fn is_invalid_join(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::InvalidJoin(_))
    }
}
