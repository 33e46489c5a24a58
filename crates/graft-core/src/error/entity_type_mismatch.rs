use super::Error;

/// Error when a type-erased entity handle does not hold the entity type a
/// mapping or relation fixer expects.
#[derive(Debug)]
pub(super) struct EntityTypeMismatch {
    expected: &'static str,
}

impl std::error::Error for EntityTypeMismatch {}

impl core::fmt::Display for EntityTypeMismatch {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "entity is not a `{}`", self.expected)
    }
}

impl Error {
    /// Creates an entity type mismatch error.
    pub fn entity_type_mismatch(expected: &'static str) -> Error {
        Error::from(super::ErrorKind::EntityTypeMismatch(EntityTypeMismatch {
            expected,
        }))
    }

    /// Returns `true` if this error is an entity type mismatch.
    pub fn is_entity_type_mismatch(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::EntityTypeMismatch(_))
    }
}
