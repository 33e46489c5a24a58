use super::Error;

/// Error when a join requires its parent node to carry an entity but the
/// parent is a passive node.
#[derive(Debug)]
pub(super) struct MissingInflater {
    node: Box<str>,
}

impl std::error::Error for MissingInflater {}

impl core::fmt::Display for MissingInflater {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "join node `{}` has no entity mapping to merge columns into",
            self.node
        )
    }
}

impl Error {
    /// Creates a missing inflater error for the given node name.
    pub fn missing_inflater(node: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::MissingInflater(MissingInflater {
            node: node.into().into(),
        }))
    }

    /// Returns `true` if this error is a missing inflater error.
    pub fn is_missing_inflater(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::MissingInflater(_))
    }
}
