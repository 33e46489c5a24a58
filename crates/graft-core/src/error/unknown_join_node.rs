use super::Error;

/// Error when a join is attached to a node name the tree does not contain.
///
/// This is a configuration error: it is raised while the join tree is being
/// assembled, before any SQL is built.
#[derive(Debug)]
pub(super) struct UnknownJoinNode {
    name: Box<str>,
}

impl std::error::Error for UnknownJoinNode {}

impl core::fmt::Display for UnknownJoinNode {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "unknown join node: {}", self.name)
    }
}

impl Error {
    /// Creates an unknown join node error.
    pub fn unknown_join_node(name: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::UnknownJoinNode(UnknownJoinNode {
            name: name.into().into(),
        }))
    }

    /// Returns `true` if this error is an unknown join node error.
    pub fn is_unknown_join_node(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::UnknownJoinNode(_))
    }
}
