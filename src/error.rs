//! Failures reported by the containers.
use thiserror::Error;

/// Error returned by fallible container operations.
///
/// Every variant signals a usage error; retrying the same call on the same
/// container state fails the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    #[error("invalid position: {0}")]
    InvalidPosition(#[from] InvalidPosition),
    #[error("the tree already has a root")]
    TreeAlreadyRooted,
    #[error("no position past the end of the sequence")]
    NoSuchElement,
}

impl Error {
    /// Returns whether this is an [`Error::InvalidPosition`].
    #[inline]
    pub fn is_invalid_position(&self) -> bool {
        matches!(self, Self::InvalidPosition(_))
    }
}

/// Why a position was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidPosition {
    /// The position was issued by another container instance.
    #[error("the position belongs to a different container")]
    Foreign,
    /// The slot the position denoted has been removed.
    #[error("the position is no longer valid")]
    Stale,
}
