//! Error types for the spatial index.

use geostore_types::EntityId;
use thiserror::Error;

/// Result type for index operations.
pub type IndexResult<T> = Result<T, IndexError>;

/// Errors that can occur in index operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexError {
    /// The id has no leaf entry.
    #[error("id not indexed: {0}")]
    NotFound(EntityId),

    /// The id already has a leaf entry.
    #[error("id already indexed: {0}")]
    AlreadyIndexed(EntityId),

    /// Fanout bounds are unusable.
    #[error("invalid index config: {0}")]
    InvalidConfig(String),

    /// A structural invariant does not hold.
    #[error("index corrupt: {0}")]
    Corrupt(String),
}
