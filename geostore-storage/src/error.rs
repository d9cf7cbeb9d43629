//! Error types for the storage layer.

use geostore_geometry::GeometryError;
use geostore_index::IndexError;
use geostore_types::EntityId;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur in storage operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StorageError {
    /// Geometry failed validation.
    #[error(transparent)]
    InvalidGeometry(#[from] GeometryError),

    /// Entity not found.
    #[error("entity not found: {0}")]
    NotFound(EntityId),

    /// The index disagreed with the entity map and could not be repaired.
    #[error("index inconsistency: {0}")]
    IndexInconsistency(String),

    /// Invalid configuration.
    #[error("invalid store config: {0}")]
    Config(String),
}

impl From<IndexError> for StorageError {
    fn from(err: IndexError) -> Self {
        match err {
            IndexError::InvalidConfig(msg) => StorageError::Config(msg),
            other => StorageError::IndexInconsistency(other.to_string()),
        }
    }
}
