//! Error types for the query engine.

use geostore_storage::StorageError;
use geostore_types::EntityId;
use thiserror::Error;

/// Result type for queries.
pub type QueryResult<T> = Result<T, QueryError>;

/// Errors that can occur while answering a query.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    /// The referenced polygon does not exist (or is not a polygon).
    #[error("polygon not found: {0}")]
    NotFound(EntityId),

    /// Radius is negative, NaN or infinite.
    #[error("invalid radius: {0}")]
    InvalidRadius(f64),

    /// The store failed underneath the query.
    #[error(transparent)]
    Storage(#[from] StorageError),
}
