//! Core type definitions for GeoStore.
//!
//! This crate defines the small, geometry-agnostic types shared by every
//! layer of the engine:
//! - Entity identifiers and the sequence that hands them out
//! - UTC timestamps with a monotonic `tick`
//!
//! Geometry lives in `geostore-geometry`; the entity record itself lives in
//! `geostore-model`.

mod ids;
mod timestamp;

pub use ids::{EntityId, IdSequence};
pub use timestamp::Timestamp;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid entity id: {0}")]
    InvalidId(#[from] std::num::ParseIntError),

    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
}
