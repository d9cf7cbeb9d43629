//! Spatial query engine for GeoStore.
//!
//! [`QueryEngine`] answers the four spatial questions over a
//! [`SpatialStore`](geostore_storage::SpatialStore):
//! - which points lie within a distance of a location
//! - which points lie inside a stored polygon
//! - which polygons contain a location
//! - which polygons overlap a stored polygon
//!
//! Every query narrows candidates through the spatial index by bounding box,
//! then applies the exact predicate from `geostore-geometry`. Results are
//! entity copies in ascending id order.

mod engine;
mod error;

pub use engine::QueryEngine;
pub use error::{QueryError, QueryResult};
