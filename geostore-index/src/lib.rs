//! Spatial index for GeoStore.
//!
//! A balanced R-tree mapping [`EntityId`](geostore_types::EntityId)s to the
//! bounding boxes of their geometries:
//!
//! - [`SpatialIndex`]: insert / delete / update / query
//! - [`Query`]: lazy, restartable iterator over ids whose boxes intersect a
//!   query box
//! - [`IndexConfig`]: fanout bounds
//!
//! The tree keeps three invariants across every mutation:
//! - every node's box covers all of its descendants
//! - every leaf sits at the same depth
//! - every non-root node holds between `min_children` and `max_children`
//!   items
//!
//! Nodes are private; callers only ever see ids and boxes.

mod config;
mod error;
mod node;
mod query;
mod rtree;

pub use config::IndexConfig;
pub use error::{IndexError, IndexResult};
pub use query::Query;
pub use rtree::SpatialIndex;
