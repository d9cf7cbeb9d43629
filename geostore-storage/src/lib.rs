//! In-memory storage layer for GeoStore.
//!
//! Owns every [`Entity`](geostore_model::Entity) together with the spatial
//! index over their bounding boxes.
//!
//! # Architecture
//!
//! - One `RwLock` guards the entity map, the index and the id sequence, so a
//!   reader never sees the map and the index disagree
//! - Mutations validate first and touch state last; a poisoned lock is
//!   recovered rather than propagated
//! - [`StoreView`] is a read guard handed to the query engine so that every
//!   query runs against one consistent state
//! - An index that disagrees with the map is rebuilt from the map, which is
//!   the source of truth

mod config;
mod error;
mod store;

pub use config::StoreConfig;
pub use error::{StorageError, StorageResult};
pub use store::{SpatialStore, StoreView};
