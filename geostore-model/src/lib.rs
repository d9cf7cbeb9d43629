//! Entity model for GeoStore.
//!
//! Defines the record type the store owns and the shapes used to change it:
//! - [`Entity`]: id, geometry, string attributes and lifecycle timestamps
//! - [`Attributes`]: the sorted `key -> value` bag carried by every entity
//! - [`EntityPatch`] / [`AttributeUpdate`]: partial updates applied by the store
//!
//! These types are consumed by storage, the query engine and (as GeoJSON
//! features) the HTTP service.

mod attributes;
mod entity;
mod patch;

pub use attributes::{
    Attributes, DESCRIPTION_KEY, NAME_KEY, default_name, fill_defaults,
};
pub use entity::Entity;
pub use patch::{AttributeUpdate, EntityPatch};
