//! Geometry primitives for GeoStore.
//!
//! This crate provides the two supported geometry types and the exact
//! predicates the query engine filters with:
//!
//! - [`Point`]: a validated longitude/latitude pair
//! - [`Polygon`]: a closed ring of at least three distinct vertices
//! - [`Geometry`]: the tagged union stored on every entity
//! - [`BoundingBox`]: axis-aligned box used by the spatial index
//!
//! Predicates ([`distance`], [`point_in_polygon`], [`polygons_overlap`]) are
//! pure functions over borrowed values and safe to call from any thread.
//!
//! Coordinates are always longitude first, then latitude, in degrees.

mod bbox;
mod error;
mod geometry;
mod point;
mod polygon;
mod predicates;

pub use bbox::{BoundingBox, METERS_PER_DEGREE};
pub use error::{GeometryError, GeometryResult};
pub use geometry::{Geometry, GeometryKind, bounding_box};
pub use point::Point;
pub use polygon::Polygon;
pub use predicates::{
    EARTH_RADIUS_METERS, distance, point_in_polygon, point_on_segment, polygons_overlap,
    segments_intersect,
};
