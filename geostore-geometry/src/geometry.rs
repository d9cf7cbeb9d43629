//! The geometry union stored on entities.

use crate::bbox::BoundingBox;
use crate::point::Point;
use crate::polygon::Polygon;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which variant a [`Geometry`] is. Used as a filter by listings and queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeometryKind {
    Point,
    Polygon,
}

impl fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometryKind::Point => f.write_str("point"),
            GeometryKind::Polygon => f.write_str("polygon"),
        }
    }
}

/// A point or a polygon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    Point(Point),
    Polygon(Polygon),
}

impl Geometry {
    /// Returns the variant discriminator.
    #[must_use]
    pub fn kind(&self) -> GeometryKind {
        match self {
            Geometry::Point(_) => GeometryKind::Point,
            Geometry::Polygon(_) => GeometryKind::Polygon,
        }
    }

    /// Returns the point, if this is one.
    #[must_use]
    pub fn as_point(&self) -> Option<&Point> {
        match self {
            Geometry::Point(p) => Some(p),
            Geometry::Polygon(_) => None,
        }
    }

    /// Returns the polygon, if this is one.
    #[must_use]
    pub fn as_polygon(&self) -> Option<&Polygon> {
        match self {
            Geometry::Polygon(p) => Some(p),
            Geometry::Point(_) => None,
        }
    }

    /// Smallest box containing the geometry.
    #[must_use]
    pub fn bounding_box(&self) -> BoundingBox {
        bounding_box(self)
    }
}

impl From<Point> for Geometry {
    fn from(point: Point) -> Self {
        Geometry::Point(point)
    }
}

impl From<Polygon> for Geometry {
    fn from(polygon: Polygon) -> Self {
        Geometry::Polygon(polygon)
    }
}

/// Min/max over all coordinates; a degenerate box for a point.
#[must_use]
pub fn bounding_box(geometry: &Geometry) -> BoundingBox {
    match geometry {
        Geometry::Point(p) => BoundingBox::from_point(p),
        Geometry::Polygon(poly) => poly.bounding_box(),
    }
}
