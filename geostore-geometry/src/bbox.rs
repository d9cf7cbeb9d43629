//! Axis-aligned bounding boxes in longitude/latitude space.

use crate::point::Point;
use serde::{Deserialize, Serialize};

/// Approximate length of one degree of latitude, in meters.
pub const METERS_PER_DEGREE: f64 = 111_320.0;

/// Extra margin applied to circle boxes so they always cover every point the
/// equirectangular distance accepts (that distance uses a slightly smaller
/// meters-per-degree figure than [`METERS_PER_DEGREE`]).
const RADIUS_PADDING: f64 = 1.01;

/// Smallest axis-aligned rectangle containing a geometry.
///
/// Boxes are closed: touching edges count as intersecting and points on the
/// border count as contained.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    /// Creates a box from two corners given in any order.
    #[must_use]
    pub fn new(lon_a: f64, lat_a: f64, lon_b: f64, lat_b: f64) -> Self {
        Self {
            min_lon: lon_a.min(lon_b),
            min_lat: lat_a.min(lat_b),
            max_lon: lon_a.max(lon_b),
            max_lat: lat_a.max(lat_b),
        }
    }

    /// Degenerate zero-area box at a point.
    #[must_use]
    pub fn from_point(point: &Point) -> Self {
        Self {
            min_lon: point.lon(),
            min_lat: point.lat(),
            max_lon: point.lon(),
            max_lat: point.lat(),
        }
    }

    /// The whole coordinate domain.
    #[must_use]
    pub const fn world() -> Self {
        Self {
            min_lon: -180.0,
            min_lat: -90.0,
            max_lon: 180.0,
            max_lat: 90.0,
        }
    }

    /// Box approximating the circle of `radius_m` meters around `center`.
    ///
    /// Latitude half-height is `radius / 111320` degrees; longitude half-width
    /// is divided by the cosine of the most poleward latitude the box reaches,
    /// so the box still covers the circle near the poles. When the box touches
    /// a pole it spans every longitude. The box is clamped to the coordinate
    /// domain and does not wrap across the antimeridian.
    #[must_use]
    pub fn around_point(center: &Point, radius_m: f64) -> Self {
        let padded = radius_m.max(0.0) * RADIUS_PADDING;
        let dlat = padded / METERS_PER_DEGREE;
        let min_lat = (center.lat() - dlat).max(-90.0);
        let max_lat = (center.lat() + dlat).min(90.0);

        let poleward = min_lat.abs().max(max_lat.abs());
        let cos = poleward.to_radians().cos();
        let (min_lon, max_lon) = if poleward >= 90.0 || cos <= f64::EPSILON {
            (-180.0, 180.0)
        } else {
            let dlon = padded / (METERS_PER_DEGREE * cos);
            ((center.lon() - dlon).max(-180.0), (center.lon() + dlon).min(180.0))
        };

        Self {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        }
    }

    /// Grows this box to include a point.
    pub fn expand_to(&mut self, point: &Point) {
        self.min_lon = self.min_lon.min(point.lon());
        self.min_lat = self.min_lat.min(point.lat());
        self.max_lon = self.max_lon.max(point.lon());
        self.max_lat = self.max_lat.max(point.lat());
    }

    /// Grows this box to include another box.
    pub fn expand(&mut self, other: &BoundingBox) {
        self.min_lon = self.min_lon.min(other.min_lon);
        self.min_lat = self.min_lat.min(other.min_lat);
        self.max_lon = self.max_lon.max(other.max_lon);
        self.max_lat = self.max_lat.max(other.max_lat);
    }

    /// Smallest box covering both.
    #[must_use]
    pub fn union(&self, other: &BoundingBox) -> Self {
        let mut merged = *self;
        merged.expand(other);
        merged
    }

    /// True when the two closed boxes share at least one point.
    #[must_use]
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.min_lon <= other.max_lon
            && self.max_lon >= other.min_lon
            && self.min_lat <= other.max_lat
            && self.max_lat >= other.min_lat
    }

    /// True when the point lies inside or on the border.
    #[must_use]
    pub fn contains_point(&self, point: &Point) -> bool {
        point.lon() >= self.min_lon
            && point.lon() <= self.max_lon
            && point.lat() >= self.min_lat
            && point.lat() <= self.max_lat
    }

    /// True when `other` lies entirely inside this box.
    #[must_use]
    pub fn contains_box(&self, other: &BoundingBox) -> bool {
        self.min_lon <= other.min_lon
            && self.max_lon >= other.max_lon
            && self.min_lat <= other.min_lat
            && self.max_lat >= other.max_lat
    }

    /// Area in square degrees.
    #[must_use]
    pub fn area(&self) -> f64 {
        (self.max_lon - self.min_lon) * (self.max_lat - self.min_lat)
    }

    /// Half perimeter in degrees. Separates zero-area boxes that `area` cannot.
    #[must_use]
    pub fn margin(&self) -> f64 {
        (self.max_lon - self.min_lon) + (self.max_lat - self.min_lat)
    }

    /// Area growth needed to also cover `other`.
    #[must_use]
    pub fn enlargement(&self, other: &BoundingBox) -> f64 {
        self.union(other).area() - self.area()
    }

    /// Center as `(lon, lat)`.
    #[must_use]
    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_lon + self.max_lon) * 0.5,
            (self.min_lat + self.max_lat) * 0.5,
        )
    }
}
