//! Validated geodetic points.

use crate::error::{GeometryError, GeometryResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A longitude/latitude pair in degrees.
///
/// Construction rejects non-finite values and coordinates outside
/// `[-180, 180] x [-90, 90]`, so every `Point` in the system is valid.
/// Serialized as a `[lon, lat]` array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 2]", into = "[f64; 2]")]
pub struct Point {
    lon: f64,
    lat: f64,
}

impl Point {
    /// Creates a point, validating both coordinates.
    pub fn new(lon: f64, lat: f64) -> GeometryResult<Self> {
        if !lon.is_finite() || !lat.is_finite() {
            return Err(GeometryError::NonFinite { lon, lat });
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(GeometryError::LongitudeOutOfRange(lon));
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(GeometryError::LatitudeOutOfRange(lat));
        }
        Ok(Self { lon, lat })
    }

    /// Longitude in degrees.
    #[must_use]
    pub const fn lon(&self) -> f64 {
        self.lon
    }

    /// Latitude in degrees.
    #[must_use]
    pub const fn lat(&self) -> f64 {
        self.lat
    }

    /// Returns `[lon, lat]`.
    #[must_use]
    pub const fn to_array(&self) -> [f64; 2] {
        [self.lon, self.lat]
    }
}

impl TryFrom<[f64; 2]> for Point {
    type Error = GeometryError;

    fn try_from([lon, lat]: [f64; 2]) -> Result<Self, Self::Error> {
        Self::new(lon, lat)
    }
}

impl From<Point> for [f64; 2] {
    fn from(point: Point) -> Self {
        point.to_array()
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.lon, self.lat)
    }
}
