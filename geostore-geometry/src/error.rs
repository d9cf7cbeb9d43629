//! Error types for geometry construction.

use thiserror::Error;

/// Result type for geometry operations.
pub type GeometryResult<T> = Result<T, GeometryError>;

/// Reasons a point or polygon is rejected.
///
/// Every variant is an "invalid geometry" failure from the caller's point of
/// view; the variants only say which rule was broken.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// A coordinate is NaN or infinite.
    #[error("invalid geometry: coordinate ({lon}, {lat}) is not finite")]
    NonFinite { lon: f64, lat: f64 },

    /// Longitude outside [-180, 180].
    #[error("invalid geometry: longitude {0} outside [-180, 180]")]
    LongitudeOutOfRange(f64),

    /// Latitude outside [-90, 90].
    #[error("invalid geometry: latitude {0} outside [-90, 90]")]
    LatitudeOutOfRange(f64),

    /// Polygon ring shorter than four points.
    #[error("invalid geometry: polygon ring needs at least 4 points, got {0}")]
    TooFewPoints(usize),

    /// First and last ring points differ.
    #[error("invalid geometry: polygon ring is not closed")]
    UnclosedRing,

    /// Fewer than three distinct vertices.
    #[error("invalid geometry: polygon ring has fewer than 3 distinct vertices")]
    DegenerateRing,
}
