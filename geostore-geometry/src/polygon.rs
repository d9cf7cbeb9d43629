//! Simple polygons described by a single closed ring.

use crate::bbox::BoundingBox;
use crate::error::{GeometryError, GeometryResult};
use crate::point::Point;
use serde::{Deserialize, Serialize};

/// A polygon given by its exterior ring.
///
/// The ring is closed (first point equals last), has at least four points and
/// at least three distinct vertices. Self-intersection is NOT checked: the
/// predicates assume a simple ring and their result is unspecified otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Point>", into = "Vec<Point>")]
pub struct Polygon {
    ring: Vec<Point>,
}

impl Polygon {
    /// Creates a polygon from a closed ring.
    pub fn new(ring: Vec<Point>) -> GeometryResult<Self> {
        if ring.len() < 4 {
            return Err(GeometryError::TooFewPoints(ring.len()));
        }
        if ring.first() != ring.last() {
            return Err(GeometryError::UnclosedRing);
        }

        let open = &ring[..ring.len() - 1];
        let mut distinct: Vec<&Point> = Vec::with_capacity(3);
        for p in open {
            if !distinct.contains(&p) {
                distinct.push(p);
                if distinct.len() == 3 {
                    break;
                }
            }
        }
        if distinct.len() < 3 {
            return Err(GeometryError::DegenerateRing);
        }

        Ok(Self { ring })
    }

    /// Builds a polygon from `[lon, lat]` pairs.
    pub fn from_coords(coords: &[[f64; 2]]) -> GeometryResult<Self> {
        let ring = coords
            .iter()
            .map(|&[lon, lat]| Point::new(lon, lat))
            .collect::<GeometryResult<Vec<_>>>()?;
        Self::new(ring)
    }

    /// The full closed ring, closing point included.
    #[must_use]
    pub fn ring(&self) -> &[Point] {
        &self.ring
    }

    /// Ring vertices without the repeated closing point.
    #[must_use]
    pub fn vertices(&self) -> &[Point] {
        &self.ring[..self.ring.len() - 1]
    }

    /// Iterates over the ring's edges as `(start, end)` pairs.
    pub fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.ring.windows(2).map(|w| (w[0], w[1]))
    }

    /// Smallest axis-aligned box containing the ring.
    #[must_use]
    pub fn bounding_box(&self) -> BoundingBox {
        let mut bbox = BoundingBox::from_point(&self.ring[0]);
        for p in &self.ring[1..] {
            bbox.expand_to(p);
        }
        bbox
    }
}

impl TryFrom<Vec<Point>> for Polygon {
    type Error = GeometryError;

    fn try_from(ring: Vec<Point>) -> Result<Self, Self::Error> {
        Self::new(ring)
    }
}

impl From<Polygon> for Vec<Point> {
    fn from(polygon: Polygon) -> Self {
        polygon.ring
    }
}
