//! Exact spatial predicates.
//!
//! Everything here is planar math on longitude/latitude degrees except
//! [`distance`], which projects onto a local equirectangular plane and scales
//! by the Earth's mean radius.

use crate::point::Point;
use crate::polygon::Polygon;

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Cross products smaller than this (in square degrees) count as collinear.
const COLLINEAR_EPSILON: f64 = 1e-12;

/// Approximate distance in meters between two points.
///
/// Equirectangular projection around the mean latitude of the two points.
/// Accurate to well under a percent for separations below ~50 km; it is not
/// a geodesic distance and does not wrap across the antimeridian.
#[must_use]
pub fn distance(p1: &Point, p2: &Point) -> f64 {
    let phi1 = p1.lat().to_radians();
    let phi2 = p2.lat().to_radians();
    let x = (p2.lon() - p1.lon()).to_radians() * ((phi1 + phi2) * 0.5).cos();
    let y = phi2 - phi1;
    EARTH_RADIUS_METERS * x.hypot(y)
}

/// Signed area of the triangle `a, b, c` times two.
fn cross(a: &Point, b: &Point, c: &Point) -> f64 {
    (b.lon() - a.lon()) * (c.lat() - a.lat()) - (b.lat() - a.lat()) * (c.lon() - a.lon())
}

/// -1, 0 or 1 depending on which side of `a -> b` the point `c` falls.
fn orientation(a: &Point, b: &Point, c: &Point) -> i8 {
    let value = cross(a, b, c);
    if value.abs() <= COLLINEAR_EPSILON {
        0
    } else if value > 0.0 {
        1
    } else {
        -1
    }
}

/// True when `c`, already known to be collinear with `a -> b`, lies within
/// the segment's extent.
fn within_extent(a: &Point, b: &Point, c: &Point) -> bool {
    c.lon() >= a.lon().min(b.lon())
        && c.lon() <= a.lon().max(b.lon())
        && c.lat() >= a.lat().min(b.lat())
        && c.lat() <= a.lat().max(b.lat())
}

/// True when `p` lies on the closed segment `a -> b`.
#[must_use]
pub fn point_on_segment(p: &Point, a: &Point, b: &Point) -> bool {
    orientation(a, b, p) == 0 && within_extent(a, b, p)
}

/// True when the closed segments `p1 -> p2` and `q1 -> q2` share a point,
/// touching endpoints and collinear overlap included.
#[must_use]
pub fn segments_intersect(p1: &Point, p2: &Point, q1: &Point, q2: &Point) -> bool {
    let o1 = orientation(p1, p2, q1);
    let o2 = orientation(p1, p2, q2);
    let o3 = orientation(q1, q2, p1);
    let o4 = orientation(q1, q2, p2);

    if o1 != o2 && o3 != o4 {
        return true;
    }

    (o1 == 0 && within_extent(p1, p2, q1))
        || (o2 == 0 && within_extent(p1, p2, q2))
        || (o3 == 0 && within_extent(q1, q2, p1))
        || (o4 == 0 && within_extent(q1, q2, p2))
}

/// Ray-casting point-in-polygon test.
///
/// Points on an edge or vertex count as inside.
#[must_use]
pub fn point_in_polygon(p: &Point, poly: &Polygon) -> bool {
    if !poly.bounding_box().contains_point(p) {
        return false;
    }

    if poly.edges().any(|(a, b)| point_on_segment(p, &a, &b)) {
        return true;
    }

    let (x, y) = (p.lon(), p.lat());
    let mut inside = false;
    for (a, b) in poly.edges() {
        if (a.lat() > y) != (b.lat() > y) {
            let x_cross = (b.lon() - a.lon()) * (y - a.lat()) / (b.lat() - a.lat()) + a.lon();
            if x < x_cross {
                inside = !inside;
            }
        }
    }
    inside
}

/// True when the two polygons share any area or boundary point.
///
/// Covers partial overlap (some pair of edges intersects) and full
/// containment (a vertex of one polygon lies inside the other).
#[must_use]
pub fn polygons_overlap(a: &Polygon, b: &Polygon) -> bool {
    if !a.bounding_box().intersects(&b.bounding_box()) {
        return false;
    }

    for (a1, a2) in a.edges() {
        for (b1, b2) in b.edges() {
            if segments_intersect(&a1, &a2, &b1, &b2) {
                return true;
            }
        }
    }

    a.vertices().iter().any(|v| point_in_polygon(v, b))
        || b.vertices().iter().any(|v| point_in_polygon(v, a))
}
