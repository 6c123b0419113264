//! Planar geometry primitives used by the floor-plan model and the isovist sweep.
//!
//! Points are [`glam::DVec2`] in floor-plan (viewbox) units. Polygons are plain vertex lists,
//! implicitly closed. Everything here is a value type or a free function over slices.
use glam::DVec2;

pub mod bounds;
pub mod clip;
pub mod intersect;
pub mod polygon;

pub use bounds::Aabb;
pub use clip::{clip_polygon_by_convex, clip_to_circle};
pub use intersect::{segment_intersect, RayHit};
pub use polygon::{
    circle_polygon, mean_radial_distance, point_in_polygon, point_on_boundary, regular_polygon,
    Polygon, Segment,
};

/// A point in floor-plan coordinates.
pub type Point = DVec2;

/// Distance below which a point is considered to lie on an edge.
pub const EDGE_TOLERANCE: f64 = 1e-9;

/// Euclidean distance between two points.
#[inline]
pub fn distance(a: Point, b: Point) -> f64 {
    a.distance(b)
}

/// Squared distance from `p` to the closed segment `a..b`.
pub fn point_segment_distance_squared(p: Point, a: Point, b: Point) -> f64 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq == 0.0 {
        return p.distance_squared(a);
    }
    let u = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance_squared(a + ab * u)
}

/// Normalize an angle into `[-PI, PI)`.
#[inline]
pub fn wrap_angle(angle: f64) -> f64 {
    use std::f64::consts::{PI, TAU};
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped >= PI {
        wrapped - TAU
    } else {
        wrapped
    }
}
