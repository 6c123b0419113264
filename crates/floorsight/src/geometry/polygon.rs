//! Polygon and segment value types with the measures the analysis needs.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{point_segment_distance_squared, Aabb, Point, EDGE_TOLERANCE};

/// A directed edge between two consecutive polygon vertices, tagged with the index of the
/// polygon it came from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub a: Point,
    pub b: Point,
    /// Index of the owning polygon in the floor-plan collection (0 is the boundary).
    pub owner: usize,
}

impl Segment {
    pub fn new(a: Point, b: Point, owner: usize) -> Self {
        Self { a, b, owner }
    }

    pub fn length(&self) -> f64 {
        self.a.distance(self.b)
    }

    /// Returns `true` for zero-length segments.
    pub fn is_degenerate(&self) -> bool {
        self.a == self.b
    }

    /// Point at parameter `u` along the segment (`0` is `a`, `1` is `b`).
    pub fn point_at(&self, u: f64) -> Point {
        self.a + (self.b - self.a) * u
    }

    pub fn distance_squared_to(&self, p: Point) -> f64 {
        point_segment_distance_squared(p, self.a, self.b)
    }
}

/// An implicitly closed polygon. The first vertex may or may not be repeated at the end.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Polygon {
    pub vertices: Vec<Point>,
}

impl Polygon {
    pub fn new(vertices: Vec<Point>) -> Self {
        Self { vertices }
    }

    /// Build a polygon from `[x, y]` pairs.
    pub fn from_xy(points: &[[f64; 2]]) -> Self {
        Self::new(points.iter().map(|p| Point::new(p[0], p[1])).collect())
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Returns `true` if every coordinate is finite.
    pub fn is_finite(&self) -> bool {
        self.vertices.iter().all(|v| v.is_finite())
    }

    /// Copy with consecutive duplicate vertices and a repeated closing vertex removed.
    pub fn normalized(&self) -> Polygon {
        let mut out: Vec<Point> = Vec::with_capacity(self.vertices.len());
        for &v in &self.vertices {
            if out.last() != Some(&v) {
                out.push(v);
            }
        }
        while out.len() > 1 && out.first() == out.last() {
            out.pop();
        }
        Polygon::new(out)
    }

    /// Number of distinct vertices after normalization.
    pub fn distinct_vertex_count(&self) -> usize {
        self.normalized().len()
    }

    /// Edges as `(start, end)` pairs, including the closing edge. Zero-length edges are skipped.
    pub fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let n = self.vertices.len();
        (0..n)
            .map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
            .filter(|(a, b)| a != b)
    }

    /// Edges as [`Segment`]s tagged with `owner`.
    pub fn segments(&self, owner: usize) -> impl Iterator<Item = Segment> + '_ {
        self.edges().map(move |(a, b)| Segment::new(a, b, owner))
    }

    /// Even-odd containment; points on an edge count as outside.
    pub fn contains(&self, p: Point) -> bool {
        point_in_polygon(p, &self.vertices)
    }

    /// Returns `true` if `p` lies on one of the polygon's edges.
    pub fn on_boundary(&self, p: Point) -> bool {
        point_on_boundary(p, &self.vertices)
    }

    /// Signed shoelace area; positive for counter-clockwise winding.
    pub fn signed_area(&self) -> f64 {
        let n = self.vertices.len();
        if n < 3 {
            return 0.0;
        }
        let mut twice = 0.0;
        for i in 0..n {
            let a = self.vertices[i];
            let b = self.vertices[(i + 1) % n];
            twice += a.perp_dot(b);
        }
        twice / 2.0
    }

    /// Unsigned area regardless of winding order.
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    pub fn perimeter(&self) -> f64 {
        self.edges().map(|(a, b)| a.distance(b)).sum()
    }

    /// Area centroid; falls back to the vertex mean when the area vanishes.
    pub fn centroid(&self) -> Option<Point> {
        let n = self.vertices.len();
        if n == 0 {
            return None;
        }
        let mean = self.vertices.iter().copied().sum::<Point>() / n as f64;
        let signed = self.signed_area();
        if n < 3 || signed.abs() <= f64::EPSILON * self.scale_squared() {
            return Some(mean);
        }
        // Accumulate relative to the mean to keep large coordinates well conditioned.
        let mut acc = Point::ZERO;
        for i in 0..n {
            let a = self.vertices[i] - mean;
            let b = self.vertices[(i + 1) % n] - mean;
            acc += (a + b) * a.perp_dot(b);
        }
        Some(mean + acc / (6.0 * signed))
    }

    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::from_points(self.vertices.iter().copied())
    }

    fn scale_squared(&self) -> f64 {
        self.bounds()
            .map(|b| b.extent().length_squared())
            .unwrap_or(0.0)
    }
}

impl From<Vec<Point>> for Polygon {
    fn from(vertices: Vec<Point>) -> Self {
        Polygon::new(vertices)
    }
}

/// Ray-casting even-odd test. A point exactly on an edge is reported as outside.
pub fn point_in_polygon(p: Point, vertices: &[Point]) -> bool {
    let n = vertices.len();
    if n < 3 || !p.is_finite() {
        return false;
    }
    if point_on_boundary(p, vertices) {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let vi = vertices[i];
        let vj = vertices[j];
        if (vi.y > p.y) != (vj.y > p.y) {
            let intersect_x = (vj.x - vi.x) * (p.y - vi.y) / (vj.y - vi.y) + vi.x;
            if p.x < intersect_x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Returns `true` if `p` is within [`EDGE_TOLERANCE`] of any edge of the closed polygon.
pub fn point_on_boundary(p: Point, vertices: &[Point]) -> bool {
    let n = vertices.len();
    if n == 0 {
        return false;
    }
    let tol_sq = EDGE_TOLERANCE * EDGE_TOLERANCE;
    (0..n).any(|i| point_segment_distance_squared(p, vertices[i], vertices[(i + 1) % n]) <= tol_sq)
}

/// Mean distance from `center` to the vertices of a polygon; `0.0` for an empty slice.
pub fn mean_radial_distance(center: Point, vertices: &[Point]) -> f64 {
    if vertices.is_empty() {
        return 0.0;
    }
    vertices.iter().map(|v| v.distance(center)).sum::<f64>() / vertices.len() as f64
}

/// Regular polygon with `sides` vertices on a circle, counter-clockwise from angle zero.
pub fn regular_polygon(center: Point, radius: f64, sides: usize) -> Polygon {
    let sides = sides.max(3);
    let step = std::f64::consts::TAU / sides as f64;
    Polygon::new(
        (0..sides)
            .map(|i| {
                let (sin, cos) = (i as f64 * step).sin_cos();
                center + Point::new(cos, sin) * radius
            })
            .collect(),
    )
}

/// Circle approximation with `segments` vertices.
pub fn circle_polygon(center: Point, radius: f64, segments: usize) -> Polygon {
    regular_polygon(center, radius, segments)
}
