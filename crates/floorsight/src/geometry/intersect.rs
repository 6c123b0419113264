//! Ray/segment intersection.
//!
//! Solves `origin + t * dir = a + u * (b - a)` for `t >= 0` and `u in [0, 1]`. Parallel rays,
//! zero-length segments and non-finite input report no hit instead of failing; the sweep treats
//! a missing hit from one segment as "this segment is not in the way".
use super::Point;

/// Relative tolerance below which ray and segment are treated as parallel.
const PARALLEL_TOLERANCE: f64 = 1e-12;

/// Slack on the segment parameter so rays aimed exactly at a shared vertex still register a hit.
const PARAM_TOLERANCE: f64 = 1e-9;

/// Intersection of a ray with a segment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    /// Intersection point. Snapped to the segment endpoint when `u` is within tolerance of it.
    pub point: Point,
    /// Ray parameter; the distance along the ray when `dir` is unit length.
    pub t: f64,
    /// Segment parameter in `[0, 1]`.
    pub u: f64,
}

impl RayHit {
    /// Returns `true` if the hit landed on one of the segment's endpoints.
    pub fn at_endpoint(&self) -> bool {
        self.u == 0.0 || self.u == 1.0
    }
}

/// Intersect the ray `origin + t * dir` (`t >= 0`) with the segment `a..b`.
pub fn segment_intersect(origin: Point, dir: Point, a: Point, b: Point) -> Option<RayHit> {
    let (t, u) = solve(origin, dir, a, b)?;
    if t < 0.0 || u < -PARAM_TOLERANCE || u > 1.0 + PARAM_TOLERANCE {
        return None;
    }
    let (point, u) = if u <= PARAM_TOLERANCE {
        (a, 0.0)
    } else if u >= 1.0 - PARAM_TOLERANCE {
        (b, 1.0)
    } else {
        (origin + dir * t, u)
    };
    Some(RayHit { point, t, u })
}

fn solve(origin: Point, dir: Point, a: Point, b: Point) -> Option<(f64, f64)> {
    let s = b - a;
    let s_len_sq = s.length_squared();
    let d_len_sq = dir.length_squared();
    if s_len_sq == 0.0 || d_len_sq == 0.0 {
        return None;
    }
    let denom = dir.perp_dot(s);
    if !denom.is_finite() || denom.abs() <= PARALLEL_TOLERANCE * (s_len_sq * d_len_sq).sqrt() {
        return None;
    }
    let w = a - origin;
    let t = w.perp_dot(s) / denom;
    let u = w.perp_dot(dir) / denom;
    (t.is_finite() && u.is_finite()).then_some((t, u))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hits_segment_in_front_of_ray() {
        let hit = segment_intersect(
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(5.0, -1.0),
            Point::new(5.0, 1.0),
        )
        .expect("hit");
        assert!((hit.t - 5.0).abs() < 1e-12);
        assert!((hit.u - 0.5).abs() < 1e-12);
        assert_eq!(hit.point, Point::new(5.0, 0.0));
        assert!(!hit.at_endpoint());
    }

    #[test]
    fn misses_segment_behind_ray() {
        assert!(segment_intersect(
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(-5.0, -1.0),
            Point::new(-5.0, 1.0),
        )
        .is_none());
    }

    #[test]
    fn misses_when_passing_beside_segment() {
        assert!(segment_intersect(
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(5.0, 1.0),
            Point::new(5.0, 2.0),
        )
        .is_none());
    }

    #[test]
    fn parallel_and_zero_length_report_no_hit() {
        let origin = Point::new(0.0, 0.0);
        let dir = Point::new(1.0, 0.0);
        assert!(segment_intersect(origin, dir, Point::new(1.0, 0.0), Point::new(5.0, 0.0)).is_none());
        assert!(segment_intersect(origin, dir, Point::new(1.0, 1.0), Point::new(5.0, 1.0)).is_none());
        assert!(segment_intersect(origin, dir, Point::new(3.0, 0.0), Point::new(3.0, 0.0)).is_none());
        assert!(segment_intersect(origin, Point::ZERO, Point::new(3.0, -1.0), Point::new(3.0, 1.0)).is_none());
    }

    #[test]
    fn ray_through_vertex_snaps_to_endpoint() {
        let origin = Point::new(50.0, 50.0);
        let corner = Point::new(100.0, 100.0);
        let angle = (corner - origin).y.atan2((corner - origin).x);
        let dir = Point::new(angle.cos(), angle.sin());

        let right = segment_intersect(origin, dir, Point::new(100.0, 0.0), corner).expect("right wall");
        let top = segment_intersect(origin, dir, corner, Point::new(0.0, 100.0)).expect("top wall");
        assert_eq!(right.point, corner);
        assert_eq!(top.point, corner);
        assert!(right.at_endpoint() && top.at_endpoint());
    }
}
