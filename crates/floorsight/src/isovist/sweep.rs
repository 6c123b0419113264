//! Angular sweep over the flattened segment list.
//!
//! For every segment endpoint the sweep casts three rays: at the endpoint's angle and at that
//! angle plus and minus `angular_epsilon`. The side rays resolve which way a ray grazing a
//! corner continues. When the corner-angle ray still meets the segment a side ray struck, the hit
//! is moved there, so shadow edges come out as exact radial edges instead of `epsilon`-wide
//! slivers. Vertices are emitted in order of the angle they end up at.
//! Cost is `O(A * E)` for `A` candidate angles and `E` segments.
use tracing::debug;

use super::{IsovistConfig, VisibilityPolygon};
use crate::error::{Error, Result};
use crate::floorplan::FloorPlan;
use crate::geometry::{segment_intersect, wrap_angle, Point, RayHit, Segment};

/// Largest accepted shift of a projected side-ray hit, in multiples of `epsilon * t`.
const MAX_PROJECTION_SHIFT: f64 = 1e3;

/// Coincidence tolerance for result vertices, relative to the plan's extent.
const COINCIDENT_TOLERANCE: f64 = 1e-9;

#[derive(Clone, Copy, Debug)]
struct Ray {
    /// Angle the ray is cast at, in `[-PI, PI)`.
    cast: f64,
    /// Vertex angle the hit is reported at.
    base: f64,
}

impl Ray {
    fn is_center(&self) -> bool {
        self.cast == wrap_angle(self.base)
    }
}

#[derive(Clone, Copy, Debug)]
struct SweepVertex {
    point: Point,
    /// Angle the point is reported at.
    angle: f64,
    /// Offset of the cast ray from `angle`; orders vertices sharing an angle.
    offset: f64,
    /// Hit landed exactly on a segment endpoint.
    exact: bool,
}

/// Compute the visibility polygon of `viewpoint` with the default [`IsovistConfig`].
pub fn visibility_polygon(plan: &FloorPlan, viewpoint: Point) -> Result<VisibilityPolygon> {
    visibility_polygon_with(plan, viewpoint, &IsovistConfig::default())
}

/// Compute the visibility polygon of `viewpoint` against every boundary and obstacle edge.
///
/// Fails with [`Error::ViewpointOutsideBoundary`] or [`Error::ViewpointInsideObstacle`] for
/// viewpoints outside free space, and with [`Error::NumericalDegeneracy`] if some ray meets no
/// segment at all.
pub fn visibility_polygon_with(
    plan: &FloorPlan,
    viewpoint: Point,
    config: &IsovistConfig,
) -> Result<VisibilityPolygon> {
    config.validate()?;
    plan.check_viewpoint(viewpoint)?;

    let segments = plan.segments();
    let rays = candidate_rays(viewpoint, segments, config);

    let mut seen = vec![false; plan.polygons().len()];
    let mut vertices: Vec<SweepVertex> = Vec::with_capacity(rays.len());
    for ray in &rays {
        let dir = Point::new(ray.cast.cos(), ray.cast.sin());
        let (hit, segment) = nearest_hit(viewpoint, dir, segments)
            .ok_or(Error::NumericalDegeneracy { angle: ray.cast })?;
        seen[segment.owner] = true;

        let projected = if ray.is_center() {
            None
        } else {
            project_to_base(viewpoint, ray, &hit, segment, config.angular_epsilon)
        };
        let vertex = match projected {
            Some(point) => {
                let angle = wrap_angle(ray.base);
                SweepVertex {
                    point,
                    angle,
                    offset: wrap_angle(ray.cast - angle),
                    exact: false,
                }
            }
            None => SweepVertex {
                point: hit.point,
                angle: ray.cast,
                offset: 0.0,
                exact: ray.is_center() && hit.at_endpoint(),
            },
        };
        vertices.push(vertex);
    }
    vertices.sort_by(|a, b| a.angle.total_cmp(&b.angle).then(a.offset.total_cmp(&b.offset)));

    let raw_count = vertices.len();
    let points = if config.simplify {
        let scale = plan.bounds().extent().length().max(1.0);
        let merged = merge_coincident(vertices, COINCIDENT_TOLERANCE * scale);
        drop_collinear(merged, config.collinear_tolerance)
    } else {
        vertices.into_iter().map(|v| v.point).collect()
    };

    let seen: Vec<usize> = seen
        .iter()
        .enumerate()
        .filter_map(|(index, hit)| hit.then_some(index))
        .collect();

    debug!(
        "Isovist at ({:.3}, {:.3}): {} segments, {} rays, {} vertices.",
        viewpoint.x,
        viewpoint.y,
        segments.len(),
        raw_count,
        points.len()
    );

    Ok(VisibilityPolygon::new(viewpoint, points, seen))
}

/// Sorted, deduplicated sweep rays for every segment endpoint.
fn candidate_rays(viewpoint: Point, segments: &[Segment], config: &IsovistConfig) -> Vec<Ray> {
    let eps = config.angular_epsilon;
    let mut rays: Vec<Ray> = Vec::with_capacity(segments.len() * 3);
    // Polygons are closed, so every vertex is the start of exactly one segment.
    for segment in segments {
        let d = segment.a - viewpoint;
        let base = d.y.atan2(d.x);
        for cast in [base - eps, base, base + eps] {
            rays.push(Ray {
                cast: wrap_angle(cast),
                base,
            });
        }
    }
    rays.sort_by(|a, b| a.cast.total_cmp(&b.cast));

    let tol = config.angle_tolerance;
    let mut unique: Vec<Ray> = Vec::with_capacity(rays.len());
    for ray in rays {
        match unique.last_mut() {
            Some(last) if ray.cast - last.cast <= tol => {
                if ray.is_center() && !last.is_center() {
                    *last = ray;
                }
            }
            _ => unique.push(ray),
        }
    }
    if unique.len() > 1 {
        let first = unique[0];
        let last = unique[unique.len() - 1];
        if first.cast + std::f64::consts::TAU - last.cast <= tol {
            if last.is_center() && !first.is_center() {
                unique[0] = last;
            }
            unique.pop();
        }
    }
    unique
}

/// Nearest intersection along the ray; ties keep the first segment in list order.
fn nearest_hit(origin: Point, dir: Point, segments: &[Segment]) -> Option<(RayHit, &Segment)> {
    let mut best: Option<(RayHit, &Segment)> = None;
    for segment in segments {
        let Some(hit) = segment_intersect(origin, dir, segment.a, segment.b) else {
            continue;
        };
        if best.as_ref().is_none_or(|(b, _)| hit.t < b.t) {
            best = Some((hit, segment));
        }
    }
    best
}

/// Where the base-angle ray meets the segment a side ray struck.
///
/// `None` when the base-angle ray misses that segment or lands too far from the side hit.
fn project_to_base(
    viewpoint: Point,
    ray: &Ray,
    hit: &RayHit,
    segment: &Segment,
    eps: f64,
) -> Option<Point> {
    let base_dir = Point::new(ray.base.cos(), ray.base.sin());
    let projected = segment_intersect(viewpoint, base_dir, segment.a, segment.b)?;
    let shift = projected.point.distance(hit.point);
    (shift <= MAX_PROJECTION_SHIFT * eps * hit.t.max(projected.t)).then_some(projected.point)
}

/// Collapse runs of (cyclically) consecutive vertices closer than `tol`, preferring exact hits.
fn merge_coincident(vertices: Vec<SweepVertex>, tol: f64) -> Vec<SweepVertex> {
    let mut out: Vec<SweepVertex> = Vec::with_capacity(vertices.len());
    for v in vertices {
        match out.last_mut() {
            Some(last) if last.point.distance(v.point) <= tol => {
                if v.exact && !last.exact {
                    *last = v;
                }
            }
            _ => out.push(v),
        }
    }
    while out.len() > 1 {
        let first = out[0];
        let last = out[out.len() - 1];
        if first.point.distance(last.point) > tol {
            break;
        }
        if last.exact && !first.exact {
            out[0] = last;
        }
        out.pop();
    }
    out
}

/// Remove vertices lying strictly between their neighbours on a straight line.
fn drop_collinear(vertices: Vec<SweepVertex>, tol: f64) -> Vec<Point> {
    let mut out: Vec<Point> = Vec::with_capacity(vertices.len());
    for v in vertices {
        while out.len() >= 2 && is_pass_through(out[out.len() - 2], out[out.len() - 1], v.point, tol) {
            out.pop();
        }
        out.push(v.point);
    }
    while out.len() >= 3 {
        let n = out.len();
        if is_pass_through(out[n - 2], out[n - 1], out[0], tol) {
            out.pop();
        } else if is_pass_through(out[n - 1], out[0], out[1], tol) {
            out.remove(0);
        } else {
            break;
        }
    }
    out
}

fn is_pass_through(prev: Point, mid: Point, next: Point, tol: f64) -> bool {
    let a = mid - prev;
    let b = next - mid;
    let scale = a.length() * b.length();
    scale > 0.0 && a.perp_dot(b).abs() <= tol * scale && a.dot(b) > 0.0
}
