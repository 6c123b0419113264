//! Sutherland–Hodgman clipping against convex polygons.
use super::{circle_polygon, Point, Polygon};

/// Clip `subject` against a convex `clip` polygon of either winding.
///
/// The subject may be concave; the result is empty when the polygons do not overlap.
pub fn clip_polygon_by_convex(subject: &[Point], clip: &[Point]) -> Vec<Point> {
    if subject.len() < 3 || clip.len() < 3 {
        return Vec::new();
    }
    let orientation = Polygon::new(clip.to_vec()).signed_area().signum();
    if orientation == 0.0 {
        return Vec::new();
    }

    let mut output = subject.to_vec();
    for i in 0..clip.len() {
        if output.is_empty() {
            break;
        }
        let c0 = clip[i];
        let c1 = clip[(i + 1) % clip.len()];
        let edge = c1 - c0;
        let side = |p: Point| edge.perp_dot(p - c0) * orientation;

        let input = std::mem::take(&mut output);
        let mut prev = input[input.len() - 1];
        let mut prev_side = side(prev);
        for &cur in &input {
            let cur_side = side(cur);
            if cur_side >= 0.0 {
                if prev_side < 0.0 {
                    output.push(crossing(prev, cur, prev_side, cur_side));
                }
                output.push(cur);
            } else if prev_side >= 0.0 {
                output.push(crossing(prev, cur, prev_side, cur_side));
            }
            prev = cur;
            prev_side = cur_side;
        }
    }
    output
}

/// Intersection of a polygon with a circle approximated by `segments` vertices.
pub fn clip_to_circle(subject: &[Point], center: Point, radius: f64, segments: usize) -> Vec<Point> {
    if !(radius > 0.0) {
        return Vec::new();
    }
    let circle = circle_polygon(center, radius, segments);
    clip_polygon_by_convex(subject, &circle.vertices)
}

fn crossing(p: Point, q: Point, p_side: f64, q_side: f64) -> Point {
    let t = p_side / (p_side - q_side);
    p + (q - p) * t
}
