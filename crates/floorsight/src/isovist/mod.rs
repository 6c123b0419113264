//! Isovist (visibility polygon) computation by angular sweep.
//!
//! [`visibility_polygon`] casts one ray per candidate angle from the viewpoint and keeps the
//! nearest surface each ray meets. The result is star-shaped around the viewpoint and lists its
//! vertices in increasing angle.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geometry::{
    clip_to_circle, mean_radial_distance, point_in_polygon, point_on_boundary, Point, Polygon,
};

pub mod sweep;

pub use sweep::{visibility_polygon, visibility_polygon_with};

/// Tunables for the angular sweep.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub struct IsovistConfig {
    /// Angular offset (radians) of the extra rays cast on both sides of every vertex angle.
    pub angular_epsilon: f64,
    /// Candidate angles closer than this (radians) are merged.
    pub angle_tolerance: f64,
    /// Drop coincident and collinear vertices from the result.
    pub simplify: bool,
    /// Relative sine tolerance for the collinearity test used by `simplify`.
    pub collinear_tolerance: f64,
}

impl Default for IsovistConfig {
    fn default() -> Self {
        Self {
            angular_epsilon: 1e-5,
            angle_tolerance: 1e-12,
            simplify: true,
            collinear_tolerance: 1e-9,
        }
    }
}

impl IsovistConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the angular epsilon.
    pub fn with_angular_epsilon(mut self, angular_epsilon: f64) -> Self {
        self.angular_epsilon = angular_epsilon;
        self
    }

    /// Sets the angle merge tolerance.
    pub fn with_angle_tolerance(mut self, angle_tolerance: f64) -> Self {
        self.angle_tolerance = angle_tolerance;
        self
    }

    /// Enables or disables vertex simplification.
    pub fn with_simplify(mut self, simplify: bool) -> Self {
        self.simplify = simplify;
        self
    }

    /// Sets the collinearity tolerance.
    pub fn with_collinear_tolerance(mut self, collinear_tolerance: f64) -> Self {
        self.collinear_tolerance = collinear_tolerance;
        self
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if !(self.angular_epsilon > 0.0 && self.angular_epsilon <= 1e-2) {
            return Err(Error::InvalidConfig(
                "angular_epsilon must be in (0, 0.01]".into(),
            ));
        }
        if !(self.angle_tolerance >= 0.0 && self.angle_tolerance < self.angular_epsilon) {
            return Err(Error::InvalidConfig(
                "angle_tolerance must be >= 0 and smaller than angular_epsilon".into(),
            ));
        }
        if !(self.collinear_tolerance >= 0.0 && self.collinear_tolerance.is_finite()) {
            return Err(Error::InvalidConfig(
                "collinear_tolerance must be finite and >= 0".into(),
            ));
        }
        Ok(())
    }
}

/// Region directly visible from a viewpoint.
#[derive(Clone, Debug, PartialEq)]
pub struct VisibilityPolygon {
    viewpoint: Point,
    vertices: Vec<Point>,
    /// Sorted collection indices of every polygon some sweep ray landed on.
    seen: Vec<usize>,
}

impl VisibilityPolygon {
    pub(crate) fn new(viewpoint: Point, vertices: Vec<Point>, seen: Vec<usize>) -> Self {
        Self {
            viewpoint,
            vertices,
            seen,
        }
    }

    pub fn viewpoint(&self) -> Point {
        self.viewpoint
    }

    /// Vertices in increasing angle around the viewpoint, starting near `-PI`.
    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    pub fn into_vertices(self) -> Vec<Point> {
        self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Even-odd containment; points on the isovist edge count as outside.
    pub fn contains(&self, p: Point) -> bool {
        point_in_polygon(p, &self.vertices)
    }

    /// Returns `true` if `p` is inside the isovist or on its edge.
    pub fn reaches(&self, p: Point) -> bool {
        self.contains(p) || point_on_boundary(p, &self.vertices)
    }

    /// Returns `true` if the sweep reached some part of the polygon with this collection index.
    pub fn sees(&self, index: usize) -> bool {
        self.seen.binary_search(&index).is_ok()
    }

    /// Collection indices of all polygons with a visible part, ascending.
    pub fn seen_polygons(&self) -> &[usize] {
        &self.seen
    }

    pub fn area(&self) -> f64 {
        self.as_polygon().area()
    }

    pub fn perimeter(&self) -> f64 {
        self.as_polygon().perimeter()
    }

    /// Mean distance from the viewpoint to the isovist vertices.
    pub fn mean_radial_distance(&self) -> f64 {
        mean_radial_distance(self.viewpoint, &self.vertices)
    }

    pub fn as_polygon(&self) -> Polygon {
        Polygon::new(self.vertices.clone())
    }

    /// Part of the isovist within `radius` of the viewpoint, using a circle of `segments` sides.
    pub fn clip_to_radius(&self, radius: f64, segments: usize) -> Polygon {
        Polygon::new(clip_to_circle(
            &self.vertices,
            self.viewpoint,
            radius,
            segments,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(IsovistConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_values() {
        assert!(IsovistConfig::new()
            .with_angular_epsilon(0.0)
            .validate()
            .is_err());
        assert!(IsovistConfig::new()
            .with_angular_epsilon(f64::NAN)
            .validate()
            .is_err());
        assert!(IsovistConfig::new()
            .with_angle_tolerance(1e-3)
            .validate()
            .is_err());
        assert!(IsovistConfig::new()
            .with_collinear_tolerance(-1.0)
            .validate()
            .is_err());
    }

    #[test]
    fn builder_sets_fields() {
        let config = IsovistConfig::new()
            .with_angular_epsilon(1e-4)
            .with_angle_tolerance(1e-10)
            .with_simplify(false)
            .with_collinear_tolerance(1e-6);
        assert_eq!(config.angular_epsilon, 1e-4);
        assert_eq!(config.angle_tolerance, 1e-10);
        assert!(!config.simplify);
        assert_eq!(config.collinear_tolerance, 1e-6);
    }

    #[test]
    fn measures_of_a_square_isovist() {
        let vis = VisibilityPolygon::new(
            Point::new(50.0, 50.0),
            vec![
                Point::new(0.0, 0.0),
                Point::new(100.0, 0.0),
                Point::new(100.0, 100.0),
                Point::new(0.0, 100.0),
            ],
            vec![0],
        );
        assert_eq!(vis.area(), 10_000.0);
        assert_eq!(vis.perimeter(), 400.0);
        assert!((vis.mean_radial_distance() - 50.0 * 2f64.sqrt()).abs() < 1e-9);
        assert!(vis.contains(Point::new(10.0, 90.0)));
        assert!(vis.sees(0));
        assert!(!vis.sees(1));

        let clipped = vis.clip_to_radius(10.0, 64);
        assert!(clipped.area() < 315.0 && clipped.area() > 300.0);
    }
}
