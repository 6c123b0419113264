//! Validated floor plan: one boundary polygon plus opaque obstacles, flattened into segments.
//!
//! Index 0 of the polygon collection is the boundary (outer wall); indices `1..` are obstacles.
//! The same indices tag every [`Segment`] and key the feature table.
use tracing::debug;

use crate::error::{Error, Result};
use crate::geometry::{Aabb, Point, Polygon, Segment};

/// Index of the boundary polygon in the collection.
pub const BOUNDARY_INDEX: usize = 0;

/// Where a point sits relative to the floor plan.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Location {
    /// Inside the boundary and outside every obstacle.
    Free,
    /// Outside the boundary, on its edge, or non-finite.
    OutsideBoundary,
    /// Inside, or on an edge of, the obstacle with this collection index.
    InsideObstacle(usize),
}

/// Boundary and obstacles with the flattened segment list used by the sweep.
#[derive(Clone, Debug)]
pub struct FloorPlan {
    polygons: Vec<Polygon>,
    segments: Vec<Segment>,
    bounds: Aabb,
}

impl FloorPlan {
    /// Validate and index a boundary plus obstacles.
    pub fn build(boundary: Polygon, obstacles: Vec<Polygon>) -> Result<Self> {
        let mut polygons = Vec::with_capacity(obstacles.len() + 1);
        polygons.push(boundary);
        polygons.extend(obstacles);
        Self::from_polygons(polygons)
    }

    /// Build from a collection whose first entry is the boundary.
    pub fn from_polygons(polygons: Vec<Polygon>) -> Result<Self> {
        if polygons.is_empty() {
            return Err(Error::EmptyObstacleSet);
        }

        let mut normalized = Vec::with_capacity(polygons.len());
        for (index, polygon) in polygons.iter().enumerate() {
            let role = if index == BOUNDARY_INDEX {
                "boundary".to_string()
            } else {
                format!("obstacle {index}")
            };
            if !polygon.is_finite() {
                return Err(Error::InvalidGeometry(format!(
                    "{role} has non-finite coordinates"
                )));
            }
            let poly = polygon.normalized();
            if poly.len() < 3 {
                return Err(Error::InvalidGeometry(format!(
                    "{role} has {} distinct vertices; at least 3 are required",
                    poly.len()
                )));
            }
            if poly.area() == 0.0 {
                return Err(Error::InvalidGeometry(format!("{role} has zero area")));
            }
            normalized.push(poly);
        }

        let bounds = normalized[BOUNDARY_INDEX]
            .bounds()
            .ok_or_else(|| Error::InvalidGeometry("boundary has no vertices".into()))?;
        let segments: Vec<Segment> = normalized
            .iter()
            .enumerate()
            .flat_map(|(index, poly)| poly.segments(index).collect::<Vec<_>>())
            .collect();

        debug!(
            "Floor plan built: {} obstacles, {} segments.",
            normalized.len() - 1,
            segments.len()
        );

        Ok(Self {
            polygons: normalized,
            segments,
            bounds,
        })
    }

    pub fn boundary(&self) -> &Polygon {
        &self.polygons[BOUNDARY_INDEX]
    }

    /// Obstacles only, in collection order (collection index = slice index + 1).
    pub fn obstacles(&self) -> &[Polygon] {
        &self.polygons[BOUNDARY_INDEX + 1..]
    }

    /// Boundary followed by obstacles.
    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    /// Polygon at a collection index (0 is the boundary).
    pub fn polygon(&self, index: usize) -> Option<&Polygon> {
        self.polygons.get(index)
    }

    /// Obstacle at a collection index; `None` for the boundary or an out-of-range index.
    pub fn obstacle(&self, index: usize) -> Option<&Polygon> {
        if index == BOUNDARY_INDEX {
            return None;
        }
        self.polygons.get(index)
    }

    pub fn obstacle_count(&self) -> usize {
        self.polygons.len() - 1
    }

    /// Every boundary and obstacle edge.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Bounding box of the boundary.
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    /// Classify a point against the boundary and every obstacle.
    ///
    /// A point on an obstacle edge is reported as inside that obstacle so a valid viewpoint
    /// never sits on an occluding segment.
    pub fn classify(&self, p: Point) -> Location {
        if !p.is_finite() || !self.bounds.contains(p) || !self.boundary().contains(p) {
            return Location::OutsideBoundary;
        }
        for (index, obstacle) in self.polygons.iter().enumerate().skip(1) {
            if obstacle.contains(p) || obstacle.on_boundary(p) {
                return Location::InsideObstacle(index);
            }
        }
        Location::Free
    }

    /// `true` iff `p` is inside the boundary and outside every obstacle.
    pub fn is_free_space(&self, p: Point) -> bool {
        self.classify(p) == Location::Free
    }

    /// Validate a viewpoint, returning the matching error when it is not in free space.
    pub fn check_viewpoint(&self, p: Point) -> Result<()> {
        match self.classify(p) {
            Location::Free => Ok(()),
            Location::OutsideBoundary => Err(Error::ViewpointOutsideBoundary { x: p.x, y: p.y }),
            Location::InsideObstacle(index) => Err(Error::ViewpointInsideObstacle {
                index,
                x: p.x,
                y: p.y,
            }),
        }
    }

    /// Copy of this plan with one more obstacle.
    pub fn with_obstacle(&self, obstacle: Polygon) -> Result<Self> {
        let mut polygons = self.polygons.clone();
        polygons.push(obstacle);
        Self::from_polygons(polygons)
    }
}
