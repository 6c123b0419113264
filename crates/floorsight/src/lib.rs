#![forbid(unsafe_code)]
//! floorsight: isovists and feature detectability heatmaps for 2D floor plans.
//!
//! Modules:
//! - geometry: points, segments, polygons, intersection and clipping primitives
//! - floorplan: validated boundary plus obstacles, flattened into a segment list
//! - isovist: visibility polygon of a viewpoint by angular sweep
//! - sensitivity: features attached to obstacles and their detectability from a viewpoint
//! - heatmap: parallel sampling of aggregated detectability over the free space
//! - scene: editable state with versioned snapshots for concurrent computations
//! - api: JSON request/response contracts (feature `json`)
//!
//! For examples, see the `floorsight_examples` crate.
pub mod cancel;
pub mod error;
pub mod floorplan;
pub mod geometry;
pub mod heatmap;
pub mod isovist;
pub mod scene;
pub mod sensitivity;

#[cfg(feature = "json")]
pub mod api;

/// Convenient re-exports for common types. Import with `use floorsight::prelude::*;`.
pub mod prelude {
    pub use crate::cancel::CancelToken;
    pub use crate::error::{Error, ErrorKind, Result};
    pub use crate::floorplan::{FloorPlan, Location, BOUNDARY_INDEX};
    pub use crate::geometry::{Aabb, Point, Polygon, Segment};
    pub use crate::heatmap::{
        compute_heatmap, score_viewpoint, AggregationPolicy, CellScore, HeatmapConfig,
        HeatmapGrid, HeatmapStats,
    };
    pub use crate::isovist::{
        visibility_polygon, visibility_polygon_with, IsovistConfig, VisibilityPolygon,
    };
    pub use crate::scene::{Scene, Snapshot};
    pub use crate::sensitivity::{
        detectability, ContrastSensitivity, ExponentialFalloff, Feature, FeatureTable,
        FnSensitivity, FrequencyComponent, SensitivityModel, ViewContext,
    };
}
