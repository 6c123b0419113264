//! Allocentric heatmap: feature detectability sampled over the free space.
//!
//! The bounding box of the boundary is covered by a regular grid. Every cell center in free
//! space gets its own isovist, every registered feature is scored against it, and the scores are
//! combined by an [`AggregationPolicy`]. Cells are independent, so the grid is filled in
//! parallel over disjoint row bands with `rayon`.
use rayon::prelude::*;
use tracing::{info, warn};

use crate::cancel::CancelToken;
use crate::error::{Error, Result};
use crate::floorplan::FloorPlan;
use crate::geometry::Point;
use crate::isovist::{visibility_polygon_with, IsovistConfig, VisibilityPolygon};
use crate::sensitivity::{detectability, ContrastSensitivity, FeatureTable, SensitivityModel, ViewContext};

pub mod aggregate;
pub mod grid;

pub use aggregate::AggregationPolicy;
pub use grid::{CellScore, GridLayout, HeatmapGrid, HeatmapStats};

/// Configuration for a heatmap computation.
#[non_exhaustive]
#[derive(Clone, Debug)]
pub struct HeatmapConfig {
    /// Distance between neighbouring sample points, in floor-plan units.
    pub spacing: f64,
    /// Sweep settings used for every cell.
    pub isovist: IsovistConfig,
    /// How feature scores combine within a cell.
    pub aggregation: AggregationPolicy,
    /// Contrast-sensitivity curve used for scoring.
    pub sensitivity: SensitivityModel,
    /// Worker threads; `None` runs on the global rayon pool.
    pub threads: Option<usize>,
    /// Grid rows per parallel work item.
    pub band_rows: usize,
    /// Largest grid accepted before any work starts.
    pub max_cells: usize,
}

impl Default for HeatmapConfig {
    fn default() -> Self {
        Self {
            spacing: 10.0,
            isovist: IsovistConfig::default(),
            aggregation: AggregationPolicy::default(),
            sensitivity: SensitivityModel::default(),
            threads: None,
            band_rows: 1,
            max_cells: 4_000_000,
        }
    }
}

impl HeatmapConfig {
    /// Creates a new [`HeatmapConfig`] with the given grid spacing.
    pub fn new(spacing: f64) -> Self {
        Self {
            spacing,
            ..Default::default()
        }
    }

    /// Sets the grid spacing.
    pub fn with_spacing(mut self, spacing: f64) -> Self {
        self.spacing = spacing;
        self
    }

    /// Sets the isovist configuration.
    pub fn with_isovist(mut self, isovist: IsovistConfig) -> Self {
        self.isovist = isovist;
        self
    }

    /// Sets the aggregation policy.
    pub fn with_aggregation(mut self, aggregation: AggregationPolicy) -> Self {
        self.aggregation = aggregation;
        self
    }

    /// Sets the sensitivity model.
    pub fn with_sensitivity(mut self, sensitivity: SensitivityModel) -> Self {
        self.sensitivity = sensitivity;
        self
    }

    /// Sets a dedicated worker count, or `None` for the global pool.
    pub fn with_threads(mut self, threads: Option<usize>) -> Self {
        self.threads = threads;
        self
    }

    /// Sets the number of rows per work item.
    pub fn with_band_rows(mut self, band_rows: usize) -> Self {
        self.band_rows = band_rows;
        self
    }

    /// Sets the grid size guard.
    pub fn with_max_cells(mut self, max_cells: usize) -> Self {
        self.max_cells = max_cells;
        self
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if !(self.spacing > 0.0 && self.spacing.is_finite()) {
            return Err(Error::InvalidConfig("spacing must be finite and > 0".into()));
        }
        if self.threads == Some(0) {
            return Err(Error::InvalidConfig("threads must be >= 1".into()));
        }
        if self.band_rows == 0 {
            return Err(Error::InvalidConfig("band_rows must be >= 1".into()));
        }
        if self.max_cells == 0 {
            return Err(Error::InvalidConfig("max_cells must be >= 1".into()));
        }
        self.isovist.validate()
    }
}

/// Detectability of every feature from an isovist of `plan`, in ascending obstacle index.
pub fn feature_scores(
    plan: &FloorPlan,
    isovist: &VisibilityPolygon,
    features: &FeatureTable,
    curve: &dyn ContrastSensitivity,
) -> Vec<(usize, f64)> {
    features
        .iter()
        .map(|feature| {
            let context = ViewContext::observe(feature, isovist, plan);
            (feature.obstacle_index, detectability(feature, &context, curve))
        })
        .collect()
}

/// Aggregated score of a single viewpoint, as it would appear in a heatmap cell.
pub fn score_viewpoint(
    plan: &FloorPlan,
    features: &FeatureTable,
    viewpoint: Point,
    config: &HeatmapConfig,
) -> Result<f64> {
    let isovist = visibility_polygon_with(plan, viewpoint, &config.isovist)?;
    Ok(aggregate_isovist(plan, &isovist, features, config))
}

fn aggregate_isovist(
    plan: &FloorPlan,
    isovist: &VisibilityPolygon,
    features: &FeatureTable,
    config: &HeatmapConfig,
) -> f64 {
    let curve = config.sensitivity.curve();
    config.aggregation.aggregate(features.iter().map(|feature| {
        let context = ViewContext::observe(feature, isovist, plan);
        detectability(feature, &context, curve)
    }))
}

#[derive(Clone, Copy, Debug, Default)]
struct BandTally {
    sampled: usize,
    invalid: usize,
    failed: usize,
}

impl BandTally {
    fn merge(self, other: BandTally) -> BandTally {
        BandTally {
            sampled: self.sampled + other.sampled,
            invalid: self.invalid + other.invalid,
            failed: self.failed + other.failed,
        }
    }
}

/// Sample the detectability of `features` over the free space of `plan`.
///
/// Cells outside free space are [`CellScore::Invalid`]. A cell whose sweep fails is logged and
/// also marked invalid without aborting the batch. When `cancel` fires, cells not yet evaluated
/// stay [`CellScore::Unsampled`] and the partial grid is returned.
pub fn compute_heatmap(
    plan: &FloorPlan,
    features: &FeatureTable,
    config: &HeatmapConfig,
    cancel: &CancelToken,
) -> Result<HeatmapGrid> {
    config.validate()?;
    for feature in features.iter() {
        feature.validate()?;
    }
    features.validate_against(plan)?;

    let layout = GridLayout::covering(plan.bounds(), config.spacing, config.max_cells)?;
    info!(
        "Heatmap started: {} x {} cells at spacing {} | features: {} | aggregation: {}.",
        layout.cols,
        layout.rows,
        layout.spacing,
        features.len(),
        config.aggregation.as_str()
    );

    let mut cells = vec![CellScore::Unsampled; layout.len()];
    let tally = match config.threads {
        Some(threads) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .map_err(|e| Error::InvalidConfig(format!("failed to build thread pool: {e}")))?;
            pool.install(|| fill_cells(plan, features, config, cancel, &layout, &mut cells))
        }
        None => fill_cells(plan, features, config, cancel, &layout, &mut cells),
    };

    let unsampled = layout.len() - tally.sampled - tally.invalid - tally.failed;
    let stats = HeatmapStats {
        sampled: tally.sampled,
        invalid: tally.invalid,
        failed: tally.failed,
        unsampled,
        cancelled: unsampled > 0,
    };

    if stats.cancelled {
        info!(
            "Heatmap cancelled: {} of {} cells evaluated.",
            layout.len() - unsampled,
            layout.len()
        );
    } else {
        info!(
            "Heatmap finished: {} scored, {} invalid, {} failed.",
            stats.sampled, stats.invalid, stats.failed
        );
    }

    Ok(HeatmapGrid::new(layout, cells, stats))
}

fn fill_cells(
    plan: &FloorPlan,
    features: &FeatureTable,
    config: &HeatmapConfig,
    cancel: &CancelToken,
    layout: &GridLayout,
    cells: &mut [CellScore],
) -> BandTally {
    let band_len = layout.cols * config.band_rows.min(layout.rows);
    cells
        .par_chunks_mut(band_len)
        .enumerate()
        .map(|(band, chunk)| {
            let mut tally = BandTally::default();
            let first = band * band_len;
            for (offset, cell) in chunk.iter_mut().enumerate() {
                if cancel.is_cancelled() {
                    break;
                }
                let (col, row) = layout.coords(first + offset);
                let p = layout.cell_center(col, row);
                if !plan.is_free_space(p) {
                    *cell = CellScore::Invalid;
                    tally.invalid += 1;
                    continue;
                }
                match visibility_polygon_with(plan, p, &config.isovist) {
                    Ok(isovist) => {
                        *cell = CellScore::Score(aggregate_isovist(plan, &isovist, features, config));
                        tally.sampled += 1;
                    }
                    Err(err) => {
                        warn!(
                            "Heatmap cell ({}, {}) at ({:.3}, {:.3}) failed: {}.",
                            col, row, p.x, p.y, err
                        );
                        *cell = CellScore::Invalid;
                        tally.failed += 1;
                    }
                }
            }
            tally
        })
        .reduce(BandTally::default, BandTally::merge)
}
