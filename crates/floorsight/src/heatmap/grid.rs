//! Regular sample grid over the boundary's bounding box and the scores stored on it.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geometry::{Aabb, Point};

/// Value stored for one grid cell.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CellScore {
    /// Aggregated detectability in `[0, 1]`.
    Score(f64),
    /// Cell center lies outside free space, or its sweep failed.
    Invalid,
    /// Not evaluated because the computation was cancelled.
    Unsampled,
}

impl CellScore {
    pub fn score(self) -> Option<f64> {
        match self {
            CellScore::Score(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_scored(self) -> bool {
        matches!(self, CellScore::Score(_))
    }
}

/// Cell counts gathered while filling a grid.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HeatmapStats {
    /// Cells that received a score.
    pub sampled: usize,
    /// Cells whose center is outside free space.
    pub invalid: usize,
    /// Cells in free space whose sweep failed; stored as [`CellScore::Invalid`].
    pub failed: usize,
    /// Cells skipped because of cancellation.
    pub unsampled: usize,
    /// The computation stopped before every cell was evaluated.
    pub cancelled: bool,
}

impl HeatmapStats {
    pub fn total(&self) -> usize {
        self.sampled + self.invalid + self.failed + self.unsampled
    }
}

/// Grid geometry: `cols x rows` cells of `spacing` units starting at `origin`.
///
/// Cells are stored row-major; row 0 is at the minimum y of the bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridLayout {
    pub origin: Point,
    pub spacing: f64,
    pub cols: usize,
    pub rows: usize,
}

impl GridLayout {
    /// Cover `bounds` with cells of `spacing`, refusing grids with more than `max_cells` cells.
    pub fn covering(bounds: Aabb, spacing: f64, max_cells: usize) -> Result<Self> {
        if !(spacing > 0.0 && spacing.is_finite()) {
            return Err(Error::InvalidConfig("spacing must be finite and > 0".into()));
        }
        let cols = (bounds.width() / spacing).ceil().max(1.0);
        let rows = (bounds.height() / spacing).ceil().max(1.0);
        if !(cols * rows <= max_cells as f64) {
            return Err(Error::InvalidConfig(format!(
                "grid of {cols} x {rows} cells exceeds max_cells ({max_cells})"
            )));
        }
        Ok(Self {
            origin: bounds.min,
            spacing,
            cols: cols as usize,
            rows: rows as usize,
        })
    }

    pub fn len(&self) -> usize {
        self.cols * self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn index(&self, col: usize, row: usize) -> usize {
        row * self.cols + col
    }

    /// `(col, row)` of a row-major index.
    #[inline]
    pub fn coords(&self, index: usize) -> (usize, usize) {
        (index % self.cols, index / self.cols)
    }

    pub fn cell_center(&self, col: usize, row: usize) -> Point {
        self.origin + Point::new(col as f64 + 0.5, row as f64 + 0.5) * self.spacing
    }

    /// Cell containing `p`, if it falls on the grid.
    pub fn cell_at(&self, p: Point) -> Option<(usize, usize)> {
        let local = (p - self.origin) / self.spacing;
        if !local.is_finite() || local.x < 0.0 || local.y < 0.0 {
            return None;
        }
        let (col, row) = (local.x.floor() as usize, local.y.floor() as usize);
        (col < self.cols && row < self.rows).then_some((col, row))
    }
}

/// Detectability scores sampled over the floor plan.
#[derive(Clone, Debug, PartialEq)]
pub struct HeatmapGrid {
    layout: GridLayout,
    cells: Vec<CellScore>,
    stats: HeatmapStats,
}

impl HeatmapGrid {
    pub(crate) fn new(layout: GridLayout, cells: Vec<CellScore>, stats: HeatmapStats) -> Self {
        debug_assert_eq!(layout.len(), cells.len());
        Self {
            layout,
            cells,
            stats,
        }
    }

    pub fn layout(&self) -> GridLayout {
        self.layout
    }

    /// Lower-left corner of cell `(0, 0)`.
    pub fn origin(&self) -> Point {
        self.layout.origin
    }

    pub fn spacing(&self) -> f64 {
        self.layout.spacing
    }

    pub fn cols(&self) -> usize {
        self.layout.cols
    }

    pub fn rows(&self) -> usize {
        self.layout.rows
    }

    /// Row-major cells.
    pub fn cells(&self) -> &[CellScore] {
        &self.cells
    }

    pub fn get(&self, col: usize, row: usize) -> Option<CellScore> {
        if col >= self.layout.cols || row >= self.layout.rows {
            return None;
        }
        self.cells.get(self.layout.index(col, row)).copied()
    }

    pub fn cell_center(&self, col: usize, row: usize) -> Point {
        self.layout.cell_center(col, row)
    }

    pub fn cell_at(&self, p: Point) -> Option<(usize, usize)> {
        self.layout.cell_at(p)
    }

    /// Score of the cell containing `p`.
    pub fn score_at(&self, p: Point) -> Option<f64> {
        let (col, row) = self.cell_at(p)?;
        self.get(col, row).and_then(CellScore::score)
    }

    pub fn stats(&self) -> HeatmapStats {
        self.stats
    }

    pub fn is_complete(&self) -> bool {
        !self.stats.cancelled
    }

    /// Highest score on the grid, if any cell was scored.
    pub fn max_score(&self) -> Option<f64> {
        self.cells
            .iter()
            .filter_map(|c| c.score())
            .reduce(f64::max)
    }

    /// Rows of optional scores; `None` for invalid and unsampled cells.
    pub fn to_nested(&self) -> Vec<Vec<Option<f64>>> {
        self.cells
            .chunks(self.layout.cols)
            .map(|row| row.iter().map(|c| c.score()).collect())
            .collect()
    }
}
