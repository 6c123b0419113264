//! Editable floor plan and feature table with versioned, immutable snapshots.
//!
//! A [`Scene`] is the mutable state a caller edits between requests. Each computation runs on a
//! [`Snapshot`], which shares the current plan and feature table by `Arc`. Edits made while a
//! computation is running copy the shared data first, so a snapshot never observes them.
use std::sync::Arc;

use tracing::warn;

use crate::cancel::CancelToken;
use crate::error::{Error, Result};
use crate::floorplan::FloorPlan;
use crate::geometry::Point;
use crate::heatmap::{compute_heatmap, feature_scores, score_viewpoint, HeatmapConfig, HeatmapGrid};
use crate::isovist::{visibility_polygon_with, IsovistConfig, VisibilityPolygon};
use crate::sensitivity::{ContrastSensitivity, Feature, FeatureTable};

/// Current floor plan and features, with a version bumped on every edit.
#[derive(Clone, Debug)]
pub struct Scene {
    plan: Arc<FloorPlan>,
    features: Arc<FeatureTable>,
    version: u64,
}

impl Scene {
    pub fn new(plan: FloorPlan) -> Self {
        Self {
            plan: Arc::new(plan),
            features: Arc::new(FeatureTable::new()),
            version: 0,
        }
    }

    /// Scene with a feature table, checked against the plan.
    pub fn with_features(plan: FloorPlan, features: FeatureTable) -> Result<Self> {
        for feature in features.iter() {
            feature.validate()?;
        }
        features.validate_against(&plan)?;
        Ok(Self {
            plan: Arc::new(plan),
            features: Arc::new(features),
            version: 0,
        })
    }

    pub fn plan(&self) -> &FloorPlan {
        &self.plan
    }

    pub fn features(&self) -> &FeatureTable {
        &self.features
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Replace the floor plan. Features on obstacles that no longer exist are dropped and their
    /// indices returned.
    pub fn set_plan(&mut self, plan: FloorPlan) -> Vec<usize> {
        let dropped = if self.features.iter().any(|f| plan.obstacle(f.obstacle_index).is_none()) {
            Arc::make_mut(&mut self.features).retain_in(&plan)
        } else {
            Vec::new()
        };
        if !dropped.is_empty() {
            warn!(
                "Dropped {} feature(s) on removed obstacles: {:?}.",
                dropped.len(),
                dropped
            );
        }
        self.plan = Arc::new(plan);
        self.bump();
        dropped
    }

    /// Attach a feature to its obstacle, returning the one it replaced.
    pub fn set_feature(&mut self, feature: Feature) -> Result<Option<Feature>> {
        if self.plan.obstacle(feature.obstacle_index).is_none() {
            return Err(Error::UnknownObstacle {
                index: feature.obstacle_index,
            });
        }
        let replaced = Arc::make_mut(&mut self.features).insert(feature)?;
        self.bump();
        Ok(replaced)
    }

    /// Edit the feature on obstacle `index`; invalid edits leave the scene unchanged.
    pub fn update_feature(&mut self, index: usize, f: impl FnOnce(&mut Feature)) -> Result<()> {
        if !self.features.contains(index) {
            return Err(Error::UnknownObstacle { index });
        }
        Arc::make_mut(&mut self.features).update(index, f)?;
        self.bump();
        Ok(())
    }

    pub fn remove_feature(&mut self, index: usize) -> Option<Feature> {
        if !self.features.contains(index) {
            return None;
        }
        let removed = Arc::make_mut(&mut self.features).remove(index);
        self.bump();
        removed
    }

    /// Immutable view of the current state for one computation.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            plan: Arc::clone(&self.plan),
            features: Arc::clone(&self.features),
            version: self.version,
        }
    }

    fn bump(&mut self) {
        self.version += 1;
    }
}

/// Read-only plan and features as of one [`Scene`] version.
#[derive(Clone, Debug)]
pub struct Snapshot {
    plan: Arc<FloorPlan>,
    features: Arc<FeatureTable>,
    version: u64,
}

impl Snapshot {
    pub fn plan(&self) -> &FloorPlan {
        &self.plan
    }

    pub fn features(&self) -> &FeatureTable {
        &self.features
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn visibility(&self, viewpoint: Point, config: &IsovistConfig) -> Result<VisibilityPolygon> {
        visibility_polygon_with(&self.plan, viewpoint, config)
    }

    /// Per-feature detectability from `viewpoint`, in ascending obstacle index.
    pub fn feature_scores(
        &self,
        viewpoint: Point,
        config: &IsovistConfig,
        curve: &dyn ContrastSensitivity,
    ) -> Result<Vec<(usize, f64)>> {
        let isovist = self.visibility(viewpoint, config)?;
        Ok(feature_scores(&self.plan, &isovist, &self.features, curve))
    }

    pub fn score(&self, viewpoint: Point, config: &HeatmapConfig) -> Result<f64> {
        score_viewpoint(&self.plan, &self.features, viewpoint, config)
    }

    pub fn heatmap(&self, config: &HeatmapConfig, cancel: &CancelToken) -> Result<HeatmapGrid> {
        compute_heatmap(&self.plan, &self.features, config, cancel)
    }
}
