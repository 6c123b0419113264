//! Features attached to obstacles and the table that keys them by obstacle index.
use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::floorplan::FloorPlan;
use crate::geometry::Point;

/// One contrast / spatial-frequency pair describing a visual component of a feature.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrequencyComponent {
    /// Michelson-style contrast in `[0, 1]`.
    pub contrast: f64,
    /// Cycles per floor-plan unit; must be `> 0`.
    pub spatial_freq: f64,
}

impl FrequencyComponent {
    pub fn new(contrast: f64, spatial_freq: f64) -> Self {
        Self {
            contrast,
            spatial_freq,
        }
    }
}

/// A detectable feature attached to exactly one obstacle.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub struct Feature {
    /// Collection index of the owning obstacle (`>= 1`).
    pub obstacle_index: usize,
    /// Anchor position in floor-plan units.
    pub position: Point,
    /// Radius of the feature; distances are measured to its rim.
    pub size: f64,
    /// Overall visibility weight in `[0, 1]`.
    pub visibility_value: f64,
    /// Weight of the finer (higher spatial frequency) component in `[0, 1]`.
    pub detail_visibility_value: f64,
    pub components: [FrequencyComponent; 2],
}

impl Feature {
    pub fn new(obstacle_index: usize, position: Point) -> Self {
        Self {
            obstacle_index,
            position,
            size: 0.0,
            visibility_value: 1.0,
            detail_visibility_value: 0.5,
            components: [
                FrequencyComponent::new(1.0, 0.05),
                FrequencyComponent::new(0.5, 0.5),
            ],
        }
    }

    /// Feature anchored at the centroid of obstacle `index`.
    pub fn anchored_to(plan: &FloorPlan, index: usize) -> Result<Self> {
        let anchor = plan
            .obstacle(index)
            .and_then(|obstacle| obstacle.centroid())
            .ok_or(Error::UnknownObstacle { index })?;
        Ok(Self::new(index, anchor))
    }

    pub fn with_position(mut self, position: Point) -> Self {
        self.position = position;
        self
    }

    pub fn with_size(mut self, size: f64) -> Self {
        self.size = size;
        self
    }

    pub fn with_visibility_value(mut self, value: f64) -> Self {
        self.visibility_value = value;
        self
    }

    pub fn with_detail_visibility_value(mut self, value: f64) -> Self {
        self.detail_visibility_value = value;
        self
    }

    /// Sets both frequency components.
    pub fn with_components(mut self, first: FrequencyComponent, second: FrequencyComponent) -> Self {
        self.components = [first, second];
        self
    }

    /// The two components ordered as `(coarse, fine)` by spatial frequency.
    pub fn coarse_and_fine(&self) -> (FrequencyComponent, FrequencyComponent) {
        let [a, b] = self.components;
        if b.spatial_freq >= a.spatial_freq {
            (a, b)
        } else {
            (b, a)
        }
    }

    /// Checks value ranges; does not check the obstacle index against a plan.
    pub fn validate(&self) -> Result<()> {
        if !self.position.is_finite() {
            return Err(Error::InvalidFeature("position must be finite".into()));
        }
        if !(self.size >= 0.0 && self.size.is_finite()) {
            return Err(Error::InvalidFeature("size must be finite and >= 0".into()));
        }
        unit_range("visibility_value", self.visibility_value)?;
        unit_range("detail_visibility_value", self.detail_visibility_value)?;
        for (i, component) in self.components.iter().enumerate() {
            unit_range(&format!("feature{}Contrast", i + 1), component.contrast)?;
            if !(component.spatial_freq > 0.0 && component.spatial_freq.is_finite()) {
                return Err(Error::InvalidFeature(format!(
                    "feature{}SpatialFreq must be finite and > 0",
                    i + 1
                )));
            }
        }
        Ok(())
    }
}

fn unit_range(name: &str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(Error::InvalidFeature(format!(
            "{name} must be in [0, 1], got {value}"
        )))
    }
}

/// Features keyed by obstacle index; at most one per obstacle.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FeatureTable {
    features: BTreeMap<usize, Feature>,
}

impl FeatureTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and insert a feature, returning the one it replaced on the same obstacle.
    pub fn insert(&mut self, feature: Feature) -> Result<Option<Feature>> {
        feature.validate()?;
        Ok(self.features.insert(feature.obstacle_index, feature))
    }

    /// Apply `f` to the feature on `index`. The edit is rolled back if the result is invalid
    /// or if it tries to move the feature to a different obstacle.
    pub fn update(&mut self, index: usize, f: impl FnOnce(&mut Feature)) -> Result<()> {
        let feature = self
            .features
            .get_mut(&index)
            .ok_or(Error::UnknownObstacle { index })?;
        let mut edited = feature.clone();
        f(&mut edited);
        if edited.obstacle_index != index {
            return Err(Error::InvalidFeature(
                "obstacle_index cannot change during an update".into(),
            ));
        }
        edited.validate()?;
        *feature = edited;
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Option<Feature> {
        self.features.remove(&index)
    }

    pub fn get(&self, index: usize) -> Option<&Feature> {
        self.features.get(&index)
    }

    pub fn contains(&self, index: usize) -> bool {
        self.features.contains_key(&index)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn clear(&mut self) {
        self.features.clear();
    }

    /// Features in ascending obstacle index.
    pub fn iter(&self) -> impl Iterator<Item = &Feature> + '_ {
        self.features.values()
    }

    /// Drop features whose obstacle does not exist in `plan`, returning their indices.
    pub fn retain_in(&mut self, plan: &FloorPlan) -> Vec<usize> {
        let dropped: Vec<usize> = self
            .features
            .keys()
            .copied()
            .filter(|&index| plan.obstacle(index).is_none())
            .collect();
        for index in &dropped {
            self.features.remove(index);
        }
        dropped
    }

    /// Ensure every feature references an obstacle of `plan`.
    pub fn validate_against(&self, plan: &FloorPlan) -> Result<()> {
        match self.features.keys().find(|&&index| plan.obstacle(index).is_none()) {
            Some(&index) => Err(Error::UnknownObstacle { index }),
            None => Ok(()),
        }
    }
}

impl FromIterator<Feature> for FeatureTable {
    /// Later features replace earlier ones on the same obstacle. Values are not validated.
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        Self {
            features: iter.into_iter().map(|f| (f.obstacle_index, f)).collect(),
        }
    }
}
