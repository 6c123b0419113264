//! Contrast-sensitivity falloff curves.
//!
//! The falloff `S(contrast, spatial_freq, distance)` is a modelling policy, so it sits behind
//! the [`ContrastSensitivity`] trait. [`ExponentialFalloff`] is the default; closures can be
//! plugged in through [`FnSensitivity`].
use std::fmt;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Maps a component's contrast and spatial frequency at a viewing distance to a detection
/// strength in `[0, 1]`.
///
/// Implementations should be non-increasing in distance and spatial frequency and
/// non-decreasing in contrast.
pub trait ContrastSensitivity: Send + Sync {
    fn sensitivity(&self, contrast: f64, spatial_freq: f64, distance: f64) -> f64;
}

/// `S = 1 - exp(-gain * contrast * exp(-cpd / cutoff))` where `cpd` is the angular frequency
/// (cycles per degree) of the pattern at the viewing distance.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExponentialFalloff {
    /// Scales contrast into detection strength.
    pub gain: f64,
    /// Angular frequency (cycles per degree) at which strength drops by `1/e` in the exponent.
    pub cutoff: f64,
}

impl Default for ExponentialFalloff {
    fn default() -> Self {
        Self {
            gain: 4.0,
            cutoff: 8.0,
        }
    }
}

impl ExponentialFalloff {
    pub fn new(gain: f64, cutoff: f64) -> Self {
        Self { gain, cutoff }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.gain > 0.0 && self.gain.is_finite()) {
            return Err(Error::InvalidConfig("falloff gain must be finite and > 0".into()));
        }
        if !(self.cutoff > 0.0 && self.cutoff.is_finite()) {
            return Err(Error::InvalidConfig(
                "falloff cutoff must be finite and > 0".into(),
            ));
        }
        Ok(())
    }
}

/// Cycles per degree of visual angle for a pattern of `spatial_freq` cycles per unit seen from
/// `distance` units away.
#[inline]
pub fn cycles_per_degree(spatial_freq: f64, distance: f64) -> f64 {
    spatial_freq * distance.max(0.0) * 1f64.to_radians().tan()
}

impl ContrastSensitivity for ExponentialFalloff {
    fn sensitivity(&self, contrast: f64, spatial_freq: f64, distance: f64) -> f64 {
        let cpd = cycles_per_degree(spatial_freq, distance);
        let strength = self.gain * contrast.max(0.0) * (-cpd / self.cutoff).exp();
        clamp01(1.0 - (-strength).exp())
    }
}

/// Adapter that turns a closure into a [`ContrastSensitivity`].
pub struct FnSensitivity<F>
where
    F: Fn(f64, f64, f64) -> f64 + Send + Sync,
{
    f: F,
}

impl<F> FnSensitivity<F>
where
    F: Fn(f64, f64, f64) -> f64 + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> ContrastSensitivity for FnSensitivity<F>
where
    F: Fn(f64, f64, f64) -> f64 + Send + Sync,
{
    #[inline]
    fn sensitivity(&self, contrast: f64, spatial_freq: f64, distance: f64) -> f64 {
        clamp01((self.f)(contrast, spatial_freq, distance))
    }
}

/// Shared handle to the falloff curve used by an analysis.
#[derive(Clone)]
pub struct SensitivityModel {
    curve: Arc<dyn ContrastSensitivity>,
}

impl SensitivityModel {
    pub fn new(curve: impl ContrastSensitivity + 'static) -> Self {
        Self {
            curve: Arc::new(curve),
        }
    }

    pub fn from_arc(curve: Arc<dyn ContrastSensitivity>) -> Self {
        Self { curve }
    }

    pub fn curve(&self) -> &dyn ContrastSensitivity {
        self.curve.as_ref()
    }
}

impl Default for SensitivityModel {
    fn default() -> Self {
        Self::new(ExponentialFalloff::default())
    }
}

impl fmt::Debug for SensitivityModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SensitivityModel").finish_non_exhaustive()
    }
}

/// Clamp into `[0, 1]`, mapping NaN to `0`.
#[inline]
pub(crate) fn clamp01(v: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}
