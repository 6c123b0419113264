//! Error types and result alias for the crate.
//!
//! This module defines [`enum@crate::error::Error`] and the crate-wide [Result] alias. Variants cover
//! degenerate floor-plan geometry, misplaced viewpoints, sweep degeneracies, invalid features
//! and configuration, and JSON decoding at the service boundary.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("viewpoint ({x}, {y}) lies outside the boundary")]
    ViewpointOutsideBoundary { x: f64, y: f64 },

    #[error("viewpoint ({x}, {y}) lies inside obstacle {index}")]
    ViewpointInsideObstacle { index: usize, x: f64, y: f64 },

    #[error("obstacle set is empty; the boundary polygon is missing")]
    EmptyObstacleSet,

    #[error("sweep ray at angle {angle} rad produced no intersection")]
    NumericalDegeneracy { angle: f64 },

    #[error("invalid feature: {0}")]
    InvalidFeature(String),

    #[error("unknown obstacle index {index}")]
    UnknownObstacle { index: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[cfg(feature = "json")]
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

/// Stable, payload-free classification of an [`enum@Error`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    InvalidGeometry,
    ViewpointOutsideBoundary,
    ViewpointInsideObstacle,
    EmptyObstacleSet,
    NumericalDegeneracy,
    InvalidFeature,
    UnknownObstacle,
    InvalidConfig,
    Json,
    Other,
}

impl ErrorKind {
    /// Name used for the `kind` field of JSON error responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::InvalidGeometry => "InvalidGeometry",
            ErrorKind::ViewpointOutsideBoundary => "ViewpointOutsideBoundary",
            ErrorKind::ViewpointInsideObstacle => "ViewpointInsideObstacle",
            ErrorKind::EmptyObstacleSet => "EmptyObstacleSet",
            ErrorKind::NumericalDegeneracy => "NumericalDegeneracy",
            ErrorKind::InvalidFeature => "InvalidFeature",
            ErrorKind::UnknownObstacle => "UnknownObstacle",
            ErrorKind::InvalidConfig => "InvalidConfig",
            ErrorKind::Json => "Json",
            ErrorKind::Other => "Other",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidGeometry(_) => ErrorKind::InvalidGeometry,
            Error::ViewpointOutsideBoundary { .. } => ErrorKind::ViewpointOutsideBoundary,
            Error::ViewpointInsideObstacle { .. } => ErrorKind::ViewpointInsideObstacle,
            Error::EmptyObstacleSet => ErrorKind::EmptyObstacleSet,
            Error::NumericalDegeneracy { .. } => ErrorKind::NumericalDegeneracy,
            Error::InvalidFeature(_) => ErrorKind::InvalidFeature,
            Error::UnknownObstacle { .. } => ErrorKind::UnknownObstacle,
            Error::InvalidConfig(_) => ErrorKind::InvalidConfig,
            #[cfg(feature = "json")]
            Error::Json(_) => ErrorKind::Json,
            Error::Other(_) => ErrorKind::Other,
        }
    }
}

impl From<String> for Error {
    fn from(value: String) -> Self {
        Error::Other(value)
    }
}

impl From<&str> for Error {
    fn from(value: &str) -> Self {
        Error::Other(value.to_owned())
    }
}
