//! Error types for scene construction and frame submission

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    #[error("Scene needs at least one labeled item (total = 0)")]
    EmptyScene,
    #[error("Item index {index} out of range for total {total}")]
    IndexOutOfRange { index: usize, total: usize },
    #[error("Invalid radius: {0}")]
    InvalidRadius(f64),
    #[error("Invalid segment count: {0}")]
    InvalidSegmentCount(usize),
    #[error("Invalid time step: {0}")]
    InvalidTimeStep(f64),
    #[error("Invalid reference frame rate: {0}")]
    InvalidReferenceFps(f64),
    #[error("Invalid rotation rate {name}: {value}")]
    InvalidRotationRate { name: &'static str, value: f64 },
    #[error("Invalid color '{0}', expected #RRGGBB")]
    InvalidColor(String),
    #[error("Render sink rejected frame: {0}")]
    Sink(#[from] SinkError),
}

/// Raised by a render sink that cannot accept a frame
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{0}")]
pub struct SinkError(pub String);
