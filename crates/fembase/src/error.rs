//! Error types for fembase

use thiserror::Error;

use crate::mesh::{ElementId, NodeId};

pub type Result<T> = std::result::Result<T, FemError>;

#[derive(Error, Debug)]
pub enum FemError {
    #[error("degenerate reference element {element}: {reason}")]
    DegenerateReferenceElement { element: String, reason: String },

    #[error("degenerate geometry in element {element}: {reason}")]
    DegenerateGeometry { element: ElementId, reason: String },

    #[error("degenerate normal at node {node}: accumulated length {length:e}")]
    DegenerateNormal { node: NodeId, length: f64 },

    #[error("field '{name}' not found at time {time}")]
    FieldNotFound { name: String, time: f64 },

    #[error("shape mismatch in {context}: expected {expected}, got {actual}")]
    ShapeMismatch {
        context: String,
        expected: usize,
        actual: usize,
    },

    #[error("field '{name}' has no data for node {node}")]
    MissingNodeData { name: String, node: NodeId },

    #[error("invalid time series for field '{name}': {reason}")]
    InvalidTimeSeries { name: String, reason: String },

    #[error("unsupported operation: {0}")]
    Unsupported(String),

    #[error("inverse mapping in element {element} did not converge after {iterations} iterations (residual {residual:e})")]
    NoConvergence {
        element: ElementId,
        iterations: usize,
        residual: f64,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FemError {
    pub(crate) fn shape(context: impl Into<String>, expected: usize, actual: usize) -> Self {
        FemError::ShapeMismatch {
            context: context.into(),
            expected,
            actual,
        }
    }

    pub(crate) fn degenerate(element: ElementId, reason: impl Into<String>) -> Self {
        FemError::DegenerateGeometry {
            element,
            reason: reason.into(),
        }
    }
}
