//! Error types for the MinDiff losses and kernels

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MinDiffError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Shape mismatch for {name}: expected {expected}, got {actual:?}")]
    ShapeMismatch {
        name: &'static str,
        expected: String,
        actual: Vec<usize>,
    },

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Empty batch")]
    EmptyBatch,

    #[error("Invalid membership at index {index}: expected 0.0 or 1.0, got {value}")]
    InvalidMembership { index: usize, value: f64 },

    #[error("Invalid sample weight at index {index}: expected a finite non-negative value, got {value}")]
    InvalidWeight { index: usize, value: f64 },

    #[error("Unknown kernel: {0} (expected 'gauss' or 'laplace')")]
    UnknownKernel(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

pub type Result<T> = std::result::Result<T, MinDiffError>;
