//! Rust implementation of MinDiff kernels and losses
//!
//! MinDiff is a fairness regularization technique that penalizes the
//! difference between the prediction distributions of two subgroups.
//! Based on "Putting Fairness Principles into Practice: Challenges,
//! Metrics, and Improvements" by Beutel et al.

pub mod api;
pub mod config;
pub mod core;
pub mod data;
pub mod kernel;
pub mod loss;
pub mod transform;
pub mod utils;

// Re-export main types for convenience
pub use crate::api::{LossReport, evaluate_batch};
pub use crate::config::LossConfig;
pub use crate::core::traits::MinDiffLoss;
pub use crate::core::types::*;
pub use crate::core::{MinDiffError, Result};
pub use crate::data::Batch;
pub use crate::kernel::{GaussKernel, Kernel, KernelKind, LaplaceKernel};
pub use crate::loss::MMDLoss;
pub use crate::transform::{Clip, FnTransform, PredictionsTransform, Sigmoid, TransformConfig};

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
