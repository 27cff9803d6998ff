//! High-level API for evaluating MinDiff losses on whole batches
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use mindiff::api::quick;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Squared MMD between the scores of the two subgroups
//! let loss = quick::mmd(&[1.0, 1.0, 0.0, 0.0], &[0.9, 0.8, 0.3, 0.2])?;
//! println!("MMD loss: {loss:.6}");
//!
//! // Or evaluate an exported batch
//! let report = quick::evaluate_csv("scores.csv")?;
//! println!("{} = {:.6}", report.name, report.value);
//! # Ok(())
//! # }
//! ```

use crate::config::LossConfig;
use crate::core::traits::column_view;
use crate::core::{MinDiffLoss, Result};
use crate::data::Batch;
use crate::kernel::{Kernel, KernelKind};
use crate::loss::MMDLoss;
use ndarray::Array2;
use serde::Serialize;

/// Result of evaluating an MMD loss on a batch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LossReport {
    pub name: String,
    pub kernel: String,
    pub kernel_length: f64,
    pub n_examples: usize,
    pub n_positive: usize,
    pub n_negative: usize,
    pub pos_pos_mean: f64,
    pub neg_neg_mean: f64,
    pub pos_neg_mean: f64,
    pub value: f64,
    /// Gradient with respect to each prediction, when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gradient: Option<Vec<f64>>,
}

/// Evaluate the configured MMD loss on a batch
pub fn evaluate_batch(batch: &Batch, config: &LossConfig, with_gradient: bool) -> Result<LossReport> {
    let loss = MMDLoss::from_config(config)?;
    let membership = column_view("membership", batch.membership())?;
    let predictions = column_view("predictions", batch.predictions())?;
    let weights = batch
        .weights()
        .map(|w| column_view("sample_weight", w))
        .transpose()?;

    let (means, gradient) = if with_gradient {
        let (means, gradient) = loss.group_means_with_gradient(membership, predictions, weights)?;
        (means, Some(gradient.iter().copied().collect()))
    } else {
        (loss.group_means(membership, predictions, weights)?, None)
    };

    let n_positive = batch.membership().iter().filter(|&&m| m == 1.0).count();
    Ok(LossReport {
        name: loss.name().to_string(),
        kernel: loss.kernel().name().to_string(),
        kernel_length: loss.kernel().kernel_length(),
        n_examples: batch.len(),
        n_positive,
        n_negative: batch.len() - n_positive,
        pos_pos_mean: means.pos_pos,
        neg_neg_mean: means.neg_neg,
        pos_neg_mean: means.pos_neg,
        value: means.squared_mmd(),
        gradient,
    })
}

/// Pairwise kernel matrix of a batch's predictions, shape [N, N]
pub fn batch_kernel_matrix(batch: &Batch, kernel: &KernelKind) -> Result<Array2<f64>> {
    let predictions = batch.predictions_array();
    kernel.compute(predictions.view().into_dyn(), None)
}

/// Convenience functions for quick operations
pub mod quick {
    use super::*;
    use crate::kernel::GaussKernel;
    use std::path::Path;

    /// MMD loss with the default Gauss kernel (length 0.1) and uniform weights
    pub fn mmd(membership: &[f64], predictions: &[f64]) -> Result<f64> {
        MMDLoss::new().compute_slices(membership, predictions, None)
    }

    /// MMD loss with a Gauss kernel of the given length
    pub fn mmd_with_kernel_length(
        membership: &[f64],
        predictions: &[f64],
        kernel_length: f64,
    ) -> Result<f64> {
        MMDLoss::with_kernel(GaussKernel::new(kernel_length)).compute_slices(
            membership,
            predictions,
            None,
        )
    }

    /// Evaluate the default MMD loss on a CSV batch
    pub fn evaluate_csv<P: AsRef<Path>>(path: P) -> Result<LossReport> {
        let batch = Batch::from_file(path)?;
        evaluate_batch(&batch, &LossConfig::default(), false)
    }
}
