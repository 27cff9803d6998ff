//! Core traits for MinDiff losses

use crate::core::{LossOutput, MinDiffError, Result};
use ndarray::ArrayView2;

/// A MinDiff loss: a penalty on the difference between the prediction
/// distributions of two subgroups of a batch.
///
/// `membership` has shape [N, 1] with values in {0.0, 1.0}, `predictions`
/// has shape [N, K] and the optional `sample_weight` has shape [N, 1].
pub trait MinDiffLoss: Send + Sync {
    /// Name used for logging and tracking
    fn name(&self) -> &str;

    /// Compute the scalar loss value
    fn compute(
        &self,
        membership: ArrayView2<'_, f64>,
        predictions: ArrayView2<'_, f64>,
        sample_weight: Option<ArrayView2<'_, f64>>,
    ) -> Result<f64>;

    /// Compute the loss value and its gradient with respect to the predictions
    fn compute_with_gradient(
        &self,
        membership: ArrayView2<'_, f64>,
        predictions: ArrayView2<'_, f64>,
        sample_weight: Option<ArrayView2<'_, f64>>,
    ) -> Result<LossOutput>;

    /// Compute the loss on one-dimensional inputs (one prediction per example)
    fn compute_slices(
        &self,
        membership: &[f64],
        predictions: &[f64],
        sample_weight: Option<&[f64]>,
    ) -> Result<f64> {
        let membership = column_view("membership", membership)?;
        let predictions = column_view("predictions", predictions)?;
        let sample_weight = sample_weight
            .map(|w| column_view("sample_weight", w))
            .transpose()?;
        self.compute(membership, predictions, sample_weight)
    }
}

/// View a slice as a [N, 1] column
pub(crate) fn column_view<'a>(name: &'static str, values: &'a [f64]) -> Result<ArrayView2<'a, f64>> {
    ArrayView2::from_shape((values.len(), 1), values).map_err(|_| MinDiffError::ShapeMismatch {
        name,
        expected: "[N, 1]".to_string(),
        actual: vec![values.len()],
    })
}
