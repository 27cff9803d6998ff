//! Input preprocessing shared by MinDiff losses
//!
//! Validates the shapes and values of a batch, fills in uniform sample
//! weights when none are given and normalizes the weights to sum to 1.

use crate::core::{MinDiffError, Preprocessed, Result};
use crate::transform::PredictionsTransform;
use crate::utils::numeric::divide_no_nan;
use crate::utils::validation::{expect_shape, validate_membership, validate_weights};
use ndarray::{Array2, ArrayView2};

/// Validate a batch and normalize its sample weights
///
/// - `membership` must be [N, 1] with values in {0.0, 1.0}
/// - `predictions` must be [N, K] with K >= 1
/// - `sample_weight`, when given, must be [N, 1], finite and non-negative;
///   when absent every example gets weight 1
pub fn preprocess_inputs(
    membership: ArrayView2<'_, f64>,
    predictions: ArrayView2<'_, f64>,
    sample_weight: Option<ArrayView2<'_, f64>>,
) -> Result<Preprocessed> {
    let n = membership.nrows();
    if n == 0 {
        return Err(MinDiffError::EmptyBatch);
    }

    expect_shape("membership", membership, n, Some(1))?;
    expect_shape("predictions", predictions, n, None)?;
    validate_membership(membership)?;

    let weights = match sample_weight {
        Some(weights) => {
            expect_shape("sample_weight", weights, n, Some(1))?;
            validate_weights(weights)?;
            weights.to_owned()
        }
        None => Array2::ones((n, 1)),
    };

    Ok(Preprocessed {
        membership: membership.to_owned(),
        predictions: predictions.to_owned(),
        normed_weights: normalize_weights(weights.view()),
    })
}

/// Scale weights to sum to 1; all-zero weights stay all zero
pub fn normalize_weights(weights: ArrayView2<'_, f64>) -> Array2<f64> {
    let total = weights.sum();
    weights.mapv(|w| divide_no_nan(w, total))
}

/// Apply an optional transform, returning the transformed predictions and,
/// for a real transform, its derivative at each raw prediction
pub fn apply_transform(
    predictions: ArrayView2<'_, f64>,
    transform: Option<&dyn PredictionsTransform>,
) -> (Array2<f64>, Option<Array2<f64>>) {
    match transform {
        Some(t) => (t.apply_array(predictions), Some(t.derivative_array(predictions))),
        None => (predictions.to_owned(), None),
    }
}
