//! Utility functions for MinDiff computations

/// Numeric helpers with explicit conventions for degenerate inputs
pub mod numeric {
    use ndarray::{Array2, ArrayView2};

    /// Divide `numerator` by `denominator`, returning 0.0 when the denominator is 0.0
    ///
    /// Used for weighted means over subgroup pairs: a pair type with no
    /// members has zero total weight and its mean is defined as 0 instead of
    /// NaN, which would otherwise poison the gradient. Only an exact zero
    /// denominator triggers the fallback; any other value divides normally.
    pub fn divide_no_nan(numerator: f64, denominator: f64) -> f64 {
        if denominator == 0.0 {
            0.0
        } else {
            numerator / denominator
        }
    }

    /// Weighted mean `sum(weights * values) / sum(weights)`, 0.0 for zero total weight
    pub fn weighted_mean(weights: ArrayView2<'_, f64>, values: ArrayView2<'_, f64>) -> f64 {
        let weighted_sum = (&weights * &values).sum();
        divide_no_nan(weighted_sum, weights.sum())
    }

    /// Outer product of two column vectors: a [N, 1] and b [M, 1] give [N, M]
    pub fn outer(a: ArrayView2<'_, f64>, b: ArrayView2<'_, f64>) -> Array2<f64> {
        a.dot(&b.t())
    }

    /// Indicator column: 1.0 where `values` equals `target`, 0.0 elsewhere
    pub fn indicator(values: ArrayView2<'_, f64>, target: f64) -> Array2<f64> {
        values.mapv(|v| if v == target { 1.0 } else { 0.0 })
    }
}

/// Input validation shared by the losses
pub mod validation {
    use crate::core::{MinDiffError, Result};
    use ndarray::ArrayView2;

    /// Check that every membership value is exactly 0.0 or 1.0
    pub fn validate_membership(membership: ArrayView2<'_, f64>) -> Result<()> {
        for (index, &value) in membership.iter().enumerate() {
            if value != 0.0 && value != 1.0 {
                return Err(MinDiffError::InvalidMembership { index, value });
            }
        }
        Ok(())
    }

    /// Check that every sample weight is finite and non-negative
    pub fn validate_weights(weights: ArrayView2<'_, f64>) -> Result<()> {
        for (index, &value) in weights.iter().enumerate() {
            if !value.is_finite() || value < 0.0 {
                return Err(MinDiffError::InvalidWeight { index, value });
            }
        }
        Ok(())
    }

    /// Check that an array has the expected shape, naming it in the error
    pub fn expect_shape(
        name: &'static str,
        array: ArrayView2<'_, f64>,
        rows: usize,
        cols: Option<usize>,
    ) -> Result<()> {
        let (n, k) = array.dim();
        let cols_ok = cols.map_or(k >= 1, |c| k == c);
        if n != rows || !cols_ok {
            let expected = match cols {
                Some(c) => format!("[{rows}, {c}]"),
                None => format!("[{rows}, K] with K >= 1"),
            };
            return Err(MinDiffError::ShapeMismatch {
                name,
                expected,
                actual: vec![n, k],
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::numeric::*;
    use super::validation::*;
    use crate::core::MinDiffError;
    use ndarray::array;

    #[test]
    fn test_divide_no_nan() {
        assert_eq!(divide_no_nan(3.0, 2.0), 1.5);
        assert_eq!(divide_no_nan(3.0, 0.0), 0.0);
        assert_eq!(divide_no_nan(0.0, 0.0), 0.0);
        assert_eq!(divide_no_nan(-1.0, -0.0), 0.0);
    }

    #[test]
    fn test_weighted_mean() {
        let weights = array![[1.0, 0.0], [3.0, 0.0]];
        let values = array![[2.0, 100.0], [4.0, 100.0]];
        // (1*2 + 3*4) / 4 = 3.5
        assert_eq!(weighted_mean(weights.view(), values.view()), 3.5);
    }

    #[test]
    fn test_weighted_mean_zero_weight() {
        let weights = array![[0.0, 0.0], [0.0, 0.0]];
        let values = array![[1.0, 1.0], [1.0, 1.0]];
        let mean = weighted_mean(weights.view(), values.view());
        assert_eq!(mean, 0.0);
        assert!(!mean.is_nan());
    }

    #[test]
    fn test_outer() {
        let a = array![[1.0], [2.0]];
        let b = array![[3.0], [4.0], [5.0]];
        let product = outer(a.view(), b.view());
        assert_eq!(product, array![[3.0, 4.0, 5.0], [6.0, 8.0, 10.0]]);
    }

    #[test]
    fn test_indicator() {
        let membership = array![[1.0], [0.0], [1.0]];
        assert_eq!(indicator(membership.view(), 1.0), array![[1.0], [0.0], [1.0]]);
        assert_eq!(indicator(membership.view(), 0.0), array![[0.0], [1.0], [0.0]]);
    }

    #[test]
    fn test_validate_membership() {
        assert!(validate_membership(array![[0.0], [1.0], [1.0]].view()).is_ok());

        let err = validate_membership(array![[0.0], [0.5], [1.0]].view()).unwrap_err();
        assert!(matches!(
            err,
            MinDiffError::InvalidMembership { index: 1, value } if value == 0.5
        ));
    }

    #[test]
    fn test_validate_weights() {
        assert!(validate_weights(array![[0.0], [2.5]].view()).is_ok());
        assert!(matches!(
            validate_weights(array![[1.0], [-0.1]].view()),
            Err(MinDiffError::InvalidWeight { index: 1, .. })
        ));
        assert!(validate_weights(array![[f64::NAN]].view()).is_err());
        assert!(validate_weights(array![[f64::INFINITY]].view()).is_err());
    }

    #[test]
    fn test_expect_shape() {
        let a = array![[1.0, 2.0], [3.0, 4.0]];
        assert!(expect_shape("predictions", a.view(), 2, None).is_ok());
        assert!(expect_shape("predictions", a.view(), 2, Some(2)).is_ok());
        assert!(expect_shape("membership", a.view(), 2, Some(1)).is_err());
        assert!(expect_shape("predictions", a.view(), 3, None).is_err());
    }
}
