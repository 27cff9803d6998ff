//! Core type definitions for MinDiff losses

use ndarray::Array2;

/// Default kernel length (sometimes called width) shared by all kernels
pub const DEFAULT_KERNEL_LENGTH: f64 = 0.1;

/// Default name used for logging and tracking an [`MMDLoss`](crate::loss::MMDLoss)
pub const DEFAULT_MMD_LOSS_NAME: &str = "mmd_loss";

/// Validated and normalized inputs of a MinDiff loss
#[derive(Debug, Clone, PartialEq)]
pub struct Preprocessed {
    /// Membership labels, shape [N, 1], values in {0.0, 1.0}
    pub membership: Array2<f64>,
    /// Raw prediction scores, shape [N, K]
    pub predictions: Array2<f64>,
    /// Sample weights normalized to sum to 1, shape [N, 1]
    pub normed_weights: Array2<f64>,
}

impl Preprocessed {
    /// Number of examples in the batch
    pub fn n_examples(&self) -> usize {
        self.membership.nrows()
    }

    /// Number of examples in the positive (membership 1.0) subgroup
    pub fn n_positive(&self) -> usize {
        self.membership.iter().filter(|&&m| m == 1.0).count()
    }

    /// Number of examples in the negative (membership 0.0) subgroup
    pub fn n_negative(&self) -> usize {
        self.membership.iter().filter(|&&m| m == 0.0).count()
    }
}

/// Weighted mean kernel values per subgroup pair type
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GroupMeans {
    /// Mean kernel value over positive-positive pairs
    pub pos_pos: f64,
    /// Mean kernel value over negative-negative pairs
    pub neg_neg: f64,
    /// Mean kernel value over positive-negative pairs
    pub pos_neg: f64,
}

impl GroupMeans {
    /// Squared MMD estimate: pos_pos - 2 * pos_neg + neg_neg
    ///
    /// The square root is never taken: its derivative blows up near 0.
    pub fn squared_mmd(&self) -> f64 {
        self.pos_pos - 2.0 * self.pos_neg + self.neg_neg
    }
}

/// Loss value together with its gradient
#[derive(Debug, Clone, PartialEq)]
pub struct LossOutput {
    /// Scalar loss value
    pub value: f64,
    /// Gradient of the value with respect to the raw predictions, shape [N, K]
    pub gradient: Array2<f64>,
}
