//! Maximum Mean Discrepancy (MMD) loss
//!
//! The MMD measures the distance between the distributions of prediction
//! scores on two groups of examples. With kernel k and subgroups P (positive,
//! membership 1.0) and Q (negative, membership 0.0):
//!
//! MMD²(P, Q) = E[k(p, p')] - 2 E[k(p, q)] + E[k(q, q')]
//!
//! Each expectation is a weighted mean over the corresponding pairs of the
//! batch, with pair weights given by the outer product of the normalized
//! sample weights. The loss is MMD², never square-rooted: the derivative of
//! the square root blows up when the value is close to 0.
//!
//! Only hard membership of 0.0 or 1.0 is supported. If a subgroup is absent
//! from the batch, its means are 0 and the loss degrades gracefully, though
//! the estimate can be biased for very small batches.
//!
//! For more details, see Gretton et al., "A Kernel Method for the
//! Two-Sample-Problem" (NIPS 2006).

use crate::config::LossConfig;
use crate::core::{
    GroupMeans, LossOutput, MinDiffLoss, Preprocessed, Result, DEFAULT_MMD_LOSS_NAME,
};
use crate::kernel::{Kernel, KernelKind};
use crate::loss::preprocess::{apply_transform, preprocess_inputs};
use crate::transform::PredictionsTransform;
use crate::utils::numeric::{divide_no_nan, indicator, outer, weighted_mean};
use log::debug;
use ndarray::{Array2, ArrayView2, Axis};

/// MMD loss between predictions on two groups of examples
///
/// Defaults to a [`GaussKernel`](crate::kernel::GaussKernel) with length 0.1.
pub struct MMDLoss<K: Kernel = KernelKind> {
    kernel: K,
    predictions_transform: Option<Box<dyn PredictionsTransform>>,
    name: String,
}

impl MMDLoss<KernelKind> {
    /// Create an MMD loss with the default Gauss kernel
    pub fn new() -> Self {
        Self::with_kernel(KernelKind::default())
    }

    /// Create an MMD loss with a kernel selected by name, default parameters
    pub fn from_kernel_name(name: &str) -> Result<Self> {
        Ok(Self::with_kernel(name.parse()?))
    }

    /// Build an MMD loss from a validated configuration
    pub fn from_config(config: &LossConfig) -> Result<Self> {
        config.validate()?;
        let kernel =
            KernelKind::from_name_with_params(&config.kernel, config.kernel_length, config.tile_input)?;
        let mut loss = Self::with_kernel(kernel);
        loss.predictions_transform = config.transform.build()?;
        if let Some(name) = &config.name {
            loss.name = name.clone();
        }
        Ok(loss)
    }
}

impl Default for MMDLoss<KernelKind> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Kernel> MMDLoss<K> {
    /// Create an MMD loss with a custom kernel
    pub fn with_kernel(kernel: K) -> Self {
        Self {
            kernel,
            predictions_transform: None,
            name: DEFAULT_MMD_LOSS_NAME.to_string(),
        }
    }

    /// Apply `transform` to the predictions before the kernel
    pub fn with_predictions_transform<T>(mut self, transform: T) -> Self
    where
        T: PredictionsTransform + 'static,
    {
        self.predictions_transform = Some(Box::new(transform));
        self
    }

    /// Set the name used for logging and tracking
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Get the kernel
    pub fn kernel(&self) -> &K {
        &self.kernel
    }

    /// Get the predictions transform, if any
    pub fn predictions_transform(&self) -> Option<&dyn PredictionsTransform> {
        self.predictions_transform.as_deref()
    }

    /// Compute the per-pair-type weighted mean kernel values of a batch
    pub fn group_means(
        &self,
        membership: ArrayView2<'_, f64>,
        predictions: ArrayView2<'_, f64>,
        sample_weight: Option<ArrayView2<'_, f64>>,
    ) -> Result<GroupMeans> {
        let prep = preprocess_inputs(membership, predictions, sample_weight)?;
        let (transformed, _) = apply_transform(prep.predictions.view(), self.predictions_transform());
        let kernel_matrix = self.kernel.compute(transformed.view().into_dyn(), None)?;
        Ok(PairWeights::new(&prep).means(kernel_matrix.view()))
    }

    /// Compute the group means together with the gradient of the loss with
    /// respect to the predictions, shape [N, K]
    pub fn group_means_with_gradient(
        &self,
        membership: ArrayView2<'_, f64>,
        predictions: ArrayView2<'_, f64>,
        sample_weight: Option<ArrayView2<'_, f64>>,
    ) -> Result<(GroupMeans, Array2<f64>)> {
        let prep = preprocess_inputs(membership, predictions, sample_weight)?;
        let (transformed, derivative) =
            apply_transform(prep.predictions.view(), self.predictions_transform());

        let kernel_matrix = self.kernel.compute(transformed.view().into_dyn(), None)?;
        let pair_weights = PairWeights::new(&prep);
        let means = pair_weights.means(kernel_matrix.view());

        // loss = sum_ij c_ij K(p_i, p_j); for a stationary kernel
        // d loss / d p_a = sum_j (c_aj + c_ja) dK(p_a, p_j) / dp_a
        let coefficients = pair_weights.loss_coefficients();
        let symmetric = &coefficients + &coefficients.t();
        let kernel_gradient = self.kernel.pairwise_gradient(transformed.view());

        let mut gradient = Array2::<f64>::zeros(transformed.raw_dim());
        for (a, mut row) in gradient.axis_iter_mut(Axis(0)).enumerate() {
            let pair_grads = kernel_gradient.index_axis(Axis(0), a);
            let weights = symmetric.row(a);
            row.assign(&weights.dot(&pair_grads));
        }

        if let Some(derivative) = derivative {
            gradient *= &derivative;
        }

        Ok((means, gradient))
    }

    fn log_means(&self, means: &GroupMeans, value: f64) {
        debug!(
            "{} ({}): pos_pos={:.6}, neg_neg={:.6}, pos_neg={:.6}, loss={:.6}",
            self.name,
            self.kernel.name(),
            means.pos_pos,
            means.neg_neg,
            means.pos_neg,
            value
        );
    }
}

impl<K: Kernel> MinDiffLoss for MMDLoss<K> {
    fn name(&self) -> &str {
        &self.name
    }

    fn compute(
        &self,
        membership: ArrayView2<'_, f64>,
        predictions: ArrayView2<'_, f64>,
        sample_weight: Option<ArrayView2<'_, f64>>,
    ) -> Result<f64> {
        let means = self.group_means(membership, predictions, sample_weight)?;
        let value = means.squared_mmd();
        self.log_means(&means, value);
        Ok(value)
    }

    fn compute_with_gradient(
        &self,
        membership: ArrayView2<'_, f64>,
        predictions: ArrayView2<'_, f64>,
        sample_weight: Option<ArrayView2<'_, f64>>,
    ) -> Result<LossOutput> {
        let (means, gradient) =
            self.group_means_with_gradient(membership, predictions, sample_weight)?;
        let value = means.squared_mmd();
        self.log_means(&means, value);

        Ok(LossOutput { value, gradient })
    }
}

/// Pairwise weight matrices isolated per subgroup pair type
struct PairWeights {
    pos_pos: Array2<f64>,
    neg_neg: Array2<f64>,
    pos_neg: Array2<f64>,
}

impl PairWeights {
    fn new(prep: &Preprocessed) -> Self {
        let weights_ij = outer(prep.normed_weights.view(), prep.normed_weights.view());

        let pos_mask = indicator(prep.membership.view(), 1.0);
        let neg_mask = indicator(prep.membership.view(), 0.0);

        Self {
            pos_pos: &weights_ij * &outer(pos_mask.view(), pos_mask.view()),
            neg_neg: &weights_ij * &outer(neg_mask.view(), neg_mask.view()),
            pos_neg: &weights_ij * &outer(pos_mask.view(), neg_mask.view()),
        }
    }

    fn means(&self, kernel_matrix: ArrayView2<'_, f64>) -> GroupMeans {
        GroupMeans {
            pos_pos: weighted_mean(self.pos_pos.view(), kernel_matrix),
            neg_neg: weighted_mean(self.neg_neg.view(), kernel_matrix),
            pos_neg: weighted_mean(self.pos_neg.view(), kernel_matrix),
        }
    }

    /// Coefficients c_ij such that loss = sum_ij c_ij K_ij
    fn loss_coefficients(&self) -> Array2<f64> {
        let pos_pos_total = self.pos_pos.sum();
        let neg_neg_total = self.neg_neg.sum();
        let pos_neg_total = self.pos_neg.sum();

        let mut coefficients = self.pos_pos.mapv(|w| divide_no_nan(w, pos_pos_total));
        coefficients += &self.neg_neg.mapv(|w| divide_no_nan(w, neg_neg_total));
        coefficients -= &self.pos_neg.mapv(|w| 2.0 * divide_no_nan(w, pos_neg_total));
        coefficients
    }
}
