//! Gauss kernel implementation
//!
//! The Gauss (squared-exponential) kernel is defined as:
//! K(x, y) = exp(-||x - y||² / l²)
//! where l is the kernel length (sometimes also called width).

use crate::core::DEFAULT_KERNEL_LENGTH;
use crate::kernel::traits::{squared_distances, Kernel};
use ndarray::{Array2, Array3, ArrayView3};

/// Gauss kernel: K(x, y) = exp(-||x - y||² / l²)
///
/// The choice of kernel length should be related to the range of the inputs:
/// the smaller the input range, the smaller the kernel length likely needs
/// to be. Values lie in (0, 1] and equal 1 exactly when x = y.
///
/// The kernel length is not validated. A non-positive length gives infinite
/// or NaN kernel values through float semantics; callers validate upstream.
///
/// See <https://arxiv.org/abs/1910.11779> for reference.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussKernel {
    kernel_length: f64,
    tile_input: bool,
}

impl GaussKernel {
    /// Create a new Gauss kernel with the given length, tiling its inputs
    pub fn new(kernel_length: f64) -> Self {
        Self {
            kernel_length,
            tile_input: true,
        }
    }

    /// Set whether rank-2 inputs are tiled into pairs by `compute`
    pub fn with_tile_input(mut self, tile_input: bool) -> Self {
        self.tile_input = tile_input;
        self
    }

    /// Get the kernel length
    pub fn kernel_length(&self) -> f64 {
        self.kernel_length
    }
}

impl Default for GaussKernel {
    /// Gauss kernel with length 0.1 and tiled inputs
    fn default() -> Self {
        Self::new(DEFAULT_KERNEL_LENGTH)
    }
}

impl Kernel for GaussKernel {
    fn call(&self, x: ArrayView3<'_, f64>, y: ArrayView3<'_, f64>) -> Array2<f64> {
        let length_sq = self.kernel_length.powi(2);
        squared_distances(x, y).mapv(|d| (-d / length_sq).exp())
    }

    fn call_gradient(&self, x: ArrayView3<'_, f64>, y: ArrayView3<'_, f64>) -> Array3<f64> {
        // dK/dx = -2 (x - y) / l² * K
        let values = self.call(x, y);
        let scale = -2.0 / self.kernel_length.powi(2);
        let mut gradient = &x - &y;
        for ((i, j, _), g) in gradient.indexed_iter_mut() {
            *g *= scale * values[[i, j]];
        }
        gradient
    }

    fn tile_input(&self) -> bool {
        self.tile_input
    }

    fn name(&self) -> &'static str {
        "gauss"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{array, s, Array2};

    #[test]
    fn test_gauss_kernel_creation() {
        let kernel = GaussKernel::new(0.5);
        assert_eq!(kernel.kernel_length(), 0.5);
        assert!(kernel.tile_input());

        let kernel_default = GaussKernel::default();
        assert_eq!(kernel_default.kernel_length(), 0.1);
        assert!(kernel_default.tile_input());

        let untiled = GaussKernel::new(1.0).with_tile_input(false);
        assert!(!untiled.tile_input());
        assert_eq!(untiled.name(), "gauss");
    }

    #[test]
    fn test_gauss_kernel_identical_inputs() {
        let kernel = GaussKernel::new(0.3);
        let x = array![[0.1, 0.2], [0.5, -1.0], [3.0, 4.0]];

        let result = kernel.compute(x.view().into_dyn(), None).unwrap();
        assert_eq!(result.dim(), (3, 3));
        for i in 0..3 {
            assert_abs_diff_eq!(result[[i, i]], 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_gauss_kernel_values() {
        let kernel = GaussKernel::new(2.0);
        let x = array![[1.0], [3.0]];
        let y = array![[1.0], [4.0], [-1.0]];

        let result = kernel
            .compute(x.view().into_dyn(), Some(y.view().into_dyn()))
            .unwrap();
        assert_eq!(result.dim(), (2, 3));

        // exp(-d² / 4)
        let expected = array![
            [1.0, (-9.0_f64 / 4.0).exp(), (-4.0_f64 / 4.0).exp()],
            [(-4.0_f64 / 4.0).exp(), (-1.0_f64 / 4.0).exp(), (-16.0_f64 / 4.0).exp()],
        ];
        for (a, b) in result.iter().zip(expected.iter()) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_gauss_kernel_symmetry() {
        let kernel = GaussKernel::new(0.7);
        let x = array![[0.0, 1.0], [2.0, -1.0]];
        let y = array![[1.0, 1.0], [0.5, 0.5], [-2.0, 3.0]];

        let xy = kernel
            .compute(x.view().into_dyn(), Some(y.view().into_dyn()))
            .unwrap();
        let yx = kernel
            .compute(y.view().into_dyn(), Some(x.view().into_dyn()))
            .unwrap();
        assert_eq!(xy, yx.t());

        let xx = kernel.pairwise(x.view());
        assert_eq!(xx, xx.t());
    }

    #[test]
    fn test_gauss_kernel_decreases_with_distance() {
        let kernel = GaussKernel::new(1.0);
        let x = array![[0.0]];
        let y = array![[0.5], [1.0], [2.0], [3.0]];

        let result = kernel
            .compute(x.view().into_dyn(), Some(y.view().into_dyn()))
            .unwrap();
        let row: Vec<f64> = result.row(0).to_vec();

        for pair in row.windows(2) {
            assert!(pair[0] > pair[1]);
        }
        assert!(row.iter().all(|&k| k > 0.0 && k <= 1.0));
    }

    #[test]
    fn test_gauss_kernel_pretiled_inputs() {
        let kernel = GaussKernel::new(1.0).with_tile_input(false);
        let x = array![[[0.0], [1.0]], [[2.0], [3.0]]];
        let y = array![[[0.0], [0.0]], [[0.0], [3.0]]];

        let result = kernel
            .compute(x.view().into_dyn(), Some(y.view().into_dyn()))
            .unwrap();
        let expected = array![[1.0, (-1.0_f64).exp()], [(-4.0_f64).exp(), 1.0]];
        for (a, b) in result.iter().zip(expected.iter()) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_gauss_kernel_rejects_wrong_rank() {
        let tiled = GaussKernel::new(1.0);
        let rank3 = array![[[0.0]]];
        assert!(tiled.compute(rank3.view().into_dyn(), None).is_err());

        let untiled = GaussKernel::new(1.0).with_tile_input(false);
        let rank2 = array![[0.0]];
        assert!(untiled.compute(rank2.view().into_dyn(), None).is_err());

        let a = array![[[0.0], [1.0]]];
        let b = array![[[0.0]]];
        assert!(untiled
            .compute(a.view().into_dyn(), Some(b.view().into_dyn()))
            .is_err());
    }

    #[test]
    fn test_gauss_kernel_zero_length_is_not_an_error() {
        let kernel = GaussKernel::new(0.0);
        let x = array![[0.0], [1.0]];
        let result = kernel.pairwise(x.view());

        // 0 / 0 on the diagonal, -inf off it
        assert!(result[[0, 0]].is_nan());
        assert_eq!(result[[0, 1]], 0.0);
    }

    #[test]
    fn test_gauss_kernel_gradient_matches_finite_differences() {
        let kernel = GaussKernel::new(0.8);
        let x = array![[0.3, -0.2], [1.1, 0.4]];
        let gradient = kernel.pairwise_gradient(x.view());
        assert_eq!(gradient.dim(), (2, 2, 2));

        // Perturb x_0 and watch K(x_0, x_1)
        let h = 1e-6;
        let value_at = |point: &Array2<f64>| -> f64 {
            let other = x.slice(s![1..2, ..]);
            kernel
                .compute(point.view().into_dyn(), Some(other.into_dyn()))
                .unwrap()[[0, 0]]
        };
        for k in 0..2 {
            let mut plus = x.slice(s![0..1, ..]).to_owned();
            plus[[0, k]] += h;
            let mut minus = x.slice(s![0..1, ..]).to_owned();
            minus[[0, k]] -= h;
            let numeric = (value_at(&plus) - value_at(&minus)) / (2.0 * h);
            assert_abs_diff_eq!(gradient[[0, 1, k]], numeric, epsilon = 1e-6);
        }

        // Zero gradient for identical points
        assert_eq!(gradient[[1, 1, 0]], 0.0);
        assert_eq!(gradient[[1, 1, 1]], 0.0);
    }
}
