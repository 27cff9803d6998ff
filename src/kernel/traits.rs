//! Kernel trait definition

use crate::core::{MinDiffError, Result};
use ndarray::{Array2, Array3, ArrayView2, ArrayView3, ArrayViewD, Axis, Ix2, Ix3};

/// Kernel function trait
///
/// A kernel measures the similarity between every pair of rows of two
/// batches. Implementors provide the formula on pre-tiled inputs of shape
/// [N, M, D] through [`Kernel::call`]; the provided [`Kernel::compute`]
/// takes care of tiling and shape checks.
///
/// Losses rely on [`Kernel::call_gradient`] for a stationary kernel, that is
/// one whose value depends only on `x - y` and is even in that difference.
pub trait Kernel: Send + Sync {
    /// Compute K(x_i, y_j) for pre-tiled inputs of identical shape [N, M, D]
    fn call(&self, x: ArrayView3<'_, f64>, y: ArrayView3<'_, f64>) -> Array2<f64>;

    /// Compute the gradient of K(x_i, y_j) with respect to x_i, shape [N, M, D]
    fn call_gradient(&self, x: ArrayView3<'_, f64>, y: ArrayView3<'_, f64>) -> Array3<f64>;

    /// Whether [`Kernel::compute`] tiles rank-2 inputs into pairs
    fn tile_input(&self) -> bool;

    /// Short identifier of the kernel
    fn name(&self) -> &'static str;

    /// Compute the kernel matrix of `x` against `y` (or against itself)
    ///
    /// With `tile_input`, `x` [N, D] and `y` [M, D] are tiled into [N, M, D]
    /// grids. Without it, both must already be rank 3 with identical shape.
    fn compute<'a>(
        &self,
        x: ArrayViewD<'a, f64>,
        y: Option<ArrayViewD<'a, f64>>,
    ) -> Result<Array2<f64>> {
        let y = match y {
            Some(y) => y,
            None => x.clone(),
        };

        if self.tile_input() {
            let x = as_rank2("x", x)?;
            let y = as_rank2("y", y)?;
            let (x_tiled, y_tiled) = tile_pairs(x, y)?;
            Ok(self.call(x_tiled.view(), y_tiled.view()))
        } else {
            let x = as_rank3("x", x)?;
            let y = as_rank3("y", y)?;
            if x.dim() != y.dim() {
                let (n, m, d) = x.dim();
                return Err(MinDiffError::ShapeMismatch {
                    name: "y",
                    expected: format!("[{n}, {m}, {d}]"),
                    actual: y.shape().to_vec(),
                });
            }
            Ok(self.call(x, y))
        }
    }

    /// Kernel matrix of every row of `x` against every row of `x`, shape [N, N]
    fn pairwise(&self, x: ArrayView2<'_, f64>) -> Array2<f64> {
        let (a, b) = tile_unchecked(x, x);
        self.call(a.view(), b.view())
    }

    /// Gradient of K(x_i, x_j) with respect to x_i, shape [N, N, D]
    fn pairwise_gradient(&self, x: ArrayView2<'_, f64>) -> Array3<f64> {
        let (a, b) = tile_unchecked(x, x);
        self.call_gradient(a.view(), b.view())
    }
}

/// Tile `x` [N, D] and `y` [M, D] into two aligned [N, M, D] grids
///
/// Entry (i, j) of the first grid is row i of `x`; of the second, row j of `y`.
pub fn tile_pairs(
    x: ArrayView2<'_, f64>,
    y: ArrayView2<'_, f64>,
) -> Result<(Array3<f64>, Array3<f64>)> {
    if x.ncols() != y.ncols() {
        return Err(MinDiffError::DimensionMismatch {
            expected: x.ncols(),
            actual: y.ncols(),
        });
    }
    Ok(tile_unchecked(x, y))
}

fn tile_unchecked(x: ArrayView2<'_, f64>, y: ArrayView2<'_, f64>) -> (Array3<f64>, Array3<f64>) {
    let (n, d) = x.dim();
    let m = y.nrows();
    let x_tiled = Array3::from_shape_fn((n, m, d), |(i, _, k)| x[[i, k]]);
    let y_tiled = Array3::from_shape_fn((n, m, d), |(_, j, k)| y[[j, k]]);
    (x_tiled, y_tiled)
}

/// Squared Euclidean distance per aligned pair, reduced over the last axis
pub fn squared_distances(x: ArrayView3<'_, f64>, y: ArrayView3<'_, f64>) -> Array2<f64> {
    (&x - &y).mapv(|v| v * v).sum_axis(Axis(2))
}

fn as_rank2<'a>(name: &'static str, a: ArrayViewD<'a, f64>) -> Result<ArrayView2<'a, f64>> {
    let shape = a.shape().to_vec();
    a.into_dimensionality::<Ix2>()
        .map_err(|_| MinDiffError::ShapeMismatch {
            name,
            expected: "[N, D]".to_string(),
            actual: shape,
        })
}

fn as_rank3<'a>(name: &'static str, a: ArrayViewD<'a, f64>) -> Result<ArrayView3<'a, f64>> {
    let shape = a.shape().to_vec();
    a.into_dimensionality::<Ix3>()
        .map_err(|_| MinDiffError::ShapeMismatch {
            name,
            expected: "[N, M, D]".to_string(),
            actual: shape,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array1};

    #[test]
    fn test_tile_pairs() {
        let x = array![[1.0, 2.0], [3.0, 4.0]];
        let y = array![[5.0, 6.0], [7.0, 8.0], [9.0, 10.0]];

        let (xt, yt) = tile_pairs(x.view(), y.view()).unwrap();
        assert_eq!(xt.dim(), (2, 3, 2));
        assert_eq!(yt.dim(), (2, 3, 2));

        // Row i of x is repeated along the second axis
        assert_eq!(xt.slice(ndarray::s![1, 2, ..]), Array1::from(vec![3.0, 4.0]));
        // Row j of y is repeated along the first axis
        assert_eq!(yt.slice(ndarray::s![0, 2, ..]), Array1::from(vec![9.0, 10.0]));
        assert_eq!(yt.slice(ndarray::s![1, 2, ..]), Array1::from(vec![9.0, 10.0]));
    }

    #[test]
    fn test_tile_pairs_width_mismatch() {
        let x = array![[1.0, 2.0]];
        let y = array![[1.0, 2.0, 3.0]];
        assert!(matches!(
            tile_pairs(x.view(), y.view()),
            Err(MinDiffError::DimensionMismatch { expected: 2, actual: 3 })
        ));
    }

    #[test]
    fn test_squared_distances() {
        let x = array![[[0.0, 0.0], [1.0, 1.0]]];
        let y = array![[[3.0, 4.0], [1.0, 1.0]]];
        let d = squared_distances(x.view(), y.view());
        assert_eq!(d, array![[25.0, 0.0]]);
    }
}
