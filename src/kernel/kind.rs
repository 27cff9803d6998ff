//! Closed set of kernels selectable by name

use crate::core::{MinDiffError, Result};
use crate::kernel::{GaussKernel, Kernel, LaplaceKernel};
use ndarray::{Array2, Array3, ArrayView3};
use std::fmt;
use std::str::FromStr;

/// A kernel resolved at construction time, either by name or from an instance
///
/// Accepted names are `"gauss"` / `"gaussian"` and `"laplace"` / `"laplacian"`,
/// case-insensitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KernelKind {
    Gauss(GaussKernel),
    Laplace(LaplaceKernel),
}

impl KernelKind {
    /// Resolve a kernel name with explicit parameters
    pub fn from_name_with_params(name: &str, kernel_length: f64, tile_input: bool) -> Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "gauss" | "gaussian" => Ok(Self::Gauss(
                GaussKernel::new(kernel_length).with_tile_input(tile_input),
            )),
            "laplace" | "laplacian" => Ok(Self::Laplace(
                LaplaceKernel::new(kernel_length).with_tile_input(tile_input),
            )),
            _ => Err(MinDiffError::UnknownKernel(name.to_string())),
        }
    }

    /// Get the kernel length of the wrapped kernel
    pub fn kernel_length(&self) -> f64 {
        match self {
            Self::Gauss(k) => k.kernel_length(),
            Self::Laplace(k) => k.kernel_length(),
        }
    }
}

impl Default for KernelKind {
    fn default() -> Self {
        Self::Gauss(GaussKernel::default())
    }
}

impl FromStr for KernelKind {
    type Err = MinDiffError;

    /// Resolve a kernel name with default parameters
    fn from_str(name: &str) -> Result<Self> {
        let length = crate::core::DEFAULT_KERNEL_LENGTH;
        Self::from_name_with_params(name, length, true)
    }
}

impl From<GaussKernel> for KernelKind {
    fn from(kernel: GaussKernel) -> Self {
        Self::Gauss(kernel)
    }
}

impl From<LaplaceKernel> for KernelKind {
    fn from(kernel: LaplaceKernel) -> Self {
        Self::Laplace(kernel)
    }
}

impl fmt::Display for KernelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(kernel_length={})", self.name(), self.kernel_length())
    }
}

impl Kernel for KernelKind {
    fn call(&self, x: ArrayView3<'_, f64>, y: ArrayView3<'_, f64>) -> Array2<f64> {
        match self {
            Self::Gauss(k) => k.call(x, y),
            Self::Laplace(k) => k.call(x, y),
        }
    }

    fn call_gradient(&self, x: ArrayView3<'_, f64>, y: ArrayView3<'_, f64>) -> Array3<f64> {
        match self {
            Self::Gauss(k) => k.call_gradient(x, y),
            Self::Laplace(k) => k.call_gradient(x, y),
        }
    }

    fn tile_input(&self) -> bool {
        match self {
            Self::Gauss(k) => k.tile_input(),
            Self::Laplace(k) => k.tile_input(),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Gauss(k) => k.name(),
            Self::Laplace(k) => k.name(),
        }
    }
}
