//! Elementwise transforms applied to predictions before the kernel
//!
//! A transform can smooth out the prediction distributions or limit their
//! range. Each transform carries its derivative so loss gradients can be
//! reported with respect to the untransformed predictions.

use crate::core::{MinDiffError, Result};
use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Elementwise transform of prediction scores
pub trait PredictionsTransform: Send + Sync {
    /// Transform a single prediction
    fn apply(&self, value: f64) -> f64;

    /// Derivative of [`PredictionsTransform::apply`] at `value`
    fn derivative(&self, value: f64) -> f64;

    /// Short identifier used in logs
    fn name(&self) -> &str {
        "custom"
    }

    /// Transform every prediction of a batch
    fn apply_array(&self, predictions: ArrayView2<'_, f64>) -> Array2<f64> {
        predictions.mapv(|v| self.apply(v))
    }

    /// Derivative at every prediction of a batch
    fn derivative_array(&self, predictions: ArrayView2<'_, f64>) -> Array2<f64> {
        predictions.mapv(|v| self.derivative(v))
    }
}

/// Clamp predictions into [min, max]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Clip {
    min: f64,
    max: f64,
}

impl Clip {
    /// Create a clip transform; `min` must not exceed `max`
    pub fn new(min: f64, max: f64) -> Result<Self> {
        if !(min <= max) {
            return Err(MinDiffError::InvalidParameter(format!(
                "Clip bounds must satisfy min <= max, got min={min}, max={max}"
            )));
        }
        Ok(Self { min, max })
    }

    /// Lower bound
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Upper bound
    pub fn max(&self) -> f64 {
        self.max
    }
}

impl PredictionsTransform for Clip {
    fn apply(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    fn derivative(&self, value: f64) -> f64 {
        // Gradient passes through on the closed interval, as with clip-by-value
        if value >= self.min && value <= self.max {
            1.0
        } else {
            0.0
        }
    }

    fn name(&self) -> &str {
        "clip"
    }
}

/// Logistic sigmoid, mapping logits into (0, 1)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Sigmoid;

impl PredictionsTransform for Sigmoid {
    fn apply(&self, value: f64) -> f64 {
        1.0 / (1.0 + (-value).exp())
    }

    fn derivative(&self, value: f64) -> f64 {
        let s = self.apply(value);
        s * (1.0 - s)
    }

    fn name(&self) -> &str {
        "sigmoid"
    }
}

type ScalarFn = Box<dyn Fn(f64) -> f64 + Send + Sync>;

/// Transform built from a user closure and its derivative
pub struct FnTransform {
    name: String,
    apply: ScalarFn,
    derivative: ScalarFn,
}

impl FnTransform {
    /// Wrap a scalar function and its derivative under `name`
    pub fn new<F, D>(name: impl Into<String>, apply: F, derivative: D) -> Self
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
        D: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            apply: Box::new(apply),
            derivative: Box::new(derivative),
        }
    }
}

impl fmt::Debug for FnTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnTransform").field("name", &self.name).finish()
    }
}

impl PredictionsTransform for FnTransform {
    fn apply(&self, value: f64) -> f64 {
        (self.apply)(value)
    }

    fn derivative(&self, value: f64) -> f64 {
        (self.derivative)(value)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Serializable choice of a built-in transform
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransformConfig {
    #[default]
    None,
    Clip {
        min: f64,
        max: f64,
    },
    Sigmoid,
}

impl TransformConfig {
    /// Build the configured transform, `None` for the identity
    pub fn build(&self) -> Result<Option<Box<dyn PredictionsTransform>>> {
        match *self {
            Self::None => Ok(None),
            Self::Clip { min, max } => Ok(Some(Box::new(Clip::new(min, max)?))),
            Self::Sigmoid => Ok(Some(Box::new(Sigmoid))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_clip() {
        let clip = Clip::new(0.0, 1.0).unwrap();
        assert_eq!(clip.apply(-0.5), 0.0);
        assert_eq!(clip.apply(0.3), 0.3);
        assert_eq!(clip.apply(1.7), 1.0);

        assert_eq!(clip.derivative(-0.5), 0.0);
        assert_eq!(clip.derivative(0.3), 1.0);
        assert_eq!(clip.derivative(1.0), 1.0);
        assert_eq!(clip.derivative(1.7), 0.0);
        assert_eq!(clip.name(), "clip");
    }

    #[test]
    fn test_clip_invalid_bounds() {
        assert!(Clip::new(1.0, 0.0).is_err());
        assert!(Clip::new(f64::NAN, 1.0).is_err());
        assert!(Clip::new(0.5, 0.5).is_ok());
    }

    #[test]
    fn test_sigmoid() {
        let sigmoid = Sigmoid;
        assert_abs_diff_eq!(sigmoid.apply(0.0), 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(sigmoid.derivative(0.0), 0.25, epsilon = 1e-12);
        assert!(sigmoid.apply(40.0) <= 1.0);
        assert!(sigmoid.apply(-40.0) >= 0.0);

        let h = 1e-6;
        let x = 0.7;
        let numeric = (sigmoid.apply(x + h) - sigmoid.apply(x - h)) / (2.0 * h);
        assert_abs_diff_eq!(sigmoid.derivative(x), numeric, epsilon = 1e-8);
    }

    #[test]
    fn test_fn_transform() {
        let square = FnTransform::new("square", |v| v * v, |v| 2.0 * v);
        assert_eq!(square.apply(3.0), 9.0);
        assert_eq!(square.derivative(3.0), 6.0);
        assert_eq!(square.name(), "square");

        let batch = array![[1.0], [-2.0]];
        assert_eq!(square.apply_array(batch.view()), array![[1.0], [4.0]]);
        assert_eq!(square.derivative_array(batch.view()), array![[2.0], [-4.0]]);
    }

    #[test]
    fn test_transform_config_build() {
        assert!(TransformConfig::None.build().unwrap().is_none());

        let clip = TransformConfig::Clip { min: 0.0, max: 1.0 }.build().unwrap().unwrap();
        assert_eq!(clip.name(), "clip");
        assert_eq!(clip.apply(2.0), 1.0);

        let sigmoid = TransformConfig::Sigmoid.build().unwrap().unwrap();
        assert_eq!(sigmoid.name(), "sigmoid");

        assert!(TransformConfig::Clip { min: 2.0, max: 1.0 }.build().is_err());
    }

    #[test]
    fn test_transform_config_serde() {
        let json = serde_json::to_string(&TransformConfig::Clip { min: 0.0, max: 1.0 }).unwrap();
        assert_eq!(json, r#"{"type":"clip","min":0.0,"max":1.0}"#);

        let parsed: TransformConfig = serde_json::from_str(r#"{"type":"sigmoid"}"#).unwrap();
        assert_eq!(parsed, TransformConfig::Sigmoid);

        let none: TransformConfig = serde_json::from_str(r#"{"type":"none"}"#).unwrap();
        assert_eq!(none, TransformConfig::None);
    }
}
