//! CSV batch loading
//!
//! Each row holds one example: `membership,prediction[,weight]`.
//! - The weight column is optional but must be present on every row or none
//! - The first row can be a header (automatically detected)
//! - Empty lines and lines starting with `#` are skipped

use crate::core::{MinDiffError, Result};
use log::info;
use ndarray::Array2;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// A batch of examples read from CSV
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    membership: Vec<f64>,
    predictions: Vec<f64>,
    weights: Option<Vec<f64>>,
}

impl Batch {
    /// Create a batch; all columns must have the same length
    pub fn new(membership: Vec<f64>, predictions: Vec<f64>, weights: Option<Vec<f64>>) -> Result<Self> {
        if predictions.len() != membership.len() {
            return Err(MinDiffError::DimensionMismatch {
                expected: membership.len(),
                actual: predictions.len(),
            });
        }
        if let Some(w) = &weights {
            if w.len() != membership.len() {
                return Err(MinDiffError::DimensionMismatch {
                    expected: membership.len(),
                    actual: w.len(),
                });
            }
        }
        Ok(Self {
            membership,
            predictions,
            weights,
        })
    }

    /// Load a batch from a CSV file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(MinDiffError::IoError)?;
        let batch = Self::from_reader(BufReader::new(file))?;
        info!("Loaded {} examples from {:?}", batch.len(), path);
        Ok(batch)
    }

    /// Load a batch from a reader
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut membership = Vec::new();
        let mut predictions = Vec::new();
        let mut weights: Option<Vec<f64>> = None;
        let mut seen_data = false;

        for (line_no, line) in reader.lines().enumerate() {
            let line = line.map_err(MinDiffError::IoError)?;
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if !seen_data && Self::is_header_line(line) {
                seen_data = true;
                continue;
            }
            seen_data = true;

            let fields = Self::parse_fields(line, line_no + 1)?;
            let expected = match (&weights, membership.is_empty()) {
                (_, true) if fields.len() == 3 => 3,
                (Some(_), false) => 3,
                _ => 2,
            };
            if fields.len() != expected {
                return Err(MinDiffError::ParseError(format!(
                    "Line {}: expected {expected} fields, got {}",
                    line_no + 1,
                    fields.len()
                )));
            }
            if expected == 3 && weights.is_none() {
                weights = Some(Vec::new());
            }

            membership.push(fields[0]);
            predictions.push(fields[1]);
            if let Some(w) = weights.as_mut() {
                w.push(fields[2]);
            }
        }

        if membership.is_empty() {
            return Err(MinDiffError::EmptyBatch);
        }

        Self::new(membership, predictions, weights)
    }

    /// Check if a line appears to be a header (no field is numeric)
    fn is_header_line(line: &str) -> bool {
        line.split(',')
            .all(|field| field.trim().parse::<f64>().is_err())
    }

    fn parse_fields(line: &str, line_no: usize) -> Result<Vec<f64>> {
        line.split(',')
            .map(|field| {
                let field = field.trim();
                field.parse::<f64>().map_err(|_| {
                    MinDiffError::ParseError(format!("Line {line_no}: invalid number: {field}"))
                })
            })
            .collect()
    }

    /// Number of examples
    pub fn len(&self) -> usize {
        self.membership.len()
    }

    /// Check if the batch is empty
    pub fn is_empty(&self) -> bool {
        self.membership.is_empty()
    }

    /// Subgroup membership labels, one per example
    pub fn membership(&self) -> &[f64] {
        &self.membership
    }

    /// Prediction scores, one per example
    pub fn predictions(&self) -> &[f64] {
        &self.predictions
    }

    /// Sample weights, if the batch carries a weight column
    pub fn weights(&self) -> Option<&[f64]> {
        self.weights.as_deref()
    }

    /// Predictions as a [N, 1] array
    pub fn predictions_array(&self) -> Array2<f64> {
        Array2::from_shape_fn((self.predictions.len(), 1), |(i, _)| self.predictions[i])
    }
}
