//! Loss configuration and persistence
//!
//! A [`LossConfig`] describes an MMD loss in a serializable form, so the CLI
//! and training scripts can share the same settings through a JSON file.

use crate::core::{MinDiffError, Result, DEFAULT_KERNEL_LENGTH};
use crate::kernel::KernelKind;
use crate::transform::TransformConfig;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Serializable description of an MMD loss
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LossConfig {
    /// Kernel name: `"gauss"` or `"laplace"`
    pub kernel: String,
    /// Kernel length (width), must be positive
    pub kernel_length: f64,
    /// Whether the kernel tiles its inputs into pairs
    pub tile_input: bool,
    /// Name used for logging; `"mmd_loss"` when absent
    pub name: Option<String>,
    /// Transform applied to the predictions before the kernel
    pub transform: TransformConfig,
}

impl Default for LossConfig {
    fn default() -> Self {
        Self {
            kernel: "gauss".to_string(),
            kernel_length: DEFAULT_KERNEL_LENGTH,
            tile_input: true,
            name: None,
            transform: TransformConfig::None,
        }
    }
}

impl LossConfig {
    /// Check the kernel name and length
    ///
    /// Kernels themselves never validate their length; file-driven
    /// configurations are checked here instead.
    pub fn validate(&self) -> Result<()> {
        if !(self.kernel_length > 0.0 && self.kernel_length.is_finite()) {
            return Err(MinDiffError::InvalidParameter(format!(
                "kernel_length must be positive, got: {}",
                self.kernel_length
            )));
        }
        KernelKind::from_name_with_params(&self.kernel, self.kernel_length, self.tile_input)?;
        self.transform.build()?;
        Ok(())
    }

    /// Save the configuration as pretty-printed JSON
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path).map_err(MinDiffError::IoError)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)
            .map_err(|e| MinDiffError::SerializationError(e.to_string()))?;
        Ok(())
    }

    /// Load a configuration from a JSON file; missing fields take defaults
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path).map_err(MinDiffError::IoError)?;
        let reader = BufReader::new(file);
        let config = serde_json::from_reader(reader)
            .map_err(|e| MinDiffError::SerializationError(e.to_string()))?;
        Ok(config)
    }

    /// Print configuration summary
    pub fn print_summary(&self) {
        println!("=== MMD Loss Configuration ===");
        println!("Name: {}", self.name.as_deref().unwrap_or(crate::core::DEFAULT_MMD_LOSS_NAME));
        println!("Kernel: {}", self.kernel);
        println!("Kernel Length: {}", self.kernel_length);
        println!("Tile Input: {}", self.tile_input);
        println!("Transform: {:?}", self.transform);
    }
}
