//! Batch loading for offline loss evaluation
//!
//! This module reads batches of membership labels, prediction scores and
//! optional sample weights exported by a training pipeline.

pub mod csv;

pub use self::csv::*;
