//! MinDiff losses and their shared input preprocessing

pub mod mmd;
pub mod preprocess;

pub use self::mmd::*;
pub use self::preprocess::*;
