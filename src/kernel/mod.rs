//! Kernel functions for MinDiff losses

pub mod gauss;
pub mod kind;
pub mod laplace;
pub mod traits;

pub use self::gauss::*;
pub use self::kind::*;
pub use self::laplace::*;
pub use self::traits::*;
