//! Umbrella crate for the `linenorm` workspace.
//!
//! Re-exports the image container, the filters, the resampler and the center
//! normalizer so applications depend on a single crate.

pub use ln_center::*;
pub use ln_core::*;
pub use ln_filter::{GaussianKernel1D, box_blur, gaussian_blur};
pub use ln_resize::*;
