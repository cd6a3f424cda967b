//! Smoothing primitives for text-line normalization.
//!
//! Coordinates follow pixel-center convention: sample `signal[i]` is located at
//! position `x = i`.
//!
//! Every primitive takes an explicit [`ln_core::BorderMode`] so results do not
//! depend on hidden defaults:
//! - [`gaussian_blur`] is separable (rows, then columns) with kernel length
//!   `round(8 * sigma + 1)` forced odd, i.e. four sigmas on each side.
//! - [`box_blur`] averages a `kw x kh` window anchored at `(kw / 2, kh / 2)`.
//! - [`conv1d::correlate_f32`] smooths a single sequence with an arbitrary,
//!   possibly even-length kernel.

mod blur;
pub mod conv1d;
pub mod kernels1d;

pub use blur::{box_blur, gaussian_blur};
pub use kernels1d::GaussianKernel1D;
