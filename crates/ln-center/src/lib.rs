//! Center normalization of single text-line images.
//!
//! Pipeline:
//! - Optionally pre-shrink lines taller than `1.5 * target_height`.
//! - Estimate a per-column centerline on the inverted, smoothed line
//!   ([`measure`]) together with a half-window radius `r`.
//! - Dewarp: cut a `2r`-row window around the centerline from every column
//!   ([`dewarp`]), filling rows outside the image with a constant.
//! - Rescale to exactly `target_height` and report [`NormalizationParams`].
//!
//! [`local_to_global`] maps an x coordinate of the normalized line back onto
//! the source image using the recorded parameters.
//!
//! Input images are expected to have a bright background and dark ink, with
//! samples in `[0, 1]`. [`CenterNormalizer::process_u8`] wraps the pipeline for
//! 8-bit lines.

mod config;
mod dewarp;
mod measure;
mod normalize;

pub use config::CenterConfig;
pub use dewarp::{dewarp, dewarp_with};
pub use measure::{Measurement, TIE_BREAK_WEIGHT, centerline_kernel, measure};
pub use normalize::{
    CenterNormalizer, NormalizationParams, NormalizeOutput, intermediate_height, local_to_global,
};
