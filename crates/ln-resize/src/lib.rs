//! Resampling primitives for text-line normalization.
//!
//! Scaling is always uniform: the factor comes from the height ratio and is
//! applied to both axes, with the output width rounded half to even and kept
//! at least 1.
//!
//! Interpolation policy:
//! - Shrinking (`scale <= 1`) averages source areas. Samples are quantized to
//!   8 bit before averaging and the result is rounded back to 8 bit, so a
//!   shrink lands on the `k / 255` grid.
//! - Enlarging (`scale > 1`) interpolates bilinearly on float data with
//!   pixel-center alignment and a replicated border.
//! - A request for the current height returns an unchanged copy.

mod area;
mod linear;
mod scale;

pub use area::{resize_area_f32, resize_area_u8};
pub use linear::resize_linear;
pub use scale::{ScaleMethod, ScalePlan, plan_scale, scale_to_height};
