//! Foundational primitives for text-line normalization.
//!
//! ## Image Views and Stride
//! Images use element stride (not byte stride). `stride` is the distance, in
//! elements, between adjacent row starts and may be greater than `width`.
//! This allows borrowed views over padded buffers and subviews.
//!
//! ## Border Modes
//! Filtering and sampling support clamp, constant fill, reflect and
//! reflect-101 behavior. Reflect mirrors around the outer pixel edge and
//! repeats the edge element (`cba|abcd|dcb`); reflect-101 mirrors around edge
//! pixels without repeating them (`dcb|abcd|cba`).
//!
//! ## Intensity Range
//! Pipeline math runs on `f32` samples in `[0, 1]`. [`to_unit_f32`] and
//! [`from_unit_f32`] convert at the 8-bit boundary.
//!
//! ## Sampling Coordinates
//! Sampling uses pixel-center coordinates where integer coordinates refer to
//! pixel centers. Bilinear uses the standard floor-based 2x2 interpolation
//! neighborhood.

mod border;
mod error;
mod image;
mod sample;

pub use border::{BorderMode, map_index};
pub use error::Error;
pub use image::{Image, ImageView, from_unit_f32, max_value, to_unit_f32};
pub use sample::sample_bilinear_f32;
