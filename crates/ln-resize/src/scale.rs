use ln_core::{Error, Image, ImageView, from_unit_f32};

use crate::area::resize_area_u8;
use crate::linear::resize_linear;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleMethod {
    Identity,
    Area,
    Linear,
}

impl ScaleMethod {
    pub fn name(self) -> &'static str {
        match self {
            Self::Identity => "identity",
            Self::Area => "area",
            Self::Linear => "linear",
        }
    }
}

/// Output size and interpolation chosen for a height-driven rescale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalePlan {
    pub scale: f64,
    pub width: usize,
    pub height: usize,
    pub method: ScaleMethod,
}

/// Plans a uniform rescale of a `width x height` image to `target_height`.
///
/// `width' = max(1, round_half_even(width * target_height / height))`.
pub fn plan_scale(width: usize, height: usize, target_height: usize) -> Result<ScalePlan, Error> {
    Error::ensure_non_empty(width, height)?;
    if target_height == 0 {
        return Err(Error::InvalidConfig("target height must be >= 1".into()));
    }

    if height == target_height {
        return Ok(ScalePlan {
            scale: 1.0,
            width,
            height,
            method: ScaleMethod::Identity,
        });
    }

    let scale = target_height as f64 / height as f64;
    let target_width = ((scale * width as f64).round_ties_even() as usize).max(1);
    let method = if scale <= 1.0 {
        ScaleMethod::Area
    } else {
        ScaleMethod::Linear
    };

    Ok(ScalePlan {
        scale,
        width: target_width,
        height: target_height,
        method,
    })
}

/// Rescales a `[0, 1]` float image to `target_height`, keeping the aspect
/// ratio.
///
/// Shrinking goes through 8 bit: samples are truncated to `k / 255`, area
/// averaged, rounded and divided by 255 again. Enlarging is bilinear on the
/// float data. At the current height the image is returned unchanged.
pub fn scale_to_height(
    img: &ImageView<'_, f32>,
    target_height: usize,
) -> Result<Image<f32>, Error> {
    let plan = plan_scale(img.width(), img.height(), target_height)?;

    match plan.method {
        ScaleMethod::Identity => Ok(img.to_image()),
        ScaleMethod::Area => {
            let quantized = from_unit_f32(img);
            let shrunk = resize_area_u8(&quantized.as_view(), plan.width, plan.height)?;
            let data = shrunk.data().iter().map(|&px| px as f32 / 255.0).collect();
            Image::from_vec(plan.width, plan.height, data)
        }
        ScaleMethod::Linear => resize_linear(img, plan.width, plan.height),
    }
}
