use ln_core::{Error, Image, ImageView, max_value};
use tracing::debug;

use crate::config::CenterConfig;
use crate::measure::{Measurement, measure};

/// Straightens `img` around its centerline; see [`dewarp_with`].
pub fn dewarp(
    img: &ImageView<'_, f32>,
    cval: f32,
    cfg: &CenterConfig,
) -> Result<Image<f32>, Error> {
    dewarp_with(img, cval, cfg).map(|(out, _)| out)
}

/// Straightens `img` around its centerline and returns the measurement used.
///
/// The line is inverted (`max - v`) and scaled to `[0, 1]` before measuring.
/// Column `x` of the output holds source rows `[c[x] - r, c[x] + r)`, read
/// from a copy padded with `r` rows of `cval` on each side. The output is
/// `2r` rows high.
///
/// A line without contrast has nothing to measure: the zero-filled inverted
/// image of the same size is returned with no measurement.
pub fn dewarp_with(
    img: &ImageView<'_, f32>,
    cval: f32,
    cfg: &CenterConfig,
) -> Result<(Image<f32>, Option<Measurement>), Error> {
    let (w, h) = (img.width(), img.height());
    let Some(peak) = max_value(img) else {
        return Err(Error::EmptyImage {
            width: w,
            height: h,
        });
    };

    let mut ink = Image::new_fill(w, h, 0.0f32);
    for y in 0..h {
        for (d, &v) in ink.row_mut(y).iter_mut().zip(img.row(y)) {
            *d = peak - v;
        }
    }

    let ink_peak = max_value(&ink.as_view()).unwrap_or(0.0);
    if ink_peak == 0.0 {
        debug!(width = w, height = h, "blank line, skipping centerline");
        return Ok((ink, None));
    }
    for v in ink.data_mut() {
        *v /= ink_peak;
    }

    let m = measure(&ink.as_view(), cfg)?;
    let r = m.radius;
    let lo = m.center.iter().min().copied().unwrap_or(0);
    let hi = m.center.iter().max().copied().unwrap_or(0);
    debug!(
        radius = r,
        mad = m.mad,
        center_min = lo,
        center_max = hi,
        "measured centerline"
    );

    // `r` rows of `cval` above and below: padded row `c + k` is source row
    // `c + k - r`, so every window `[c, c + 2r)` stays inside the buffer.
    let mut padded = Image::new_fill(w, h + 2 * r, cval);
    for y in 0..h {
        padded.row_mut(y + r).copy_from_slice(img.row(y));
    }

    let mut out = Image::new_fill(w, 2 * r, cval);
    let src = padded.data();
    let dst = out.data_mut();
    for (x, &c) in m.center.iter().enumerate() {
        for k in 0..2 * r {
            dst[k * w + x] = src[(c + k) * w + x];
        }
    }

    Ok((out, Some(m)))
}
