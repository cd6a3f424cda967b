use ln_core::{BorderMode, Error, ImageView};
use ln_filter::conv1d::correlate_f32;
use ln_filter::{GaussianKernel1D, box_blur, gaussian_blur};

use crate::config::CenterConfig;

/// Weight of the box-filtered copy added to the Gaussian response.
///
/// Only breaks ties between equally strong rows, in favour of rows with more
/// ink in their vertical neighbourhood.
pub const TIE_BREAK_WEIGHT: f32 = 1e-3;

/// Centerline and window radius of one line image.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    /// Row of the line center for every column, in `[0, height)`.
    pub center: Vec<usize>,
    /// Half-height of the dewarp window, always `>= 1`.
    pub radius: usize,
    /// Mean absolute row distance of ink pixels from the centerline.
    pub mad: f64,
}

/// Kernel used to smooth the raw per-column argmax into the centerline.
///
/// `sigma = height * extra` over `floor(8 * height * extra + 0.5) + 1` taps.
pub fn centerline_kernel(height: usize, extra: f32) -> GaussianKernel1D {
    let span = 8.0 * height as f64 * f64::from(extra);
    let len = (span + 0.5).floor() as usize + 1;
    GaussianKernel1D::new(len, height as f32 * extra)
}

/// Estimates the centerline of `line`, where ink is bright and background is
/// zero (the inverted, normalized form produced by the dewarper).
///
/// The image is blurred with `sigma_x = h * smoothness` and `sigma_y = h / 2`
/// (zero border), a `w x ceil(h / 2)` box mean of that response scaled by
/// [`TIE_BREAK_WEIGHT`] is added, and every column takes the row of its first
/// maximum. That raw path is smoothed along x with [`centerline_kernel`] and
/// rounded. The radius is `max(1, floor(1 + range * mad))` with `mad`
/// averaged over the non-zero pixels of `line`.
pub fn measure(line: &ImageView<'_, f32>, cfg: &CenterConfig) -> Result<Measurement, Error> {
    let (w, h) = (line.width(), line.height());
    Error::ensure_non_empty(w, h)?;

    let hf = h as f32;
    let mut response = gaussian_blur(
        line,
        hf * cfg.smoothness,
        hf * 0.5,
        BorderMode::Constant(0.0),
    );
    let bias = box_blur(
        &response.as_view(),
        w,
        h.div_ceil(2),
        BorderMode::Reflect101,
    )?;
    for (r, &b) in response.data_mut().iter_mut().zip(bias.data()) {
        *r += TIE_BREAK_WEIGHT * b;
    }

    let view = response.as_view();
    let mut col = Vec::with_capacity(h);
    let raw: Vec<usize> = (0..w)
        .map(|x| {
            view.gather_col(x, &mut col);
            argmax_f32(&col).map_or(0, |(y, _)| y)
        })
        .collect();

    let center = smooth_centerline(&raw, h, cfg.extra);
    let mad = mean_abs_deviation(line, &center);
    let radius = ((1.0 + f64::from(cfg.range) * mad).floor() as usize).max(1);

    Ok(Measurement { center, radius, mad })
}

fn smooth_centerline(raw: &[usize], height: usize, extra: f32) -> Vec<usize> {
    let kernel = centerline_kernel(height, extra);
    let signal: Vec<f32> = raw.iter().map(|&y| y as f32).collect();
    let mut smoothed = vec![0.0f32; signal.len()];
    correlate_f32(
        &signal,
        &kernel.weights,
        kernel.anchor,
        BorderMode::Reflect,
        &mut smoothed,
    );

    let max_row = (height - 1) as f32;
    smoothed
        .iter()
        .map(|&c| c.round_ties_even().clamp(0.0, max_row) as usize)
        .collect()
}

fn mean_abs_deviation(line: &ImageView<'_, f32>, center: &[usize]) -> f64 {
    let mut sum = 0.0f64;
    let mut count = 0usize;
    for y in 0..line.height() {
        for (&v, &c) in line.row(y).iter().zip(center) {
            if v != 0.0 {
                sum += y.abs_diff(c) as f64;
                count += 1;
            }
        }
    }
    if count == 0 { 0.0 } else { sum / count as f64 }
}

fn argmax_f32(line: &[f32]) -> Option<(usize, f32)> {
    let mut it = line.iter().copied().enumerate();
    let mut best = it.next()?;
    for (i, v) in it {
        if v > best.1 {
            best = (i, v);
        }
    }
    Some(best)
}
