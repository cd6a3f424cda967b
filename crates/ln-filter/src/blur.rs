use ln_core::{BorderMode, Error, Image, ImageView, map_index};

use crate::conv1d::convolve_f32;
use crate::kernels1d::GaussianKernel1D;

/// Separable Gaussian blur with independent horizontal and vertical sigmas.
///
/// Rows are filtered first, then columns. Each pass convolves with the odd
/// [`GaussianKernel1D::for_sigma`] kernel centered on the sample and resolves
/// out-of-range samples with `border`.
pub fn gaussian_blur(
    img: &ImageView<'_, f32>,
    sigma_x: f32,
    sigma_y: f32,
    border: BorderMode<f32>,
) -> Image<f32> {
    let (w, h) = (img.width(), img.height());
    let mut out = img.to_image();
    if w == 0 || h == 0 {
        return out;
    }

    let kx = GaussianKernel1D::for_sigma(sigma_x);
    let ky = GaussianKernel1D::for_sigma(sigma_y);

    let mut tmp = vec![0.0f32; w];
    for y in 0..h {
        convolve_f32(img.row(y), &kx.weights, kx.anchor, border.clone(), &mut tmp);
        out.row_mut(y).copy_from_slice(&tmp);
    }

    let mut col = Vec::with_capacity(h);
    let mut col_out = vec![0.0f32; h];
    for x in 0..w {
        out.as_view().gather_col(x, &mut col);
        convolve_f32(&col, &ky.weights, ky.anchor, border.clone(), &mut col_out);
        for (y, &v) in col_out.iter().enumerate() {
            out.data_mut()[y * w + x] = v;
        }
    }

    out
}

/// Normalized box filter over a `kw x kh` window anchored at `(kw/2, kh/2)`.
///
/// Output `(x, y)` is the mean of rows `[y - kh/2, y - kh/2 + kh)` and columns
/// `[x - kw/2, x - kw/2 + kw)`. Window sums are running sums over a
/// border-extended line, so the cost does not depend on the window size.
pub fn box_blur(
    img: &ImageView<'_, f32>,
    kw: usize,
    kh: usize,
    border: BorderMode<f32>,
) -> Result<Image<f32>, Error> {
    if kw == 0 || kh == 0 {
        return Err(Error::InvalidConfig(format!(
            "box window must be at least 1x1, got {kw}x{kh}"
        )));
    }

    let (w, h) = (img.width(), img.height());
    let mut out = img.to_image();
    if w == 0 || h == 0 {
        return Ok(out);
    }

    let mut ext = Vec::new();
    let mut line_out = vec![0.0f32; w];
    for y in 0..h {
        box_mean_line(img.row(y), kw, &border, &mut ext, &mut line_out);
        out.row_mut(y).copy_from_slice(&line_out);
    }

    let mut col = Vec::with_capacity(h);
    let mut col_out = vec![0.0f32; h];
    for x in 0..w {
        out.as_view().gather_col(x, &mut col);
        box_mean_line(&col, kh, &border, &mut ext, &mut col_out);
        for (y, &v) in col_out.iter().enumerate() {
            out.data_mut()[y * w + x] = v;
        }
    }

    Ok(out)
}

fn box_mean_line(
    line: &[f32],
    k: usize,
    border: &BorderMode<f32>,
    ext: &mut Vec<f64>,
    out: &mut [f32],
) {
    let n = line.len();
    let anchor = k / 2;

    // ext[j] holds line[j - anchor] resolved through the border policy.
    ext.clear();
    for j in 0..n + k - 1 {
        let idx = j as isize - anchor as isize;
        let v = match border {
            BorderMode::Constant(c) if idx < 0 || idx >= n as isize => *c,
            mode => line[map_index(idx, n, mode).expect("non-empty line maps every index")],
        };
        ext.push(f64::from(v));
    }

    let inv = 1.0 / k as f64;
    let mut acc: f64 = ext[..k].iter().sum();
    out[0] = (acc * inv) as f32;
    for i in 1..n {
        acc += ext[i + k - 1] - ext[i - 1];
        out[i] = (acc * inv) as f32;
    }
}
