use ln_core::{BorderMode, Error, Image, ImageView, sample_bilinear_f32};

/// Bilinear resize to `dst_w x dst_h` with pixel-center alignment.
///
/// Destination `(dx, dy)` samples the source at
/// `((dx + 0.5) * sw / dw - 0.5, (dy + 0.5) * sh / dh - 0.5)`; positions past
/// the first or last pixel replicate the edge.
pub fn resize_linear(
    src: &ImageView<'_, f32>,
    dst_w: usize,
    dst_h: usize,
) -> Result<Image<f32>, Error> {
    Error::ensure_non_empty(src.width(), src.height())?;
    if dst_w == 0 || dst_h == 0 {
        return Err(Error::InvalidConfig(format!(
            "resize target must be at least 1x1, got {dst_w}x{dst_h}"
        )));
    }

    let sx = src.width() as f64 / dst_w as f64;
    let sy = src.height() as f64 / dst_h as f64;

    let xs: Vec<f32> = (0..dst_w)
        .map(|dx| ((dx as f64 + 0.5) * sx - 0.5) as f32)
        .collect();

    let mut out = Image::new_fill(dst_w, dst_h, 0.0f32);
    for dy in 0..dst_h {
        let y = ((dy as f64 + 0.5) * sy - 0.5) as f32;
        for (d, &x) in out.row_mut(dy).iter_mut().zip(&xs) {
            *d = sample_bilinear_f32(src, x, y, BorderMode::Clamp);
        }
    }

    Ok(out)
}
