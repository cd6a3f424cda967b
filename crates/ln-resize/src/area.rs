use ln_core::{Error, Image, ImageView};

/// One source contribution to a destination sample along a single axis.
#[derive(Debug, Clone, Copy)]
struct AreaTap {
    src: usize,
    weight: f32,
}

/// Per destination index, the source samples its box overlaps and the
/// fraction of the box each one covers.
///
/// Destination `d` covers the source interval `[d * s, (d + 1) * s)` with
/// `s = src_len / dst_len`; weights of one destination sum to 1.
fn area_taps(src_len: usize, dst_len: usize) -> Vec<Vec<AreaTap>> {
    let scale = src_len as f64 / dst_len as f64;
    (0..dst_len)
        .map(|d| {
            let f0 = d as f64 * scale;
            let f1 = ((d + 1) as f64 * scale).min(src_len as f64);
            let cell = f1 - f0;
            let first = f0.floor() as usize;
            let last = (f1.ceil() as usize).min(src_len);

            (first..last)
                .filter_map(|s| {
                    let overlap = (f1.min((s + 1) as f64) - f0.max(s as f64)).max(0.0);
                    (overlap > 1e-9).then(|| AreaTap {
                        src: s,
                        weight: (overlap / cell) as f32,
                    })
                })
                .collect()
        })
        .collect()
}

fn check_dims(src_w: usize, src_h: usize, dst_w: usize, dst_h: usize) -> Result<(), Error> {
    Error::ensure_non_empty(src_w, src_h)?;
    if dst_w == 0 || dst_h == 0 {
        return Err(Error::InvalidConfig(format!(
            "resize target must be at least 1x1, got {dst_w}x{dst_h}"
        )));
    }
    Ok(())
}

/// Area-averaging resize of a float image to `dst_w x dst_h`.
///
/// Intended for shrinking; every output sample is the overlap-weighted mean
/// of the source pixels its footprint covers.
pub fn resize_area_f32(
    src: &ImageView<'_, f32>,
    dst_w: usize,
    dst_h: usize,
) -> Result<Image<f32>, Error> {
    check_dims(src.width(), src.height(), dst_w, dst_h)?;

    let x_taps = area_taps(src.width(), dst_w);
    let y_taps = area_taps(src.height(), dst_h);

    // Horizontal pass: src_h x dst_w.
    let mut tmp = Vec::with_capacity(src.height() * dst_w);
    for y in 0..src.height() {
        let row = src.row(y);
        tmp.extend(
            x_taps
                .iter()
                .map(|taps| taps.iter().map(|t| row[t.src] * t.weight).sum::<f32>()),
        );
    }

    // Vertical pass: dst_h x dst_w.
    let mut out = Image::new_fill(dst_w, dst_h, 0.0f32);
    for (dy, taps) in y_taps.iter().enumerate() {
        let dst_row = out.row_mut(dy);
        for t in taps {
            let src_row = &tmp[t.src * dst_w..(t.src + 1) * dst_w];
            for (d, &s) in dst_row.iter_mut().zip(src_row) {
                *d += s * t.weight;
            }
        }
    }

    Ok(out)
}

/// Area-averaging resize of an 8-bit image, rounding half to even.
pub fn resize_area_u8(
    src: &ImageView<'_, u8>,
    dst_w: usize,
    dst_h: usize,
) -> Result<Image<u8>, Error> {
    check_dims(src.width(), src.height(), dst_w, dst_h)?;

    let mut as_f32 = Vec::with_capacity(src.width() * src.height());
    for y in 0..src.height() {
        as_f32.extend(src.row(y).iter().map(|&px| px as f32));
    }
    let as_f32 = Image::from_vec(src.width(), src.height(), as_f32)?;
    let averaged = resize_area_f32(&as_f32.as_view(), dst_w, dst_h)?;

    let data = averaged
        .data()
        .iter()
        .map(|&v| v.round_ties_even().clamp(0.0, 255.0) as u8)
        .collect();
    Image::from_vec(dst_w, dst_h, data)
}
