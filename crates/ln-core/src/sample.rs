use crate::border::{BorderMode, map_index};
use crate::image::ImageView;

/// Floor-based bilinear sample at pixel-center coordinates `(x, y)`.
///
/// Panics on an empty image unless `border` is constant.
pub fn sample_bilinear_f32<T: Copy + Into<f32>>(
    img: &ImageView<'_, T>,
    x: f32,
    y: f32,
    border: BorderMode<f32>,
) -> f32 {
    if img.width() == 0 || img.height() == 0 {
        if let BorderMode::Constant(v) = border {
            return v;
        }
        panic!("cannot sample an empty image with non-constant border");
    }

    let x0 = x.floor() as isize;
    let y0 = y.floor() as isize;
    let x1 = x0 + 1;
    let y1 = y0 + 1;

    let dx = x - x0 as f32;
    let dy = y - y0 as f32;

    let p00 = sample_at_f32(img, x0, y0, &border);
    let p10 = sample_at_f32(img, x1, y0, &border);
    let p01 = sample_at_f32(img, x0, y1, &border);
    let p11 = sample_at_f32(img, x1, y1, &border);

    let top = p00 * (1.0 - dx) + p10 * dx;
    let bottom = p01 * (1.0 - dx) + p11 * dx;
    top * (1.0 - dy) + bottom * dy
}

fn sample_at_f32<T: Copy + Into<f32>>(
    img: &ImageView<'_, T>,
    x: isize,
    y: isize,
    border: &BorderMode<f32>,
) -> f32 {
    if let BorderMode::Constant(c) = border {
        if x < 0 || y < 0 || x >= img.width() as isize || y >= img.height() as isize {
            return *c;
        }
        // SAFETY: Bounds are checked immediately above.
        return unsafe { (*img.get_unchecked(x as usize, y as usize)).into() };
    }

    let xi = map_index(x, img.width(), border).expect("mapped x index should exist");
    let yi = map_index(y, img.height(), border).expect("mapped y index should exist");
    // SAFETY: `map_index` returns indices in `[0, len)` for non-empty images.
    unsafe { (*img.get_unchecked(xi, yi)).into() }
}
