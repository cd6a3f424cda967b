use criterion::{Criterion, black_box, criterion_group, criterion_main};
use ln_center::{CenterConfig, CenterNormalizer, measure};
use ln_core::Image;

/// White page with a sinusoidal ink stroke of `thickness` rows.
fn wavy_line(width: usize, height: usize, thickness: usize) -> Image<f32> {
    let mut img = Image::new_fill(width, height, 1.0f32);
    let mid = height as f32 * 0.5;
    let amp = height as f32 * 0.15;
    for x in 0..width {
        let c = mid + amp * (x as f32 * 0.02).sin();
        let top = (c - thickness as f32 * 0.5).max(0.0) as usize;
        for y in top..(top + thickness).min(height) {
            img.data_mut()[y * width + x] = 0.0;
        }
    }
    img
}

fn bench_measure(c: &mut Criterion) {
    let mut img = wavy_line(1200, 64, 18);
    for v in img.data_mut() {
        *v = 1.0 - *v;
    }
    let view = img.as_view();
    let cfg = CenterConfig::default();

    c.bench_function("measure_1200x64", |b| {
        b.iter(|| {
            let m = measure(black_box(&view), &cfg).expect("valid line");
            black_box(m);
        });
    });
}

fn bench_normalize(c: &mut Criterion) {
    let normalizer = CenterNormalizer::default();

    let short = wavy_line(1200, 64, 18);
    let short_view = short.as_view();
    c.bench_function("normalize_1200x64_to_48", |b| {
        b.iter(|| {
            let out = normalizer
                .normalize(black_box(&short_view), 1.0)
                .expect("valid line");
            black_box(out);
        });
    });

    let tall = wavy_line(2400, 160, 40);
    let tall_view = tall.as_view();
    c.bench_function("normalize_2400x160_preshrink_to_48", |b| {
        b.iter(|| {
            let out = normalizer
                .normalize(black_box(&tall_view), 1.0)
                .expect("valid line");
            black_box(out);
        });
    });
}

criterion_group!(benches, bench_measure, bench_normalize);
criterion_main!(benches);
