use ln_core::{BorderMode, map_index};

/// Correlates `signal` with `kernel`:
/// `out[i] = sum_k kernel[k] * signal[i + k - anchor]`.
///
/// Indices outside the signal are resolved by `border`. The kernel may have
/// any length; `anchor` must be `< kernel.len()`.
pub fn correlate_f32(
    signal: &[f32],
    kernel: &[f32],
    anchor: usize,
    border: BorderMode<f32>,
    out: &mut [f32],
) {
    assert_eq!(out.len(), signal.len(), "out must match signal length");
    assert!(anchor < kernel.len(), "anchor must lie inside the kernel");

    let n = signal.len();
    if n == 0 {
        return;
    }

    let klen = kernel.len();
    let tail = klen - 1 - anchor;

    // Interior outputs whose footprint `[i - anchor, i + tail]` is in bounds.
    let interior_start = anchor.min(n);
    let interior_end = n.saturating_sub(tail).max(interior_start);

    for i in (0..interior_start).chain(interior_end..n) {
        out[i] = correlate_at_border(signal, kernel, anchor, &border, i);
    }

    for (i, out_i) in out
        .iter_mut()
        .enumerate()
        .take(interior_end)
        .skip(interior_start)
    {
        let window = &signal[i - anchor..i - anchor + klen];
        *out_i = window.iter().zip(kernel).map(|(&s, &k)| s * k).sum();
    }
}

/// Convolves with an odd, `2 * radius + 1` tap kernel centered on each sample.
///
/// Odd-kernel convenience form of [`correlate_f32`]; the separable Gaussian
/// blur goes through it. Even kernels, such as the centerline smoothing
/// kernel, need [`correlate_f32`] with an explicit anchor.
pub fn convolve_f32(
    signal: &[f32],
    kernel: &[f32],
    radius: usize,
    border: BorderMode<f32>,
    out: &mut [f32],
) {
    assert_eq!(
        kernel.len(),
        2 * radius + 1,
        "kernel len must be 2*radius+1"
    );

    let flipped: Vec<f32> = kernel.iter().rev().copied().collect();
    correlate_f32(signal, &flipped, radius, border, out);
}

fn correlate_at_border(
    signal: &[f32],
    kernel: &[f32],
    anchor: usize,
    border: &BorderMode<f32>,
    i: usize,
) -> f32 {
    let n = signal.len();
    let mut acc = 0.0f32;
    for (k, &kv) in kernel.iter().enumerate() {
        let idx = i as isize + k as isize - anchor as isize;
        let v = match border {
            BorderMode::Constant(c) => {
                if idx < 0 || idx >= n as isize {
                    *c
                } else {
                    signal[idx as usize]
                }
            }
            mode => signal[map_index(idx, n, mode).expect("non-empty signal maps every index")],
        };
        acc += v * kv;
    }
    acc
}

#[cfg(test)]
mod tests {
    use ln_core::BorderMode;

    use crate::conv1d::{convolve_f32, correlate_f32};

    #[test]
    fn convolve_matches_expected_identity() {
        let signal = [1.0f32, 2.0, 3.0, 4.0];
        let kernel = [1.0f32];
        let mut out = vec![0.0f32; signal.len()];
        convolve_f32(&signal, &kernel, 0, BorderMode::Clamp, &mut out);
        assert_eq!(&out, &signal);
    }

    #[test]
    fn convolve_constant_border() {
        let signal = [1.0f32, 2.0, 3.0];
        let kernel = [1.0f32, 1.0, 1.0];
        let mut out = vec![0.0f32; signal.len()];
        convolve_f32(&signal, &kernel, 1, BorderMode::Constant(0.0), &mut out);
        assert_eq!(out, vec![3.0, 6.0, 5.0]);
    }

    #[test]
    fn convolve_flips_asymmetric_kernel() {
        let signal = [0.0f32, 0.0, 1.0, 0.0, 0.0];
        let kernel = [1.0f32, 2.0, 3.0];
        let mut out = vec![0.0f32; signal.len()];
        convolve_f32(&signal, &kernel, 1, BorderMode::Constant(0.0), &mut out);
        assert_eq!(out, vec![0.0, 1.0, 2.0, 3.0, 0.0]);
    }

    #[test]
    fn correlate_even_kernel_uses_anchor() {
        // anchor 1 -> out[i] = s[i-1] + s[i]
        let signal = [1.0f32, 2.0, 4.0, 8.0];
        let kernel = [1.0f32, 1.0];
        let mut out = vec![0.0f32; signal.len()];
        correlate_f32(&signal, &kernel, 1, BorderMode::Reflect, &mut out);
        assert_eq!(out, vec![2.0, 3.0, 6.0, 12.0]);
    }

    #[test]
    fn reflect_border_keeps_constant_signal() {
        let signal = [5.0f32; 6];
        let kernel = [0.25f32, 0.25, 0.25, 0.25];
        let mut out = vec![0.0f32; signal.len()];
        correlate_f32(&signal, &kernel, 2, BorderMode::Reflect, &mut out);
        for v in out {
            assert!((v - 5.0).abs() < 1e-6);
        }
    }

    #[test]
    fn kernel_longer_than_signal_goes_through_border_path() {
        let signal = [1.0f32, 3.0];
        let kernel = [1.0f32; 5];
        let mut out = vec![0.0f32; signal.len()];
        correlate_f32(&signal, &kernel, 2, BorderMode::Reflect101, &mut out);
        // out[0]: s[-2..=2] -> s0 s1 s0 s1 s0 = 1+3+1+3+1
        assert_eq!(out, vec![9.0, 11.0]);
    }
}
