/// Sampled, normalized 1D Gaussian kernel.
///
/// Conventions:
/// - `weights[i] = exp(-(i - (len - 1) / 2)^2 / (2 * sigma^2))`, normalized so
///   that `sum(weights) ~= 1`. Weights are computed in f64 and stored as f32.
/// - `anchor = len / 2`. For odd lengths this is the center tap; for even
///   lengths the kernel footprint leans half a sample towards the start.
/// - A non-positive `sigma` is replaced by `0.3 * ((len - 1) * 0.5 - 1) + 0.8`.
#[derive(Debug, Clone)]
pub struct GaussianKernel1D {
    pub sigma: f32,
    pub anchor: usize,
    pub weights: Vec<f32>,
}

impl GaussianKernel1D {
    pub fn new(len: usize, sigma: f32) -> Self {
        assert!(len > 0, "kernel length must be > 0");
        assert!(sigma.is_finite(), "sigma must be finite");

        let sigma = if sigma > 0.0 {
            sigma
        } else {
            (0.3 * ((len as f64 - 1.0) * 0.5 - 1.0) + 0.8) as f32
        };

        let sigma2 = f64::from(sigma) * f64::from(sigma);
        let mid = (len as f64 - 1.0) * 0.5;
        let raw: Vec<f64> = (0..len)
            .map(|i| {
                let x = i as f64 - mid;
                (-(x * x) / (2.0 * sigma2)).exp()
            })
            .collect();
        let sum: f64 = raw.iter().sum();

        Self {
            sigma,
            anchor: len / 2,
            weights: raw.iter().map(|w| (w / sum) as f32).collect(),
        }
    }

    /// Kernel spanning four sigmas on each side: `round(8 * sigma + 1)`,
    /// forced odd.
    pub fn for_sigma(sigma: f32) -> Self {
        Self::new(len_for_sigma(sigma), sigma)
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Sum of absolute differences between adjacent taps, including the
    /// jumps from and to zero at both ends.
    ///
    /// Smoothing a sequence with values in `[lo, hi]` changes by at most
    /// `(hi - lo) * total_variation() / 2` between neighboring outputs.
    pub fn total_variation(&self) -> f32 {
        let (Some(&first), Some(&last)) = (self.weights.first(), self.weights.last()) else {
            return 0.0;
        };
        let inner: f32 = self
            .weights
            .windows(2)
            .map(|w| (w[1] - w[0]).abs())
            .sum();
        first + inner + last
    }
}

/// `round(8 * sigma + 1) | 1`, at least 1.
pub fn len_for_sigma(sigma: f32) -> usize {
    if !(sigma.is_finite() && sigma > 0.0) {
        return 1;
    }
    let len = (f64::from(sigma) * 8.0 + 1.0).round_ties_even() as usize;
    len | 1
}
