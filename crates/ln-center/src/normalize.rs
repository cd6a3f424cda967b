use ln_core::{Error, Image, ImageView, from_unit_f32, max_value, to_unit_f32};
use ln_resize::scale_to_height;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::CenterConfig;
use crate::dewarp::dewarp_with;
use crate::measure::{Measurement, measure};

/// Scale factors recorded by [`CenterNormalizer::normalize`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizationParams {
    /// Pre-shrink factor, `1` when the line was not pre-shrunk.
    pub m1: f64,
    /// Width ratio of the final rescale, `scaled_width / dewarped_width`.
    pub m2: f64,
    /// Dewarped height minus the height fed to the dewarper.
    pub t: isize,
}

impl NormalizationParams {
    /// Maps an x coordinate of the normalized line to the source image.
    pub fn local_to_global(&self, x: f64) -> f64 {
        x / self.m1 / self.m2
    }

    /// Maps a source x coordinate into the normalized line.
    pub fn global_to_local(&self, x: f64) -> f64 {
        x * self.m1 * self.m2
    }
}

/// [`NormalizationParams::local_to_global`] as a free function.
pub fn local_to_global(x: f64, params: &NormalizationParams) -> f64 {
    params.local_to_global(x)
}

/// Height above which lines are pre-shrunk: `floor(1.5 * target_height)`.
pub fn intermediate_height(target_height: usize) -> usize {
    target_height * 3 / 2
}

/// Every intermediate product of one normalization.
#[derive(Debug, Clone)]
pub struct NormalizeOutput {
    pub image: Image<f32>,
    pub params: NormalizationParams,
    /// Dewarped line before the final rescale.
    pub dewarped: Image<f32>,
    /// `None` for lines without contrast.
    pub measurement: Option<Measurement>,
}

/// Normalizes text lines to a fixed height around their centerline.
///
/// The configuration is fixed at construction; a different target height
/// means a different normalizer ([`CenterNormalizer::with_target_height`]).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CenterNormalizer {
    config: CenterConfig,
}

impl CenterNormalizer {
    /// Validates `config` and builds a normalizer around it.
    pub fn new(config: CenterConfig) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Parameters this normalizer was built with.
    pub fn config(&self) -> &CenterConfig {
        &self.config
    }

    /// Height of every normalized line.
    pub fn target_height(&self) -> usize {
        self.config.target_height
    }

    /// Same parameters, different output height.
    pub fn with_target_height(&self, target_height: usize) -> Result<Self, Error> {
        Self::new(CenterConfig {
            target_height,
            ..self.config.clone()
        })
    }

    /// Centerline of an inverted line (ink bright, background zero).
    pub fn measure(&self, line: &ImageView<'_, f32>) -> Result<Measurement, Error> {
        measure(line, &self.config)
    }

    /// Line straightened around its centerline; rows outside `img` read `cval`.
    pub fn dewarp(&self, img: &ImageView<'_, f32>, cval: f32) -> Result<Image<f32>, Error> {
        dewarp_with(img, cval, &self.config).map(|(out, _)| out)
    }

    /// Normalizes `img` (bright background, dark ink, `[0, 1]`) to
    /// `target_height` rows. Rows outside the source read `cval`.
    pub fn normalize(
        &self,
        img: &ImageView<'_, f32>,
        cval: f32,
    ) -> Result<(Image<f32>, NormalizationParams), Error> {
        self.normalize_with(img, cval).map(|out| (out.image, out.params))
    }

    /// [`CenterNormalizer::normalize`], keeping the dewarped line and the
    /// measurement.
    pub fn normalize_with(
        &self,
        img: &ImageView<'_, f32>,
        cval: f32,
    ) -> Result<NormalizeOutput, Error> {
        Error::ensure_non_empty(img.width(), img.height())?;

        let target = self.config.target_height;
        let ih = intermediate_height(target);
        let shrunk;
        let (line_view, m1) = if img.height() > ih {
            let m1 = ih as f64 / img.height() as f64;
            debug!(height = img.height(), intermediate = ih, m1, "pre-shrinking line");
            shrunk = scale_to_height(img, ih)?;
            (shrunk.as_view(), m1)
        } else {
            (*img, 1.0)
        };

        let (dewarped, measurement) = dewarp_with(&line_view, cval, &self.config)?;
        let t = dewarped.height() as isize - line_view.height() as isize;
        trace!(
            width = dewarped.width(),
            height = dewarped.height(),
            "dewarped line"
        );

        let image = scale_to_height(&dewarped.as_view(), target)?;
        let m2 = image.width() as f64 / dewarped.width() as f64;
        let params = NormalizationParams { m1, m2, t };
        debug!(
            width = image.width(),
            height = image.height(),
            m1,
            m2,
            t,
            "normalized line"
        );

        Ok(NormalizeOutput {
            image,
            params,
            dewarped,
            measurement,
        })
    }

    /// 8-bit convenience wrapper.
    ///
    /// Samples are divided by 255, the fill value is the brightest sample and
    /// the result is converted back by truncating `v * 255`.
    pub fn process_u8(
        &self,
        img: &ImageView<'_, u8>,
    ) -> Result<(Image<u8>, NormalizationParams), Error> {
        let unit = to_unit_f32(img);
        let view = unit.as_view();
        let cval = max_value(&view).ok_or(Error::EmptyImage {
            width: img.width(),
            height: img.height(),
        })?;
        let (out, params) = self.normalize(&view, cval)?;
        Ok((from_unit_f32(&out.as_view()), params))
    }
}

#[cfg(test)]
mod tests {
    use ln_core::{Image, ImageView};

    use super::{CenterNormalizer, NormalizationParams, intermediate_height, local_to_global};
    use crate::config::CenterConfig;

    fn page(width: usize, height: usize, rows: std::ops::RangeInclusive<usize>) -> Image<f32> {
        let mut img = Image::new_fill(width, height, 1.0f32);
        for y in rows {
            img.row_mut(y).fill(0.0);
        }
        img
    }

    fn normalizer(target_height: usize) -> CenterNormalizer {
        CenterNormalizer::new(CenterConfig {
            target_height,
            ..CenterConfig::default()
        })
        .expect("valid config")
    }

    #[test]
    fn intermediate_height_floors() {
        assert_eq!(intermediate_height(48), 72);
        assert_eq!(intermediate_height(31), 46);
        assert_eq!(intermediate_height(1), 1);
    }

    #[test]
    fn straight_band_is_centered_at_target_height() {
        let img = page(200, 64, 27..=36);
        let out = normalizer(48)
            .normalize_with(&img.as_view(), 1.0)
            .expect("valid line");

        let m = out.measurement.expect("line has ink");
        assert!(m.center.iter().all(|c| (31..=32).contains(c)));
        assert!((m.mad - 2.5).abs() < 1e-9);
        assert_eq!(m.radius, 11);
        assert_eq!(out.dewarped.height(), 22);

        // 48 / 22 * 200 = 436.36
        assert_eq!((out.image.width(), out.image.height()), (436, 48));
        assert_eq!(out.params.m1, 1.0);
        assert_eq!(out.params.t, 22 - 64);
        assert!((out.params.m2 - 436.0 / 200.0).abs() < 1e-12);

        let col = 218;
        let at = |y: usize| out.image.get(col, y).expect("in bounds");
        assert!(at(24) < 0.5);
        assert!(at(0) > 0.5);
        assert!(at(47) > 0.5);
        let dark = (0..48).filter(|&y| at(y) < 0.5).count();
        assert!((21..=23).contains(&dark), "dark rows: {dark}");
    }

    #[test]
    fn centered_line_at_target_height_is_unchanged() {
        // Band of 15 rows centered in 30: r = 15 reproduces the input.
        let img = page(80, 30, 8..=22);
        let (out, params) = normalizer(30)
            .normalize(&img.as_view(), 1.0)
            .expect("valid line");

        assert_eq!(out, img);
        assert_eq!(
            params,
            NormalizationParams {
                m1: 1.0,
                m2: 1.0,
                t: 0
            }
        );
    }

    #[test]
    fn blank_tall_line_maps_back_through_both_scales() {
        let img = Image::new_fill(300, 96, 1.0f32);
        let out = normalizer(32)
            .normalize_with(&img.as_view(), 1.0)
            .expect("valid line");

        assert!(out.measurement.is_none());
        assert_eq!((out.dewarped.width(), out.dewarped.height()), (150, 48));
        assert!(out.dewarped.data().iter().all(|&v| v == 0.0));
        assert_eq!((out.image.width(), out.image.height()), (100, 32));

        let p = out.params;
        assert_eq!(p.m1, 0.5);
        assert!((p.m2 - 100.0 / 150.0).abs() < 1e-12);
        assert_eq!(p.t, 0);
        assert!((local_to_global(50.0, &p) - 150.0).abs() < 1e-9);
        assert!((p.global_to_local(150.0) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn right_edge_maps_to_source_width() {
        let img = page(300, 96, 40..=55);
        let (out, params) = normalizer(32)
            .normalize(&img.as_view(), 1.0)
            .expect("valid line");

        assert_eq!(out.height(), 32);
        assert_eq!(params.m1, 0.5);
        let x = params.local_to_global(out.width() as f64);
        assert!((x - 300.0).abs() < 1e-9, "mapped to {x}");
    }

    #[test]
    fn short_lines_skip_the_pre_shrink() {
        let img = page(120, 40, 15..=24);
        let (out, params) = normalizer(48)
            .normalize(&img.as_view(), 1.0)
            .expect("valid line");
        assert_eq!(out.height(), 48);
        assert_eq!(params.m1, 1.0);
        assert!(params.t < 0);
    }

    #[test]
    fn process_u8_keeps_white_background() {
        let mut img = Image::new_fill(120, 40, 255u8);
        for y in 16..=23 {
            img.row_mut(y).fill(0);
        }
        let (out, params) = CenterNormalizer::default()
            .process_u8(&img.as_view())
            .expect("valid line");

        assert_eq!(out.height(), 48);
        assert_eq!(out.get(0, 0), Some(255));
        assert_eq!(out.get(out.width() - 1, 47), Some(255));
        assert!(out.data().contains(&0));
        assert_eq!(params.m1, 1.0);
    }

    #[test]
    fn with_target_height_leaves_the_original_alone() {
        let base = normalizer(48);
        let tall = base.with_target_height(64).expect("valid height");
        assert_eq!(base.target_height(), 48);
        assert_eq!(tall.target_height(), 64);
        assert_eq!(tall.config().extra, base.config().extra);
        assert!(base.with_target_height(0).is_err());
    }

    #[test]
    fn default_normalizer_uses_default_config() {
        let n = CenterNormalizer::default();
        assert_eq!(n.config(), &CenterConfig::default());
        assert_eq!(n, CenterNormalizer::new(CenterConfig::default()).expect("valid config"));
    }

    #[test]
    fn strided_view_normalizes_like_its_copy() {
        // Taller than 1.5 * 24, so the pre-shrink also reads the view.
        let img = page(90, 40, 16..=23);
        let (w, h, stride) = (img.width(), img.height(), img.width() + 7);
        let mut buf = vec![0.5f32; stride * h];
        for y in 0..h {
            buf[y * stride..y * stride + w].copy_from_slice(img.row(y));
        }
        let view = ImageView::from_slice(w, h, stride, &buf).expect("valid view");
        assert_eq!(view.to_image(), img);

        let n = normalizer(24);
        let from_view = n.normalize(&view, 1.0).expect("valid line");
        let from_copy = n.normalize(&img.as_view(), 1.0).expect("valid line");
        assert_eq!(from_view, from_copy);
        assert_eq!(from_view.0.height(), 24);
    }

    #[test]
    fn empty_input_is_rejected() {
        let img = Image::<f32>::from_vec(0, 0, Vec::new()).expect("valid image");
        assert!(CenterNormalizer::default().normalize(&img.as_view(), 1.0).is_err());
    }

    #[test]
    fn params_serialize_with_short_names() {
        let p = NormalizationParams {
            m1: 0.5,
            m2: 2.0,
            t: -3,
        };
        let json = serde_json::to_string(&p).expect("serializable");
        assert_eq!(json, r#"{"m1":0.5,"m2":2.0,"t":-3}"#);
    }

    #[test]
    fn normalizer_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CenterNormalizer>();

        let n = normalizer(24);
        let img = page(60, 20, 8..=11);
        std::thread::scope(|s| {
            let a = s.spawn(|| n.normalize(&img.as_view(), 1.0).expect("valid line"));
            let b = s.spawn(|| n.normalize(&img.as_view(), 1.0).expect("valid line"));
            let a = a.join().expect("worker finished");
            let b = b.join().expect("worker finished");
            assert_eq!(a, b);
        });
    }
}
