use ln_core::Error;
use serde::{Deserialize, Serialize};

/// Parameters of the center normalizer.
///
/// Missing keys fall back to [`CenterConfig::default`] when deserialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CenterConfig {
    /// Output line height in pixels.
    pub target_height: usize,
    /// Multiplier from mean absolute deviation to window radius.
    pub range: f32,
    /// Horizontal smoothing sigma, in units of line height.
    pub smoothness: f32,
    /// Centerline smoothing sigma, in units of line height.
    pub extra: f32,
}

impl Default for CenterConfig {
    fn default() -> Self {
        Self {
            target_height: 48,
            range: 4.0,
            smoothness: 1.0,
            extra: 0.3,
        }
    }
}

impl CenterConfig {
    pub fn validate(&self) -> Result<(), Error> {
        if self.target_height == 0 {
            return Err(Error::InvalidConfig("target_height must be >= 1".into()));
        }
        if !(self.range.is_finite() && self.range >= 0.0) {
            return Err(Error::InvalidConfig(format!(
                "range must be finite and >= 0, got {}",
                self.range
            )));
        }
        if !(self.smoothness.is_finite() && self.smoothness > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "smoothness must be finite and > 0, got {}",
                self.smoothness
            )));
        }
        if !(self.extra.is_finite() && self.extra > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "extra must be finite and > 0, got {}",
                self.extra
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::CenterConfig;

    #[test]
    fn defaults_are_valid() {
        let cfg = CenterConfig::default();
        assert_eq!(cfg.target_height, 48);
        assert_eq!((cfg.range, cfg.smoothness, cfg.extra), (4.0, 1.0, 0.3));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn rejects_degenerate_values() {
        let zero_height = CenterConfig {
            target_height: 0,
            ..CenterConfig::default()
        };
        assert!(zero_height.validate().is_err());

        let flat = CenterConfig {
            smoothness: 0.0,
            ..CenterConfig::default()
        };
        assert!(flat.validate().is_err());

        let nan_extra = CenterConfig {
            extra: f32::NAN,
            ..CenterConfig::default()
        };
        assert!(nan_extra.validate().is_err());

        let negative_range = CenterConfig {
            range: -1.0,
            ..CenterConfig::default()
        };
        assert!(negative_range.validate().is_err());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: CenterConfig =
            serde_json::from_str(r#"{ "target_height": 64, "extra": 0.5 }"#).expect("valid json");
        assert_eq!(cfg.target_height, 64);
        assert_eq!(cfg.extra, 0.5);
        assert_eq!(cfg.range, 4.0);
        assert_eq!(cfg.smoothness, 1.0);
    }
}
