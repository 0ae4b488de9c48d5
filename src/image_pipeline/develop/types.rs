//! Developing configuration types

use crate::image_pipeline::color::ColorConversion;
use crate::image_pipeline::tone::GammaNormalization;

/// Which developing stages run, and how.
#[derive(Debug, Clone)]
pub struct DevelopConfig {
    /// Shift raw samples left by 3 bits before anything else
    pub raw_adjust: bool,
    /// Camera-native to sRGB' path
    pub color: ColorConversion,
    /// Histogram stretch rate in `[0, 1]`; 0 disables the stretch
    pub stretch_rate: f32,
    /// Apply the sRGB transfer curve; otherwise samples are only quantized
    pub gamma: bool,
    /// Maximum the transfer curve is normalized against
    pub gamma_normalization: GammaNormalization,
    /// Log intermediate values of each stage at debug level
    pub debug: bool,
    /// Record per-stage durations
    pub measure: bool,
}

impl Default for DevelopConfig {
    fn default() -> Self {
        Self {
            raw_adjust: false,
            color: ColorConversion::Direct,
            stretch_rate: 0.0,
            gamma: true,
            gamma_normalization: GammaNormalization::FullScale,
            debug: false,
            measure: false,
        }
    }
}

impl DevelopConfig {
    pub fn builder() -> DevelopConfigBuilder {
        DevelopConfigBuilder::default()
    }
}

/// Builder for DevelopConfig
#[derive(Default)]
pub struct DevelopConfigBuilder {
    raw_adjust: Option<bool>,
    color: Option<ColorConversion>,
    stretch_rate: Option<f32>,
    gamma: Option<bool>,
    gamma_normalization: Option<GammaNormalization>,
    debug: Option<bool>,
    measure: Option<bool>,
}

impl DevelopConfigBuilder {
    pub fn raw_adjust(mut self, enable: bool) -> Self {
        self.raw_adjust = Some(enable);
        self
    }

    pub fn color(mut self, color: ColorConversion) -> Self {
        self.color = Some(color);
        self
    }

    pub fn stretch_rate(mut self, rate: f32) -> Self {
        self.stretch_rate = Some(rate);
        self
    }

    pub fn gamma(mut self, enable: bool) -> Self {
        self.gamma = Some(enable);
        self
    }

    pub fn gamma_normalization(mut self, normalization: GammaNormalization) -> Self {
        self.gamma_normalization = Some(normalization);
        self
    }

    pub fn debug(mut self, enable: bool) -> Self {
        self.debug = Some(enable);
        self
    }

    pub fn measure(mut self, enable: bool) -> Self {
        self.measure = Some(enable);
        self
    }

    pub fn build(self) -> DevelopConfig {
        let default = DevelopConfig::default();
        DevelopConfig {
            raw_adjust: self.raw_adjust.unwrap_or(default.raw_adjust),
            color: self.color.unwrap_or(default.color),
            stretch_rate: self.stretch_rate.unwrap_or(default.stretch_rate),
            gamma: self.gamma.unwrap_or(default.gamma),
            gamma_normalization: self.gamma_normalization.unwrap_or(default.gamma_normalization),
            debug: self.debug.unwrap_or(default.debug),
            measure: self.measure.unwrap_or(default.measure),
        }
    }
}
