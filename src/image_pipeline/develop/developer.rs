use tracing::{debug, info, instrument};

use crate::image_pipeline::{
    color::{self, ColorConversion},
    common::error::Result,
    develop::{timing::{PipelineTimings, Timer}, types::DevelopConfig},
    planar::{self, PlanarImage, Sample},
    raw::CaptureMetadata,
    tone::{GammaCurveCache, HistogramStretcher},
};

/// Develops planar camera samples into display-ready sRGB.
///
/// Stage order: raw adjust (optional) → black level → color conversion →
/// histogram stretch (optional) → gamma. The gamma table lives as long as
/// the developer and is reused across calls.
pub struct RawDeveloper {
    config: DevelopConfig,
    gamma: GammaCurveCache,
    timings: PipelineTimings,
}

impl RawDeveloper {
    pub fn new(config: DevelopConfig) -> Self {
        Self {
            config,
            gamma: GammaCurveCache::new(),
            timings: PipelineTimings::new(),
        }
    }

    pub fn config(&self) -> &DevelopConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: DevelopConfig) {
        self.config = config;
    }

    pub fn gamma_cache(&self) -> &GammaCurveCache {
        &self.gamma
    }

    /// Stage durations of the last [`RawDeveloper::develop`] call, filled
    /// only when `measure` is enabled.
    pub fn timings(&self) -> &PipelineTimings {
        &self.timings
    }

    /// Gamma-corrects `image` through this developer's table.
    pub fn gamma_correction<T: Sample>(&mut self, image: &PlanarImage<T>) -> PlanarImage<u16> {
        self.gamma.apply(image, self.config.gamma_normalization)
    }

    /// Histogram stretch with the configured rate.
    pub fn adjust_brightness(&self, image: PlanarImage<f32>) -> PlanarImage<f32> {
        HistogramStretcher::new(self.config.stretch_rate)
            .with_debug(self.config.debug)
            .apply(image)
    }

    /// Camera-native samples to sRGB' along the configured path.
    pub fn convert_color<T: Sample>(
        &self,
        image: &PlanarImage<T>,
        metadata: &CaptureMetadata,
    ) -> Result<PlanarImage<f32>> {
        match self.config.color {
            ColorConversion::Disabled => Ok(image.to_f32()),
            ColorConversion::Direct => Ok(color::camera_to_srgb(image, &metadata.camera_to_srgb)),
            ColorConversion::ViaXyz => {
                let xyz = color::camera_to_xyz(image, &metadata.color_matrix, metadata.analog_balance)?;
                Ok(color::xyz_to_srgb(&xyz))
            }
        }
    }

    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    pub fn develop(&mut self, mut image: PlanarImage<u16>, metadata: &CaptureMetadata) -> Result<PlanarImage<u16>> {
        self.timings.clear();
        let measure = self.config.measure;
        let middle = image.pixel_count() / 2;

        if self.config.raw_adjust {
            let _span = tracing::info_span!("raw_adjust").entered();
            let timer = Timer::start("raw_adjust");
            planar::raw_adjust(&mut image);
            if measure {
                self.timings.record(timer);
            }
        }

        {
            let _span = tracing::info_span!("subtract_black").entered();
            debug!(
                black_level = metadata.black_level,
                channel_black_levels = ?metadata.channel_black_levels,
                "Black levels"
            );
            let timer = Timer::start("subtract_black");
            planar::subtract_black(&mut image, metadata.black_level, &metadata.channel_black_levels);
            if measure {
                self.timings.record(timer);
            }
            if self.config.debug {
                debug!("Max value after black subtraction: {:?}", image.min_max().map(|(_, hi)| hi));
            }
        }
        if image.pixel_count() > 0 {
            debug!("Input image[:, {}]: {:?}", middle, image.pixel(middle));
        }

        let converted = {
            let _span = tracing::info_span!("convert_color", path = ?self.config.color).entered();
            let timer = Timer::start("convert_color");
            let converted = self.convert_color(&image, metadata)?;
            if measure {
                self.timings.record(timer);
            }
            converted
        };
        if converted.pixel_count() > 0 {
            debug!("After color conversion image[:, {}]: {:?}", middle, converted.pixel(middle));
        }

        let adjusted = {
            let _span = tracing::info_span!("adjust_brightness", rate = self.config.stretch_rate).entered();
            let timer = Timer::start("adjust_brightness");
            let adjusted = self.adjust_brightness(converted);
            if measure {
                self.timings.record(timer);
            }
            adjusted
        };

        let developed = if self.config.gamma {
            let _span = tracing::info_span!("gamma_correction").entered();
            let timer = Timer::start("gamma_correction");
            let corrected = self.gamma_correction(&adjusted);
            if measure {
                self.timings.record(timer);
            }
            corrected
        } else {
            adjusted.to_u16()
        };
        if developed.pixel_count() > 0 {
            debug!("Developed image[:, {}]: {:?}", middle, developed.pixel(middle));
        }

        if measure {
            self.timings.log_summary();
        }
        info!(
            width = developed.width(),
            height = developed.height(),
            "Development complete"
        );
        Ok(developed)
    }
}
