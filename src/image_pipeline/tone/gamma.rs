//! Memoized sRGB transfer curve.
//!
//! Every 16-bit input level is evaluated at most once per normalization
//! maximum; later samples with the same level are table lookups.

use tracing::debug;

use crate::image_pipeline::planar::{PlanarImage, Sample};

/// One cache slot per 16-bit input level.
pub const GAMMA_LEVELS: usize = 1 << 16;

const GAMMA: f32 = 2.4;
const LINEAR_COEFF: f32 = 12.92;
const LINEAR_THRESH_COEFF: f32 = 0.0031308;
const BLACK_OFFSET: f32 = 0.055;
const FULL_SCALE: f32 = u16::MAX as f32;

/// The maximum the transfer curve is normalized against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GammaNormalization {
    /// Always 65535
    #[default]
    FullScale,
    /// Largest quantized sample of the buffer being corrected
    ObservedMax,
}

/// Gamma lookup table owned by one developer instance.
///
/// The table is tied to the maximum it was filled with. Correcting against a
/// different maximum clears it first, so a slot never holds a value computed
/// for another curve.
#[derive(Debug, Clone)]
pub struct GammaCurveCache {
    slots: Vec<Option<u16>>,
    max_value: Option<u16>,
}

impl Default for GammaCurveCache {
    fn default() -> Self {
        Self::new()
    }
}

impl GammaCurveCache {
    pub fn new() -> Self {
        Self {
            slots: vec![None; GAMMA_LEVELS],
            max_value: None,
        }
    }

    /// Cached output for `level`, if it was already evaluated.
    pub fn cached(&self, level: u16) -> Option<u16> {
        self.slots[level as usize]
    }

    /// Number of populated slots.
    pub fn populated(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Maximum the current table contents were computed for.
    pub fn max_value(&self) -> Option<u16> {
        self.max_value
    }

    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|s| *s = None);
        self.max_value = None;
    }

    /// Gamma-corrected value of one quantized level relative to `max_value`.
    pub fn correct(&mut self, level: u16, max_value: u16) -> u16 {
        self.bind(max_value);
        self.lookup(level, max_value as f32)
    }

    /// Applies the transfer curve to every sample of `image`.
    pub fn apply<T: Sample>(&mut self, image: &PlanarImage<T>, normalization: GammaNormalization) -> PlanarImage<u16> {
        let levels = image.to_u16();
        let max_value = match normalization {
            GammaNormalization::FullScale => u16::MAX,
            GammaNormalization::ObservedMax => levels.min_max().map_or(0, |(_, hi)| hi),
        };
        self.bind(max_value);

        // An all-black buffer has nothing to normalize against.
        let max = (max_value as f32).max(1.0);
        let before = self.populated();
        let mut out = PlanarImage::<u16>::new(levels.width(), levels.height());
        for (dst, &level) in out.as_mut_slice().iter_mut().zip(levels.as_slice()) {
            *dst = self.lookup(level, max);
        }
        debug!(
            "Gamma table: {} slots before, {} after (max {})",
            before,
            self.populated(),
            max_value
        );
        out
    }

    fn bind(&mut self, max_value: u16) {
        if self.max_value != Some(max_value) {
            if self.max_value.is_some() {
                debug!(
                    "Gamma normalization maximum changed from {:?} to {}, clearing table",
                    self.max_value, max_value
                );
                self.slots.iter_mut().for_each(|s| *s = None);
            }
            self.max_value = Some(max_value);
        }
    }

    fn lookup(&mut self, level: u16, max: f32) -> u16 {
        let max = max.max(1.0);
        *self.slots[level as usize].get_or_insert_with(|| transfer(level, max))
    }
}

fn linear_segment(level: u16) -> f32 {
    level as f32 * LINEAR_COEFF
}

fn power_segment(level: u16, max: f32) -> f32 {
    let normalized = level as f32 / max;
    let encoded = ((normalized as f64).powf(1.0 / GAMMA as f64) * 1.055 - BLACK_OFFSET as f64) as f32;
    encoded * max
}

/// Piecewise sRGB curve, clamped to `[0, max]` and truncated.
fn transfer(level: u16, max: f32) -> u16 {
    let value = if (level as f32) < LINEAR_THRESH_COEFF * max {
        linear_segment(level)
    } else {
        power_segment(level, max)
    };
    value.clamp(0.0, max.min(FULL_SCALE)) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray(values: &[u16]) -> PlanarImage<u16> {
        PlanarImage::from_channels(values.len(), 1, values, values, values).unwrap()
    }

    #[test]
    fn test_curve_end_points() {
        let mut cache = GammaCurveCache::new();
        assert_eq!(cache.correct(0, u16::MAX), 0);
        assert_eq!(cache.correct(u16::MAX, u16::MAX), u16::MAX);
        assert_eq!(cache.correct(100, u16::MAX), 1292);
    }

    #[test]
    fn test_repeated_lookups_hit_the_cache() {
        let mut cache = GammaCurveCache::new();
        assert_eq!(cache.cached(8192), None);

        let first = cache.correct(8192, u16::MAX);
        assert_eq!(cache.cached(8192), Some(first));
        assert_eq!(cache.populated(), 1);

        let second = cache.correct(8192, u16::MAX);
        assert_eq!(first, second);
        assert_eq!(cache.populated(), 1);
    }

    #[test]
    fn test_buffer_correction_is_deterministic() {
        let mut cache = GammaCurveCache::new();
        let image = gray(&[0, 10, 204, 205, 206, 1000, 8192, 40000, 65535]);

        let first = cache.apply(&image, GammaNormalization::FullScale);
        let populated = cache.populated();
        assert_eq!(populated, 9);
        let second = cache.apply(&image, GammaNormalization::FullScale);

        assert_eq!(first, second);
        assert_eq!(cache.populated(), populated);
        assert_eq!(first.channel(0), first.channel(2));
    }

    #[test]
    fn test_transfer_is_continuous_at_the_linear_threshold() {
        let max = FULL_SCALE;
        let threshold = (LINEAR_THRESH_COEFF * max) as u16;
        for level in threshold.saturating_sub(2)..=threshold + 2 {
            let linear = linear_segment(level) as i32;
            let power = power_segment(level, max) as i32;
            assert!((linear - power).abs() <= 1, "level {}: {} vs {}", level, linear, power);
        }
    }

    #[test]
    fn test_float_input_is_clamped_before_lookup() {
        let mut cache = GammaCurveCache::new();
        let image = PlanarImage::from_planes(1, 1, vec![-50.0f32, 70000.0, 100.7]).unwrap();
        let out = cache.apply(&image, GammaNormalization::FullScale);
        assert_eq!(out.as_slice(), &[0, 65535, 1292]);
    }

    #[test]
    fn test_changing_the_maximum_clears_the_table() {
        let mut cache = GammaCurveCache::new();
        let image = gray(&[1000, 30000]);

        let full = cache.apply(&image, GammaNormalization::FullScale);
        assert_eq!(cache.max_value(), Some(u16::MAX));

        let observed = cache.apply(&image, GammaNormalization::ObservedMax);
        assert_eq!(cache.max_value(), Some(30000));
        assert_eq!(cache.populated(), 2);
        assert_eq!(observed.channel(1)[1], 30000);
        assert_ne!(full, observed);

        let again = cache.apply(&image, GammaNormalization::FullScale);
        assert_eq!(full, again);
    }

    #[test]
    fn test_black_buffer_with_observed_maximum_stays_black() {
        let mut cache = GammaCurveCache::new();
        let out = cache.apply(&gray(&[0, 0]), GammaNormalization::ObservedMax);
        assert!(out.as_slice().iter().all(|&v| v == 0));
    }
}
