//! Histogram stretching (brightness and contrast).
//!
//! The green channel stands in for brightness. Its histogram is cut
//! symmetrically at `stretch_rate / 2` of the pixels on each side, and the
//! resulting `[min_value, max_value]` is mapped linearly onto `[0, 65535]`
//! for all three channels.

use tracing::debug;

use crate::image_pipeline::planar::PlanarImage;
use super::histogram::{GreenHistogram, BUCKET_SHIFT};

const MAX_LEVEL: f32 = u16::MAX as f32;

/// Rates below this leave the image untouched.
const IDENTITY_RATE: f32 = 0.000001;

/// Rates at or above this collapse the image to a single value.
const COLLAPSE_RATE: f32 = 0.999999;

/// Spans narrower than this produce a zero gain instead of dividing.
const SPAN_EPSILON: f32 = 0.00001;

const GREEN: usize = 1;

/// Anchor points and the affine map derived from them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StretchBounds {
    pub min_value: f32,
    pub max_value: f32,
    pub alpha: f32,
    pub beta: f32,
}

impl StretchBounds {
    fn from_range(min_value: f32, max_value: f32) -> Self {
        let alpha = if (max_value - min_value) < SPAN_EPSILON {
            0.0
        } else {
            MAX_LEVEL / (max_value - min_value)
        };
        Self {
            min_value,
            max_value,
            alpha,
            beta: -min_value * alpha,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct HistogramStretcher {
    stretch_rate: f32,
    debug: bool,
}

impl HistogramStretcher {
    /// `stretch_rate` is the fraction of pixels (range `[0, 1]`) pushed
    /// outside `[0, 65535]`, half at each end.
    pub fn new(stretch_rate: f32) -> Self {
        Self { stretch_rate, debug: false }
    }

    /// Logs the intermediate histogram scan values at debug level.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn stretch_rate(&self) -> f32 {
        self.stretch_rate
    }

    pub fn is_identity(&self) -> bool {
        self.stretch_rate < IDENTITY_RATE
    }

    /// Computes the stretch anchors of an image already clipped into
    /// `[0, 65535]`.
    pub fn bounds(&self, clipped: &PlanarImage<f32>) -> StretchBounds {
        let (mut min_value, mut max_value) = clipped.min_max().unwrap_or((0.0, 0.0));

        if COLLAPSE_RATE <= self.stretch_rate {
            max_value = min_value;
        } else {
            let acc_thresh = (clipped.pixel_count() as f32 * self.stretch_rate * 0.5) as u64;
            let histogram = GreenHistogram::from_samples(clipped.channel(GREEN));

            let min_bin = histogram.lower_bin(acc_thresh);
            let max_bin = histogram.upper_bin(acc_thresh);
            if self.debug {
                debug!(acc_thresh, min_bin, max_bin, "Histogram scan");
            }
            min_value = (min_bin << BUCKET_SHIFT) as f32;
            max_value = (max_bin << BUCKET_SHIFT) as f32;
        }

        let bounds = StretchBounds::from_range(min_value, max_value);
        if self.debug {
            debug!(
                min_value = bounds.min_value,
                max_value = bounds.max_value,
                alpha = bounds.alpha,
                beta = bounds.beta,
                "Stretch bounds"
            );
        }
        bounds
    }

    /// Clips to `[0, 65535]` and applies `sample * alpha + beta` (fused) to
    /// every sample. The result is not clipped again.
    pub fn apply(&self, image: PlanarImage<f32>) -> PlanarImage<f32> {
        if self.is_identity() {
            if self.debug {
                debug!("Stretch rate {} is zero, image left as is", self.stretch_rate);
            }
            return image;
        }

        let mut image = image;
        for v in image.as_mut_slice() {
            *v = v.clamp(0.0, MAX_LEVEL);
        }

        let bounds = self.bounds(&image);
        for v in image.as_mut_slice() {
            *v = v.mul_add(bounds.alpha, bounds.beta);
        }
        image
    }
}
