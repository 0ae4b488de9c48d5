//! Tone mapping module
//!
//! Global contrast stretch keyed off the green-channel histogram, and the
//! memoized sRGB transfer curve.

mod histogram;
mod stretch;
mod gamma;

pub use histogram::{GreenHistogram, BUCKET_COUNT, BUCKET_SHIFT};
pub use stretch::{HistogramStretcher, StretchBounds};
pub use gamma::{GammaCurveCache, GammaNormalization, GAMMA_LEVELS};
