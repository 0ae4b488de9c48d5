//! Planar pixel buffers
//!
//! Dense channel-major RGB buffers shared by every developing stage, plus the
//! cheap per-sample level operations (bit-depth adjust, black level removal).

pub mod types;
mod levels;

pub use types::{PlanarImage, Sample, CHANNELS};
pub use levels::{raw_adjust, subtract_black, RAW_ADJUST_SHIFT};
