//! Developing module
//!
//! Composes the per-pixel stages (raw adjust, black level, color conversion,
//! histogram stretch, gamma) behind one converter instance.

mod developer;
mod timing;
pub mod types;

#[cfg(test)]
mod tests;

pub use developer::RawDeveloper;
pub use timing::{PipelineTimings, StepTiming, Timer};
pub use types::{DevelopConfig, DevelopConfigBuilder};
