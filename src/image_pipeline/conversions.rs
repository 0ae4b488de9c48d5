//! Pipeline conversions module
//!
//! This module contains orchestration logic for various image format conversions.

mod raw_to_tiff;


pub use raw_to_tiff::RawToTiffPipeline;
