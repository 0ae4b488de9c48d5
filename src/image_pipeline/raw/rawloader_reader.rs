//! RAW image reader implementation using the rawloader library.
//!
//! This module supports the RAW formats rawloader can decode (ARW, CR2, NEF,
//! DNG, ...). Besides the sensor samples it extracts the calibration the
//! developing stages need: black and white levels and the XYZ to camera
//! color matrix, from which the direct camera to sRGB matrix is derived.

use std::io::Cursor;

use tracing::{debug, warn};
use rawloader::RawImageData as RawloaderImageData;
use crate::image_pipeline::color::{self, matrix};
use crate::image_pipeline::common::error::{Result, ConversionError};
use crate::image_pipeline::raw::types::{CaptureMetadata, RawImageData};
use crate::image_pipeline::raw::reader::RawImageReader;

/// RAW image reader that uses the rawloader library for decoding.
pub struct RawLoaderReader;

/// Default bit depth when no white level information is available from the RAW file.
const DEFAULT_BITS_PER_SAMPLE: u32 = 16;

/// The bit width of the u16 data type, used for calculating actual bits per sample.
const U16_BITS: u32 = 16;

impl RawImageReader for RawLoaderReader {
    /// Reads and decodes RAW image data from a byte array.
    ///
    /// Integer samples are cast directly; normalized float samples are scaled
    /// to the u16 range. The bit depth comes from the sensor white level.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use raw_develop_rs::image_pipeline::{RawImageReader, RawLoaderReader};
    ///
    /// let reader = RawLoaderReader;
    /// let raw_bytes = std::fs::read("image.dng").unwrap();
    /// let image_data = reader.read_raw(&raw_bytes).unwrap();
    /// ```
    fn read_raw(&self, data: &[u8]) -> Result<RawImageData> {
        debug!("Decoding RAW image, {} bytes", data.len());
        
        let decoded = rawloader::decode(&mut Cursor::new(data))
            .map_err(|e| ConversionError::DecodeError(e.to_string()))?;
        
        let width = decoded.width;
        let height = decoded.height;
        let components = decoded.cpp;
        let cfa = if components == 1 { decoded.cfa.name.clone() } else { String::new() };
        
        debug!("Decoded image: {}x{}, {} component(s) per pixel", width, height, components);
        
        let data: Vec<u16> = match decoded.data {
            RawloaderImageData::Integer(values) => values,
            RawloaderImageData::Float(values) => {
                values.iter().map(|&v| (v * u16::MAX as f32) as u16).collect()
            }
        };
        
        let max_white_level = decoded.whitelevels.iter().max().copied().unwrap_or(u16::MAX);
        let bits_per_sample = if max_white_level == 0 {
            DEFAULT_BITS_PER_SAMPLE
        } else {
            // e.g. 4095 -> 12 bits, 16383 -> 14 bits
            U16_BITS - max_white_level.leading_zeros()
        };
        
        debug!("Calculated bits_per_sample: {} (max white level: {})", bits_per_sample, max_white_level);

        let metadata = capture_metadata(decoded.blacklevels, max_white_level, &decoded.xyz_to_cam);
        
        Ok(RawImageData {
            width,
            height,
            components,
            cfa,
            data,
            bits_per_sample,
            metadata,
        })
    }
}

/// Builds the developing metadata from rawloader's per-color calibration.
///
/// rawloader does not expose AnalogBalance, so it stays at unity.
pub(crate) fn capture_metadata(
    blacklevels: [u16; 4],
    white_level: u16,
    xyz_to_cam: &[[f32; 3]; 4],
) -> CaptureMetadata {
    let (black_level, channel_black_levels) = CaptureMetadata::fold_black_levels(blacklevels);
    let color_matrix = matrix::from_4x3(xyz_to_cam);

    let camera_to_srgb = color::camera_to_srgb_matrix(&color_matrix).unwrap_or_else(|| {
        warn!("Color matrix is missing or singular, using identity for camera to sRGB");
        matrix::IDENTITY
    });

    CaptureMetadata {
        black_level,
        channel_black_levels,
        white_level,
        color_matrix,
        analog_balance: [1.0; 3],
        camera_to_srgb,
    }
}
