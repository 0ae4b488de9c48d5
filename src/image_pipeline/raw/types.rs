//! RAW image data types

use crate::image_pipeline::color::matrix::{self, Matrix3};

/// Per-capture calibration needed by the developing stages.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureMetadata {
    /// Black level shared by all channels; 0 when only per-channel levels apply
    pub black_level: u16,
    /// Per-channel black levels (RGB), used when `black_level` is 0
    pub channel_black_levels: [u16; 3],
    /// Sensor saturation value
    pub white_level: u16,
    /// XYZ to camera-native matrix (DNG ColorMatrix)
    pub color_matrix: Matrix3,
    /// Per-channel analog gains (DNG AnalogBalance)
    pub analog_balance: [f32; 3],
    /// Camera-native to linear sRGB matrix for the direct path
    pub camera_to_srgb: Matrix3,
}

impl Default for CaptureMetadata {
    fn default() -> Self {
        Self {
            black_level: 0,
            channel_black_levels: [0; 3],
            white_level: u16::MAX,
            color_matrix: matrix::IDENTITY,
            analog_balance: [1.0; 3],
            camera_to_srgb: matrix::IDENTITY,
        }
    }
}

impl CaptureMetadata {
    /// Splits per-color black levels into the scalar/per-channel form.
    ///
    /// Equal RGB levels become the scalar; otherwise the scalar is 0 and the
    /// three levels are kept per channel. The fourth (second green) entry is
    /// ignored.
    pub fn fold_black_levels(levels: [u16; 4]) -> (u16, [u16; 3]) {
        let rgb = [levels[0], levels[1], levels[2]];
        if rgb[0] == rgb[1] && rgb[1] == rgb[2] {
            (rgb[0], [0; 3])
        } else {
            (0, rgb)
        }
    }
}

/// Represents decoded RAW image data
#[derive(Debug, Clone)]
pub struct RawImageData {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
    /// Samples per pixel: 1 for a CFA mosaic, 3 or 4 for linear data
    pub components: usize,
    /// CFA layout of a mosaic (e.g. "RGGB"), empty for linear data
    pub cfa: String,
    /// Raw pixel data, pixel-interleaved when `components > 1`
    pub data: Vec<u16>,
    /// Actual bits per sample from the sensor (e.g., 12, 14, or 16)
    pub bits_per_sample: u32,
    /// Calibration of the capture
    pub metadata: CaptureMetadata,
}

impl RawImageData {
    pub fn is_mosaic(&self) -> bool {
        self.components == 1
    }
}
