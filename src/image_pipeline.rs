//! Image processing pipeline module
//!
//! The developing core (`planar`, `color`, `tone`, `develop`) turns
//! demosaiced camera samples into display-ready sRGB. Around it, `raw`,
//! `debayer`, `tiff` and `conversions` handle decoding, demosaicing,
//! encoding and orchestration.

pub mod common;
pub mod planar;
pub mod color;
pub mod tone;
pub mod develop;
pub mod raw;
pub mod debayer;
pub mod tiff;
pub mod conversions;

pub use common::{
    ConversionError,
    Result,
};

pub use planar::{
    PlanarImage,
    Sample,
    raw_adjust,
    subtract_black,
};

pub use color::{
    ColorConversion,
    ColorMatrix,
    Matrix3,
    camera_to_srgb,
    camera_to_xyz,
    xyz_to_srgb,
};

pub use tone::{
    GammaCurveCache,
    GammaNormalization,
    HistogramStretcher,
};

pub use develop::{
    DevelopConfig,
    DevelopConfigBuilder,
    RawDeveloper,
};

pub use raw::{
    CaptureMetadata,
    RawImageData,
    RawImageReader,
    RawLoaderReader,
};

pub use debayer::CpuDebayer;

pub use self::tiff::{
    TiffCompression,
    OutputBitDepth,
    ConversionConfig,
    ConversionConfigBuilder,
    TiffWriter,
    StandardTiffWriter,
};

pub use conversions::{
    RawToTiffPipeline,
};
