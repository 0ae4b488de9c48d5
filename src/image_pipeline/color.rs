//! Color space conversion module
//!
//! Camera-native samples are brought to sRGB' either directly through a
//! camera→sRGB matrix or through CIE XYZ (D65).

pub mod matrix;
mod converter;

pub use matrix::{ColorMatrix, Matrix3};
pub use converter::{
    ColorConversion,
    camera_to_srgb,
    camera_to_srgb_matrix,
    camera_to_xyz,
    xyz_to_srgb,
    SRGB_FROM_XYZ_D65,
    XYZ_D65_FROM_SRGB,
};
