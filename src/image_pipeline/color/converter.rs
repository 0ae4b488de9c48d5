use tracing::debug;

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::planar::{PlanarImage, Sample};
use super::matrix::{self, ColorMatrix, Matrix3};

/// CIE XYZ (D65) to linear sRGB'.
pub const SRGB_FROM_XYZ_D65: Matrix3 = [
    [3.079955, -1.537139, -0.542816],
    [-0.921259, 1.876011, 0.045247],
    [0.052887, -0.204026, 1.151138],
];

/// Linear sRGB to CIE XYZ (D65), used to derive camera→sRGB matrices.
pub const XYZ_D65_FROM_SRGB: Matrix3 = [
    [0.412453, 0.357580, 0.180423],
    [0.212671, 0.715160, 0.072169],
    [0.019334, 0.119193, 0.950227],
];

/// Which path takes camera-native samples to sRGB'.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColorConversion {
    /// Leave samples in the camera-native space
    Disabled,
    /// Single camera→sRGB matrix (fast, not identical to `ViaXyz`)
    #[default]
    Direct,
    /// Camera → XYZ (from ColorMatrix and AnalogBalance) → sRGB'
    ViaXyz,
}

/// Converts camera-native samples to CIE XYZ (D65).
///
/// `color_matrix` maps XYZ to the reference camera space (DNG ColorMatrix);
/// a 3×4 or 4×3 matrix contributes its 3×3 portion.
/// The combined `analog_balance · color_matrix` has its rows normalized to
/// unit sum before inversion; rows with a negligible sum are zeroed. Fails
/// with [`ConversionError::SingularColorMatrix`] when the normalized matrix
/// has no inverse.
pub fn camera_to_xyz<T: Sample, M: ColorMatrix>(
    image: &PlanarImage<T>,
    color_matrix: &M,
    analog_balance: [f32; 3],
) -> Result<PlanarImage<f32>> {
    let cam_from_xyz = matrix::multiply(&matrix::diagonal(analog_balance), &color_matrix.to_matrix3());
    let cam_from_xyz = matrix::normalize_rows(&cam_from_xyz);
    let xyz_from_cam = matrix::invert(&cam_from_xyz).ok_or(ConversionError::SingularColorMatrix)?;
    debug!("xyz_from_cam: {:?}", xyz_from_cam);

    Ok(matrix::apply(&xyz_from_cam, image))
}

/// XYZ (D65) to sRGB' with the fixed [`SRGB_FROM_XYZ_D65`] matrix.
pub fn xyz_to_srgb<T: Sample>(xyz: &PlanarImage<T>) -> PlanarImage<f32> {
    matrix::apply(&SRGB_FROM_XYZ_D65, xyz)
}

/// Camera-native straight to sRGB', bypassing XYZ. Takes a 3×3 matrix or
/// the 3×3 portion of a 3×4 / 4×3 one.
pub fn camera_to_srgb<T: Sample, M: ColorMatrix>(image: &PlanarImage<T>, color_matrix: &M) -> PlanarImage<f32> {
    matrix::apply(&color_matrix.to_matrix3(), image)
}

/// Derives a camera→sRGB matrix from an XYZ→camera color matrix:
/// `inv(normalize_rows(xyz_to_camera · XYZ_D65_FROM_SRGB))`.
pub fn camera_to_srgb_matrix(xyz_to_camera: &Matrix3) -> Option<Matrix3> {
    let cam_from_srgb = matrix::normalize_rows(&matrix::multiply(xyz_to_camera, &XYZ_D65_FROM_SRGB));
    let srgb_from_cam = matrix::invert(&cam_from_srgb);
    debug!("Derived camera to sRGB matrix: {:?}", srgb_from_cam);
    srgb_from_cam
}
