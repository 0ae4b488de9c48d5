//! Small fixed-size matrix helpers for color transforms.

use crate::image_pipeline::planar::{PlanarImage, Sample, CHANNELS};

pub type Matrix3 = [[f32; 3]; 3];

pub const IDENTITY: Matrix3 = [
    [1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, 0.0, 1.0],
];

/// Rows whose sum is smaller than this are zeroed by [`normalize_rows`].
pub const ROW_SUM_EPSILON: f32 = 1e-7;

const DETERMINANT_EPSILON: f32 = 1e-12;

pub fn multiply(a: &Matrix3, b: &Matrix3) -> Matrix3 {
    let mut out = [[0.0f32; 3]; 3];
    for r in 0..3 {
        for c in 0..3 {
            out[r][c] = a[r][0] * b[0][c] + a[r][1] * b[1][c] + a[r][2] * b[2][c];
        }
    }
    out
}

pub fn diagonal(values: [f32; 3]) -> Matrix3 {
    [
        [values[0], 0.0, 0.0],
        [0.0, values[1], 0.0],
        [0.0, 0.0, values[2]],
    ]
}

/// Scales each row to sum to one. A row with a negligible sum is zeroed.
pub fn normalize_rows(m: &Matrix3) -> Matrix3 {
    let mut out = *m;
    for row in out.iter_mut() {
        let sum: f32 = row.iter().sum();
        if sum.abs() < ROW_SUM_EPSILON {
            *row = [0.0; 3];
        } else {
            row.iter_mut().for_each(|v| *v /= sum);
        }
    }
    out
}

pub fn determinant(m: &Matrix3) -> f32 {
    m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
        - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
        + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
}

/// Inverse by cofactor expansion, `None` when singular.
pub fn invert(m: &Matrix3) -> Option<Matrix3> {
    let det = determinant(m);
    if det.abs() < DETERMINANT_EPSILON || !det.is_finite() {
        return None;
    }
    let inv_det = 1.0 / det;
    Some([
        [
            (m[1][1] * m[2][2] - m[1][2] * m[2][1]) * inv_det,
            (m[0][2] * m[2][1] - m[0][1] * m[2][2]) * inv_det,
            (m[0][1] * m[1][2] - m[0][2] * m[1][1]) * inv_det,
        ],
        [
            (m[1][2] * m[2][0] - m[1][0] * m[2][2]) * inv_det,
            (m[0][0] * m[2][2] - m[0][2] * m[2][0]) * inv_det,
            (m[0][2] * m[1][0] - m[0][0] * m[1][2]) * inv_det,
        ],
        [
            (m[1][0] * m[2][1] - m[1][1] * m[2][0]) * inv_det,
            (m[0][1] * m[2][0] - m[0][0] * m[2][1]) * inv_det,
            (m[0][0] * m[1][1] - m[0][1] * m[1][0]) * inv_det,
        ],
    ])
}

/// 3×3 portion of a 3×4 matrix (the fourth column is unused).
pub fn from_3x4(m: &[[f32; 4]; 3]) -> Matrix3 {
    [
        [m[0][0], m[0][1], m[0][2]],
        [m[1][0], m[1][1], m[1][2]],
        [m[2][0], m[2][1], m[2][2]],
    ]
}

/// First three rows of a 4×3 matrix (the fourth color row is unused).
pub fn from_4x3(m: &[[f32; 3]; 4]) -> Matrix3 {
    [m[0], m[1], m[2]]
}

/// Color matrix shapes accepted by the conversions, reduced to 3×3.
pub trait ColorMatrix {
    fn to_matrix3(&self) -> Matrix3;
}

impl ColorMatrix for Matrix3 {
    fn to_matrix3(&self) -> Matrix3 {
        *self
    }
}

impl ColorMatrix for [[f32; 4]; 3] {
    fn to_matrix3(&self) -> Matrix3 {
        from_3x4(self)
    }
}

impl ColorMatrix for [[f32; 3]; 4] {
    fn to_matrix3(&self) -> Matrix3 {
        from_4x3(self)
    }
}

/// `m · image`, one output row per matrix row.
pub fn apply<T: Sample>(m: &Matrix3, image: &PlanarImage<T>) -> PlanarImage<f32> {
    let mut out = PlanarImage::<f32>::new(image.width(), image.height());
    let (r, g, b) = (image.channel(0), image.channel(1), image.channel(2));
    for (row, coeffs) in m.iter().enumerate().take(CHANNELS) {
        let dst = out.channel_mut(row);
        for (i, v) in dst.iter_mut().enumerate() {
            *v = coeffs[0] * r[i].to_f32() + coeffs[1] * g[i].to_f32() + coeffs[2] * b[i].to_f32();
        }
    }
    out
}
