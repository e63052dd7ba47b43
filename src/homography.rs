//! Constrained perspective transform between image and rectified space.
//!
//! The transform predictor emits six values `[a, b, c, d, e, f]` that fill
//!
//! ```text
//!     | a  b  c |
//! H = | 0  d  e |
//!     | 0  f  1 |
//! ```
//!
//! The zero entries are fixed: rectified `y` and the homogeneous weight
//! depend on image `y` only, so every image row maps to a single rectified
//! row. Its determinant is `a * (d - e * f)`.
use crate::error::LaneError;
use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

const EPS: f32 = 1e-9;

/// The six free coefficients `[a, b, c, d, e, f]` of the lane transform.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransformParams(pub [f32; 6]);

impl TransformParams {
    pub fn new(values: [f32; 6]) -> Self {
        Self(values)
    }

    /// Parameters producing the identity matrix.
    pub fn identity() -> Self {
        Self([1.0, 0.0, 0.0, 1.0, 0.0, 0.0])
    }

    pub fn from_slice(values: &[f32]) -> Result<Self, LaneError> {
        let arr: [f32; 6] = values.try_into().map_err(|_| LaneError::InvalidBuffer {
            expected: 6,
            got: values.len(),
        })?;
        Ok(Self(arr))
    }

    /// The constrained 3×3 matrix (not checked for invertibility).
    pub fn matrix(&self) -> Matrix3<f32> {
        let [a, b, c, d, e, f] = self.0;
        Matrix3::new(a, b, c, 0.0, d, e, 0.0, f, 1.0)
    }
}

impl Default for TransformParams {
    fn default() -> Self {
        Self::identity()
    }
}

/// Validated transform with its inverse.
#[derive(Clone, Copy, Debug)]
pub struct LaneTransform {
    h: Matrix3<f32>,
    h_inv: Matrix3<f32>,
}

impl LaneTransform {
    /// Build the matrix and its inverse. Fails with
    /// [`LaneError::DegenerateTransform`] when no finite inverse exists.
    ///
    /// Invertibility does not depend on overall scale, so a tiny but
    /// non-zero determinant is accepted.
    pub fn from_params(params: &TransformParams) -> Result<Self, LaneError> {
        let h = params.matrix();
        let determinant = h.determinant();
        if !determinant.is_finite() || determinant == 0.0 {
            return Err(LaneError::DegenerateTransform { determinant });
        }
        let h_inv = h
            .try_inverse()
            .filter(|inv| inv.iter().all(|v| v.is_finite()))
            .ok_or(LaneError::DegenerateTransform { determinant })?;
        Ok(Self { h, h_inv })
    }

    pub fn matrix(&self) -> &Matrix3<f32> {
        &self.h
    }

    pub fn inverse(&self) -> &Matrix3<f32> {
        &self.h_inv
    }

    /// Image → rectified. `None` when the point maps to infinity.
    #[inline]
    pub fn rectify(&self, p: [f32; 2]) -> Option<[f32; 2]> {
        project(&self.h, p)
    }

    /// Rectified → image. `None` when the point maps to infinity.
    #[inline]
    pub fn unrectify(&self, p: [f32; 2]) -> Option<[f32; 2]> {
        project(&self.h_inv, p)
    }

    /// Rectify a whole polyline; `None` if any point maps to infinity.
    pub fn rectify_points(&self, pts: &[[f32; 2]]) -> Option<Vec<[f32; 2]>> {
        apply_homography_points(&self.h, pts)
    }

    pub fn unrectify_points(&self, pts: &[[f32; 2]]) -> Option<Vec<[f32; 2]>> {
        apply_homography_points(&self.h_inv, pts)
    }
}

/// Homogeneous multiply followed by the perspective divide.
#[inline]
pub fn project(h: &Matrix3<f32>, p: [f32; 2]) -> Option<[f32; 2]> {
    let v = h * Vector3::new(p[0], p[1], 1.0);
    let w = v[2];
    if !w.is_finite() || w.abs() <= EPS || !v[0].is_finite() || !v[1].is_finite() {
        return None;
    }
    Some([v[0] / w, v[1] / w])
}

/// Map all points through `h`; `None` if any of them is not representable.
pub fn apply_homography_points(h: &Matrix3<f32>, pts: &[[f32; 2]]) -> Option<Vec<[f32; 2]>> {
    let mut out = Vec::with_capacity(pts.len());
    for &p in pts {
        out.push(project(h, p)?);
    }
    Some(out)
}

/// Compose `h` with the scaling that takes a `src_w × src_h` image to
/// `dst_w × dst_h`.
pub fn rescale_homography_image_space(
    h: &Matrix3<f32>,
    src_w: usize,
    src_h: usize,
    dst_w: usize,
    dst_h: usize,
) -> Matrix3<f32> {
    if src_w == 0 || src_h == 0 || dst_w == 0 || dst_h == 0 {
        return *h;
    }
    let sx = dst_w as f32 / src_w as f32;
    let sy = dst_h as f32 / src_h as f32;
    let scale = Matrix3::new(sx, 0.0, 0.0, 0.0, sy, 0.0, 0.0, 0.0, 1.0);
    scale * h
}
