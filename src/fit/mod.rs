//! Perspective-corrected polynomial fitting of lane pixels.
//!
//! Lanes are rectified with the constrained transform from
//! [`crate::homography`], fit as `x = p(y)` (lanes run roughly vertically after
//! rectification, so `y` is the natural abscissa), resampled on an even `y`
//! grid and projected back into the image.
//!
//! Modules
//! - [`options`] – [`FitParams`] and the degree cap.
//! - [`poly`] – normalised least-squares [`Polynomial`].
//! - `curve` – the [`CurveFitter`] driving the per-lane chain.

mod curve;
pub mod options;
pub mod poly;

pub use curve::CurveFitter;
pub use options::{FitParams, MAX_POLY_DEGREE};
pub use poly::Polynomial;

use crate::error::LaneError;
use crate::homography::TransformParams;
use crate::types::{FitResult, LaneInstance};

/// Fit every instance with `poly_degree` and the default sample count.
///
/// A lane with too few points yields an empty point sequence; a degenerate
/// transform fails the whole call.
pub fn fit_and_project(
    lane_instances: &[LaneInstance],
    transform_params: &TransformParams,
    poly_degree: usize,
) -> Result<FitResult, LaneError> {
    CurveFitter::new(FitParams::new(poly_degree))?.fit_instances(lane_instances, transform_params)
}
