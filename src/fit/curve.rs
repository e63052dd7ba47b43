//! Rectify → fit → resample → project back, one lane at a time.

use super::options::FitParams;
use super::poly::Polynomial;
use crate::error::{LaneError, LaneFitError};
use crate::homography::{LaneTransform, TransformParams};
use crate::types::{FitResult, LaneCurve, LaneInstance, LanePoints};
use log::{debug, warn};

/// Perspective curve fitter.
///
/// # Algorithm Outline
/// 1. Build the constrained transform and its inverse; a singular matrix
///    aborts the whole call.
/// 2. Rectify each lane's points (homogeneous multiply + divide).
/// 3. Fit `x = p(y)` by least squares in rectified space. Lanes with fewer
///    than `poly_degree + 1` usable points fail locally.
/// 4. Evaluate `p` on `sample_count` evenly spaced `y` values spanning the
///    lane's rectified range and map them back with the inverse transform.
///
/// Lanes are independent and, with the `parallel` feature, fit concurrently.
/// The output keeps the input lane order.
pub struct CurveFitter {
    params: FitParams,
}

impl CurveFitter {
    pub fn new(params: FitParams) -> Result<Self, LaneError> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &FitParams {
        &self.params
    }

    pub fn fit_and_project(
        &self,
        lanes: &[LanePoints],
        transform: &TransformParams,
    ) -> Result<FitResult, LaneError> {
        let transform = LaneTransform::from_params(transform)?;
        debug!(
            "CurveFitter::fit_and_project lanes={} degree={} samples={}",
            lanes.len(),
            self.params.poly_degree,
            self.params.sample_count
        );
        let curves = fit_lanes(&transform, lanes, &self.params);
        let result = FitResult { curves };
        debug!(
            "CurveFitter::fit_and_project done fitted={} failed={}",
            result.fitted_count(),
            result.failed_count()
        );
        Ok(result)
    }

    /// Convenience wrapper taking clustered instances directly.
    pub fn fit_instances(
        &self,
        instances: &[LaneInstance],
        transform: &TransformParams,
    ) -> Result<FitResult, LaneError> {
        let lanes: Vec<LanePoints> = instances.iter().map(LanePoints::from).collect();
        self.fit_and_project(&lanes, transform)
    }
}

#[cfg(feature = "parallel")]
fn fit_lanes(transform: &LaneTransform, lanes: &[LanePoints], params: &FitParams) -> Vec<LaneCurve> {
    use rayon::prelude::*;

    lanes
        .par_iter()
        .map(|lane| fit_lane(transform, lane, params))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn fit_lanes(transform: &LaneTransform, lanes: &[LanePoints], params: &FitParams) -> Vec<LaneCurve> {
    lanes
        .iter()
        .map(|lane| fit_lane(transform, lane, params))
        .collect()
}

/// Fit a single lane. Never fails as a whole; problems end up in
/// [`LaneCurve::failure`]. `params` are validated by [`CurveFitter::new`].
pub(crate) fn fit_lane(transform: &LaneTransform, lane: &LanePoints, params: &FitParams) -> LaneCurve {
    let needed = params.min_points();

    let mut ys: Vec<f32> = Vec::with_capacity(lane.points.len());
    let mut xs: Vec<f32> = Vec::with_capacity(lane.points.len());
    for &p in &lane.points {
        if let Some([x, y]) = transform.rectify(p) {
            xs.push(x);
            ys.push(y);
        }
    }
    let dropped = lane.points.len() - ys.len();
    if dropped > 0 {
        warn!(
            "lane {}: {} of {} points map to infinity and were dropped",
            lane.id,
            dropped,
            lane.points.len()
        );
    }
    if ys.len() < needed {
        debug!(
            "lane {}: {} usable points, {} required",
            lane.id,
            ys.len(),
            needed
        );
        return LaneCurve::failed(
            lane.id,
            LaneFitError::InsufficientPoints {
                needed,
                got: ys.len(),
            },
        );
    }

    let polynomial = match Polynomial::fit(&ys, &xs, params.poly_degree) {
        Some(p) => p,
        None => {
            warn!("lane {}: least-squares solve failed", lane.id);
            return LaneCurve::failed(lane.id, LaneFitError::NumericalFailure);
        }
    };
    let rms = polynomial.rms_residual(&ys, &xs);

    let y_min = ys.iter().copied().fold(f32::INFINITY, f32::min);
    let y_max = ys.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let steps = params.sample_count.saturating_sub(1).max(1) as f32;
    let mut points = Vec::with_capacity(params.sample_count);
    for i in 0..params.sample_count {
        let y = y_min + (y_max - y_min) * (i as f32 / steps);
        let x = polynomial.eval(y);
        if let Some(p) = transform.unrectify([x, y]) {
            points.push(p);
        }
    }
    if points.is_empty() {
        warn!("lane {}: no resampled point could be projected back", lane.id);
        return LaneCurve::failed(lane.id, LaneFitError::NumericalFailure);
    }
    if points.len() < params.sample_count {
        warn!(
            "lane {}: {} resampled points could not be projected back",
            lane.id,
            params.sample_count - points.len()
        );
    }

    LaneCurve {
        id: lane.id,
        polynomial: Some(polynomial),
        points,
        rms_residual: Some(rms),
        y_range: Some([y_min, y_max]),
        failure: None,
    }
}
