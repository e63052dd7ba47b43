use crate::error::LaneError;
use serde::{Deserialize, Serialize};

/// Highest polynomial degree the fitter accepts.
pub const MAX_POLY_DEGREE: usize = 5;

/// Options for the perspective curve fitter.
///
/// - `poly_degree`: degree of `x = p(y)` fit in rectified space.
/// - `sample_count`: evenly spaced rectified `y` values the curve is
///   resampled at before projecting back.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct FitParams {
    pub poly_degree: usize,
    pub sample_count: usize,
}

impl Default for FitParams {
    fn default() -> Self {
        Self {
            poly_degree: 3,
            sample_count: 50,
        }
    }
}

impl FitParams {
    pub fn new(poly_degree: usize) -> Self {
        Self {
            poly_degree,
            ..Default::default()
        }
    }

    pub fn with_sample_count(mut self, sample_count: usize) -> Self {
        self.sample_count = sample_count;
        self
    }

    /// Minimum number of points a lane needs to be fit.
    pub fn min_points(&self) -> usize {
        self.poly_degree + 1
    }

    pub fn validate(&self) -> Result<(), LaneError> {
        if self.poly_degree > MAX_POLY_DEGREE {
            return Err(LaneError::InvalidParams(format!(
                "poly_degree must be at most {}, got {}",
                MAX_POLY_DEGREE, self.poly_degree
            )));
        }
        if self.sample_count < 2 {
            return Err(LaneError::InvalidParams(format!(
                "sample_count must be at least 2, got {}",
                self.sample_count
            )));
        }
        Ok(())
    }
}
