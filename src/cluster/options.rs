use crate::error::LaneError;
use crate::types::MAX_LANES;
use serde::{Deserialize, Serialize};

/// Options for the embedding-space instance clusterer.
///
/// - `max_lanes`: cap on the number of instances; leftovers become noise.
/// - `distance_threshold`: Euclidean radius in embedding space around a
///   group's centre (strict `<`).
/// - `top_band_rows`: rows `0..top_band_rows` are dropped before grouping.
///   The default of 65 matches a 512×256 segmentation output.
/// - `mean_shift_iterations`: how many times a group's centre is moved to
///   the mean of its members and the group re-collected. `0` keeps the seed
///   pixel's embedding as the centre.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterParams {
    pub max_lanes: usize,
    pub distance_threshold: f32,
    pub top_band_rows: usize,
    pub mean_shift_iterations: usize,
}

impl Default for ClusterParams {
    fn default() -> Self {
        Self {
            max_lanes: 4,
            distance_threshold: 1.5,
            top_band_rows: 65,
            mean_shift_iterations: 0,
        }
    }
}

impl ClusterParams {
    /// Plain seeded grouping without a top band.
    pub fn new(max_lanes: usize, distance_threshold: f32) -> Self {
        Self {
            max_lanes,
            distance_threshold,
            top_band_rows: 0,
            mean_shift_iterations: 0,
        }
    }

    pub fn with_top_band_rows(mut self, rows: usize) -> Self {
        self.top_band_rows = rows;
        self
    }

    pub fn with_mean_shift_iterations(mut self, iterations: usize) -> Self {
        self.mean_shift_iterations = iterations;
        self
    }

    pub fn validate(&self) -> Result<(), LaneError> {
        if self.max_lanes == 0 || self.max_lanes > MAX_LANES {
            return Err(LaneError::InvalidParams(format!(
                "max_lanes must be in 1..={}, got {}",
                MAX_LANES, self.max_lanes
            )));
        }
        if !(self.distance_threshold.is_finite() && self.distance_threshold > 0.0) {
            return Err(LaneError::InvalidParams(format!(
                "distance_threshold must be positive and finite, got {}",
                self.distance_threshold
            )));
        }
        Ok(())
    }
}
