//! Parameter types configuring the detector stages.
//!
//! [`LaneParams`] bundles the clustering and fitting knobs plus the
//! resolution the lane partition is resampled to before fitting. Defaults
//! match a 512×256 segmentation head and a cubic fit.

use crate::cluster::ClusterParams;
use crate::error::LaneError;
use crate::fit::FitParams;
use serde::{Deserialize, Serialize};

/// Detector-wide parameters.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LaneParams {
    /// Embedding-space clustering.
    pub cluster: ClusterParams,
    /// Perspective curve fitting.
    pub fit: FitParams,
    /// `(width, height)` the label map is resampled to before fitting.
    /// `None` uses the transform predictor's input size.
    pub fit_resolution: Option<(usize, usize)>,
}

impl LaneParams {
    pub fn validate(&self) -> Result<(), LaneError> {
        self.cluster.validate()?;
        self.fit.validate()?;
        if let Some((w, h)) = self.fit_resolution {
            if w == 0 || h == 0 {
                return Err(LaneError::InvalidParams(format!(
                    "fit_resolution must be non-zero, got {}x{}",
                    w, h
                )));
            }
        }
        Ok(())
    }
}
