use crate::error::LaneFitError;
use crate::fit::Polynomial;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Lane instance identifier. `0` is reserved for background / unassigned.
pub type LaneId = u8;

/// Label used for pixels that belong to no lane.
pub const BACKGROUND: LaneId = 0;

/// Largest number of lanes a label map can hold.
pub const MAX_LANES: usize = LaneId::MAX as usize;

/// One clustered lane: its id and the `[x, y]` pixels assigned to it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaneInstance {
    pub id: LaneId,
    pub pixels: Vec<[usize; 2]>,
}

impl LaneInstance {
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }
}

/// Sub-pixel lane samples handed to the curve fitter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LanePoints {
    pub id: LaneId,
    pub points: Vec<[f32; 2]>,
}

impl From<&LaneInstance> for LanePoints {
    fn from(instance: &LaneInstance) -> Self {
        Self {
            id: instance.id,
            points: instance
                .pixels
                .iter()
                .map(|&[x, y]| [x as f32, y as f32])
                .collect(),
        }
    }
}

/// Fitted curve of one lane.
///
/// `points` are in original (pre-rectification) coordinates, ordered by
/// increasing rectified y. A lane that could not be fit keeps its id, has no
/// points and records why in `failure`.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaneCurve {
    pub id: LaneId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub polynomial: Option<Polynomial>,
    pub points: Vec<[f32; 2]>,
    /// RMS of `x - p(y)` over the rectified lane points.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rms_residual: Option<f32>,
    /// Rectified `[y_min, y_max]` the samples span.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_range: Option<[f32; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<LaneFitError>,
}

impl LaneCurve {
    pub fn failed(id: LaneId, failure: LaneFitError) -> Self {
        Self {
            id,
            polynomial: None,
            points: Vec::new(),
            rms_residual: None,
            y_range: None,
            failure: Some(failure),
        }
    }

    pub fn is_fitted(&self) -> bool {
        self.failure.is_none()
    }
}

/// Output of the curve fitter, one entry per input lane in input order.
#[derive(Clone, Debug, Default, Serialize)]
pub struct FitResult {
    pub curves: Vec<LaneCurve>,
}

impl FitResult {
    pub fn curve(&self, id: LaneId) -> Option<&LaneCurve> {
        self.curves.iter().find(|c| c.id == id)
    }

    /// Lane id → ordered original-space points. Failed lanes map to an empty
    /// sequence.
    pub fn points_by_id(&self) -> BTreeMap<LaneId, Vec<[f32; 2]>> {
        self.curves
            .iter()
            .map(|c| (c.id, c.points.clone()))
            .collect()
    }

    pub fn fitted_count(&self) -> usize {
        self.curves.iter().filter(|c| c.is_fitted()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.curves.len() - self.fitted_count()
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }
}
