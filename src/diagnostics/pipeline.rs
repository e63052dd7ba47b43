use crate::cluster::ClusterStats;
use crate::diagnostics::TimingBreakdown;
use crate::homography::TransformParams;
use crate::image::LabelMap;
use crate::types::{FitResult, LaneCurve, LaneInstance};
use nalgebra::Matrix3;
use serde::Serialize;

/// Result produced by [`LaneDetector::process`](crate::LaneDetector::process).
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaneReport {
    /// Instances at segmentation resolution.
    pub instances: Vec<LaneInstance>,
    /// Label map at segmentation resolution.
    #[serde(skip)]
    pub labels: LabelMap,
    /// Curves in transform-predictor coordinates.
    pub curves: FitResult,
    /// Same curves rescaled to the input frame.
    pub frame_curves: Vec<LaneCurve>,
    pub trace: PipelineTrace,
}

/// End-to-end trace of one detector run.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineTrace {
    pub input: InputDescriptor,
    pub timings: TimingBreakdown,
    pub cluster: ClusterStage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fit: Option<FitStage>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputDescriptor {
    pub frame_width: usize,
    pub frame_height: usize,
    pub segmentation_width: usize,
    pub segmentation_height: usize,
    pub embedding_dim: usize,
    pub fit_width: usize,
    pub fit_height: usize,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterStage {
    pub lanes: usize,
    pub stats: ClusterStats,
    /// Pixels per lane after resampling to the fit resolution.
    pub resampled_points: Vec<usize>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FitStage {
    pub transform: TransformParams,
    pub matrix: Matrix3<f32>,
    pub fitted: usize,
    pub failed: usize,
}
