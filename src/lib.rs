#![doc = include_str!("../README.md")]

// Post-processing stages
pub mod cluster;
pub mod fit;
pub mod homography;

// Pipeline + plumbing
pub mod config;
pub mod detector;
pub mod diagnostics;
pub mod error;
pub mod image;
pub mod predict;
pub mod types;

// --- High-level re-exports -------------------------------------------------

// Main entry points: detector + results.
pub use crate::detector::{LaneDetector, LaneParams};
pub use crate::error::{LaneError, LaneFitError};
pub use crate::types::{FitResult, LaneCurve, LaneId, LaneInstance, LanePoints};

// Stage entry points usable without the detector.
pub use crate::cluster::{cluster, ClusterParams, ClusterResult, InstanceClusterer};
pub use crate::fit::{fit_and_project, CurveFitter, FitParams};

// Diagnostics returned by the detector.
pub use crate::diagnostics::{LaneReport, PipelineTrace};

// Transform helpers that are generally useful.
pub use crate::homography::{
    apply_homography_points, rescale_homography_image_space, LaneTransform, TransformParams,
};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use lane_detector::prelude::*;
///
/// # fn main() -> Result<(), LaneError> {
/// let (w, h) = (128usize, 64usize);
/// let embedding = EmbeddingMap::new(w, h, 4);
/// let mask = ForegroundMask::from_fn(w, h, |x, _| x == 20 || x == 100);
/// let detector = LaneDetector::new(
///     LaneParams::default(),
///     RecordedSegmentation { embedding, mask },
///     FixedTransform { params: TransformParams::identity(), input_size: (w, h) },
/// )?;
/// let frame = RgbImage::new(w, h);
/// let report = detector.process(&frame.as_view())?;
/// println!("lanes={} latency_ms={:.3}", report.instances.len(), report.trace.timings.total_ms);
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::image::{EmbeddingMap, ForegroundMask, LabelMap, RgbImage, RgbImageView};
    pub use crate::predict::{FixedTransform, LaneSegmenter, RecordedSegmentation, TransformPredictor};
    pub use crate::{cluster, fit_and_project, LaneDetector, LaneError, LaneParams, TransformParams};
}
