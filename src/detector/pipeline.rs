//! Detector pipeline driving lane detection end-to-end.
//!
//! The [`LaneDetector`] owns the two injected predictors and the two
//! post-processing stages. Feed it an RGB frame and get the lane partition,
//! fitted curves in both coordinate frames and a trace with timings.
//!
//! Typical usage:
//! ```no_run
//! use lane_detector::{LaneDetector, LaneParams};
//! use lane_detector::image::RgbImageView;
//! use lane_detector::predict::{LaneSegmenter, TransformPredictor};
//!
//! # fn example<S: LaneSegmenter, T: TransformPredictor>(
//! #     segmenter: S,
//! #     transform: T,
//! #     frame: RgbImageView<'_>,
//! # ) -> Result<(), lane_detector::LaneError> {
//! let detector = LaneDetector::new(LaneParams::default(), segmenter, transform)?;
//! let report = detector.process(&frame)?;
//! for curve in &report.frame_curves {
//!     println!("lane {}: {} points", curve.id, curve.points.len());
//! }
//! # Ok(())
//! # }
//! ```
use super::params::LaneParams;
use crate::cluster::InstanceClusterer;
use crate::diagnostics::{
    elapsed_ms, ClusterStage, FitStage, InputDescriptor, LaneReport, PipelineTrace,
    TimingBreakdown,
};
use crate::error::LaneError;
use crate::fit::CurveFitter;
use crate::homography::{apply_homography_points, rescale_homography_image_space};
use crate::image::{LabelMap, RgbImageView};
use crate::predict::{LaneSegmenter, TransformPredictor};
use crate::types::{FitResult, LaneCurve, LaneId, LaneInstance, LanePoints};
use log::debug;
use nalgebra::Matrix3;
use std::collections::BTreeMap;
use std::time::Instant;

/// Lane detector combining segmentation, clustering, transform prediction
/// and perspective fitting.
pub struct LaneDetector<S, T> {
    params: LaneParams,
    clusterer: InstanceClusterer,
    fitter: CurveFitter,
    segmenter: S,
    transform: T,
}

impl<S, T> LaneDetector<S, T>
where
    S: LaneSegmenter,
    T: TransformPredictor,
{
    /// Create a detector; fails on invalid parameters.
    pub fn new(params: LaneParams, segmenter: S, transform: T) -> Result<Self, LaneError> {
        params.validate()?;
        let clusterer = InstanceClusterer::new(params.cluster)?;
        let fitter = CurveFitter::new(params.fit)?;
        Ok(Self {
            params,
            clusterer,
            fitter,
            segmenter,
            transform,
        })
    }

    pub fn params(&self) -> &LaneParams {
        &self.params
    }

    pub fn segmenter(&self) -> &S {
        &self.segmenter
    }

    pub fn transform_predictor(&self) -> &T {
        &self.transform
    }

    /// Resolution the lane partition is resampled to before fitting.
    pub fn fit_resolution(&self) -> Result<(usize, usize), LaneError> {
        let (w, h) = self
            .params
            .fit_resolution
            .unwrap_or_else(|| self.transform.input_size());
        if w == 0 || h == 0 {
            return Err(LaneError::InvalidParams(format!(
                "transform predictor input size must be non-zero, got {}x{}",
                w, h
            )));
        }
        Ok((w, h))
    }

    /// Run the full pipeline on one frame.
    ///
    /// A frame without lanes returns an empty report and skips the
    /// transform predictor. A singular predicted transform fails the call.
    pub fn process(&self, frame: &RgbImageView<'_>) -> Result<LaneReport, LaneError> {
        debug!(
            "LaneDetector::process start w={} h={} max_lanes={} degree={}",
            frame.w, frame.h, self.params.cluster.max_lanes, self.params.fit.poly_degree
        );
        let total_start = Instant::now();
        let mut timings = TimingBreakdown::default();
        let (fit_w, fit_h) = self.fit_resolution()?;

        let seg_start = Instant::now();
        let (embedding, mask) = self.segmenter.segment(frame)?;
        timings.record_since("segment", seg_start);

        let cluster_start = Instant::now();
        let clusters = self.clusterer.cluster(&embedding, &mask)?;
        timings.record_since("cluster", cluster_start);

        let resample_start = Instant::now();
        let resized = clusters.labels.resize_nearest(fit_w, fit_h);
        let lanes = resample_lanes(&resized, &clusters.instances);
        timings.record_since("resample", resample_start);

        let input = InputDescriptor {
            frame_width: frame.w,
            frame_height: frame.h,
            segmentation_width: embedding.w,
            segmentation_height: embedding.h,
            embedding_dim: embedding.dim,
            fit_width: fit_w,
            fit_height: fit_h,
        };
        let cluster_stage = ClusterStage {
            lanes: clusters.instances.len(),
            stats: clusters.stats,
            resampled_points: lanes.iter().map(|l| l.points.len()).collect(),
        };

        let (curves, fit_stage) = if lanes.is_empty() {
            debug!("LaneDetector::process no lanes, skipping transform prediction");
            (FitResult::default(), None)
        } else {
            let predict_start = Instant::now();
            let params = self.transform.predict(frame)?;
            timings.record_since("transform", predict_start);

            let fit_start = Instant::now();
            let curves = self.fitter.fit_and_project(&lanes, &params)?;
            timings.record_since("fit", fit_start);
            let stage = FitStage {
                transform: params,
                matrix: params.matrix(),
                fitted: curves.fitted_count(),
                failed: curves.failed_count(),
            };
            (curves, Some(stage))
        };

        let frame_curves = rescale_curves(&curves, (fit_w, fit_h), (frame.w, frame.h));
        timings.total_ms = elapsed_ms(total_start);
        debug!(
            "LaneDetector::process done lanes={} fitted={} latency_ms={:.3}",
            clusters.instances.len(),
            curves.fitted_count(),
            timings.total_ms
        );

        Ok(LaneReport {
            instances: clusters.instances,
            labels: clusters.labels,
            curves,
            frame_curves,
            trace: PipelineTrace {
                input,
                timings,
                cluster: cluster_stage,
                fit: fit_stage,
            },
        })
    }
}

/// One entry per clustered instance, in instance order, holding the pixels
/// of the resampled label map. Instances that vanish in the resample keep an
/// empty point list so the fitter reports them.
fn resample_lanes(resized: &LabelMap, instances: &[LaneInstance]) -> Vec<LanePoints> {
    let mut by_id: BTreeMap<LaneId, LanePoints> = resized
        .instances()
        .iter()
        .map(|inst| (inst.id, LanePoints::from(inst)))
        .collect();
    instances
        .iter()
        .map(|inst| {
            by_id.remove(&inst.id).unwrap_or(LanePoints {
                id: inst.id,
                points: Vec::new(),
            })
        })
        .collect()
}

/// Map curve points from the fit resolution to the frame.
fn rescale_curves(curves: &FitResult, from: (usize, usize), to: (usize, usize)) -> Vec<LaneCurve> {
    let scale = rescale_homography_image_space(&Matrix3::identity(), from.0, from.1, to.0, to.1);
    curves
        .curves
        .iter()
        .map(|curve| LaneCurve {
            points: apply_homography_points(&scale, &curve.points).unwrap_or_default(),
            ..curve.clone()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::ClusterParams;
    use crate::fit::FitParams;
    use crate::homography::TransformParams;
    use crate::image::{EmbeddingMap, ForegroundMask, RgbImage};
    use crate::predict::{FixedTransform, FnTransformPredictor, RecordedSegmentation};

    fn two_stripes(w: usize, h: usize) -> RecordedSegmentation {
        let mut embedding = EmbeddingMap::new(w, h, 2);
        let mask =
            ForegroundMask::from_fn(w, h, |x, _| (18..=21).contains(&x) || (98..=101).contains(&x));
        for y in 0..h {
            for x in 0..w {
                let v = embedding.vector_mut(x, y);
                if x < w / 2 {
                    v[0] = 0.05 * (x % 2) as f32;
                } else {
                    v[0] = 5.0;
                    v[1] = 0.05 * (y % 2) as f32;
                }
            }
        }
        RecordedSegmentation { embedding, mask }
    }

    fn params() -> LaneParams {
        LaneParams {
            cluster: ClusterParams::new(4, 1.5),
            fit: FitParams::new(1),
            fit_resolution: None,
        }
    }

    #[test]
    fn finds_two_vertical_lanes() {
        let frame = RgbImage::new(128, 64);
        let detector = LaneDetector::new(
            params(),
            two_stripes(128, 64),
            FixedTransform {
                params: TransformParams::identity(),
                input_size: (128, 64),
            },
        )
        .unwrap();
        let report = detector.process(&frame.as_view()).unwrap();
        assert_eq!(report.instances.len(), 2);
        assert_eq!(report.curves.fitted_count(), 2);
        let lane_a = report.curves.curve(1).unwrap();
        let lane_b = report.curves.curve(2).unwrap();
        assert!(lane_a.points.iter().all(|p| (p[0] - 19.5).abs() <= 2.0));
        assert!(lane_b.points.iter().all(|p| (p[0] - 99.5).abs() <= 2.0));
        assert!(report.trace.fit.is_some());
        assert!(report.trace.timings.stage_ms("cluster").is_some());
    }

    #[test]
    fn frame_curves_are_rescaled_to_frame() {
        let frame = RgbImage::new(256, 128);
        let detector = LaneDetector::new(
            params(),
            two_stripes(128, 64),
            FixedTransform {
                params: TransformParams::identity(),
                input_size: (128, 64),
            },
        )
        .unwrap();
        let report = detector.process(&frame.as_view()).unwrap();
        for (fit, scaled) in report.curves.curves.iter().zip(&report.frame_curves) {
            assert_eq!(fit.id, scaled.id);
            for (a, b) in fit.points.iter().zip(&scaled.points) {
                assert!((a[0] * 2.0 - b[0]).abs() < 1e-3);
                assert!((a[1] * 2.0 - b[1]).abs() < 1e-3);
            }
        }
    }

    #[test]
    fn empty_mask_skips_transform_prediction() {
        let frame = RgbImage::new(32, 16);
        let segmentation = RecordedSegmentation {
            embedding: EmbeddingMap::new(32, 16, 4),
            mask: ForegroundMask::new(32, 16),
        };
        let transform = FnTransformPredictor::new((32, 16), |_: &RgbImageView<'_>| {
            Err(LaneError::Predictor("must not be called".into()))
        });
        let detector = LaneDetector::new(params(), segmentation, transform).unwrap();
        let report = detector.process(&frame.as_view()).unwrap();
        assert!(report.instances.is_empty());
        assert!(report.curves.is_empty());
        assert!(report.frame_curves.is_empty());
        assert!(report.trace.fit.is_none());
    }

    #[test]
    fn degenerate_transform_fails_the_call() {
        let frame = RgbImage::new(128, 64);
        let detector = LaneDetector::new(
            params(),
            two_stripes(128, 64),
            FixedTransform {
                params: TransformParams::new([0.0; 6]),
                input_size: (128, 64),
            },
        )
        .unwrap();
        let err = detector.process(&frame.as_view()).unwrap_err();
        assert!(matches!(err, LaneError::DegenerateTransform { .. }));
    }

    #[test]
    fn mismatched_segmentation_is_rejected() {
        let frame = RgbImage::new(8, 8);
        let segmentation = RecordedSegmentation {
            embedding: EmbeddingMap::new(8, 8, 2),
            mask: ForegroundMask::new(8, 4),
        };
        let detector = LaneDetector::new(
            params(),
            segmentation,
            FixedTransform {
                params: TransformParams::identity(),
                input_size: (8, 8),
            },
        )
        .unwrap();
        assert!(matches!(
            detector.process(&frame.as_view()),
            Err(LaneError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn lane_lost_in_resample_is_reported_as_failed() {
        let frame = RgbImage::new(64, 64);
        let mut embedding = EmbeddingMap::new(64, 64, 1);
        embedding.vector_mut(33, 10)[0] = 10.0;
        // column 8 survives the 4x decimation, column 33 does not
        let mask = ForegroundMask::from_fn(64, 64, |x, y| x == 8 || (x == 33 && y == 10));
        let detector = LaneDetector::new(
            LaneParams {
                fit_resolution: Some((16, 16)),
                ..params()
            },
            RecordedSegmentation { embedding, mask },
            FixedTransform {
                params: TransformParams::identity(),
                input_size: (64, 64),
            },
        )
        .unwrap();
        let report = detector.process(&frame.as_view()).unwrap();
        assert_eq!(report.instances.len(), 2);
        assert_eq!(report.curves.curves.len(), 2);
        let lost = report.curves.curve(2).unwrap();
        assert!(!lost.is_fitted());
        assert!(lost.points.is_empty());
        assert_eq!(report.trace.cluster.resampled_points[1], 0);
    }
}
