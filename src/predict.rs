//! Seams for the two external predictors.
//!
//! The crate does not run neural networks. A [`LaneSegmenter`] turns a frame
//! into an embedding map plus a foreground mask, a [`TransformPredictor`]
//! turns a frame into [`TransformParams`]. Any resizing, normalisation or
//! batching those models need happens behind these traits.

use crate::error::LaneError;
use crate::homography::TransformParams;
use crate::image::{EmbeddingMap, ForegroundMask, RgbImageView};

/// Per-pixel classification + embedding predictor.
pub trait LaneSegmenter {
    fn segment(&self, frame: &RgbImageView<'_>)
        -> Result<(EmbeddingMap, ForegroundMask), LaneError>;
}

impl<F> LaneSegmenter for F
where
    F: Fn(&RgbImageView<'_>) -> Result<(EmbeddingMap, ForegroundMask), LaneError>,
{
    fn segment(
        &self,
        frame: &RgbImageView<'_>,
    ) -> Result<(EmbeddingMap, ForegroundMask), LaneError> {
        self(frame)
    }
}

/// Perspective transform regressor.
pub trait TransformPredictor {
    /// `(width, height)` of the image space the predicted transform acts on.
    fn input_size(&self) -> (usize, usize);

    fn predict(&self, frame: &RgbImageView<'_>) -> Result<TransformParams, LaneError>;
}

/// Adapter giving a closure a fixed input size.
pub struct FnTransformPredictor<F> {
    input_size: (usize, usize),
    predict: F,
}

impl<F> FnTransformPredictor<F>
where
    F: Fn(&RgbImageView<'_>) -> Result<TransformParams, LaneError>,
{
    pub fn new(input_size: (usize, usize), predict: F) -> Self {
        Self {
            input_size,
            predict,
        }
    }
}

impl<F> TransformPredictor for FnTransformPredictor<F>
where
    F: Fn(&RgbImageView<'_>) -> Result<TransformParams, LaneError>,
{
    fn input_size(&self) -> (usize, usize) {
        self.input_size
    }

    fn predict(&self, frame: &RgbImageView<'_>) -> Result<TransformParams, LaneError> {
        (self.predict)(frame)
    }
}

/// Same transform for every frame, e.g. from an offline calibration or a
/// recorded prediction.
#[derive(Clone, Copy, Debug)]
pub struct FixedTransform {
    pub params: TransformParams,
    pub input_size: (usize, usize),
}

impl TransformPredictor for FixedTransform {
    fn input_size(&self) -> (usize, usize) {
        self.input_size
    }

    fn predict(&self, _frame: &RgbImageView<'_>) -> Result<TransformParams, LaneError> {
        Ok(self.params)
    }
}

/// Segmenter that hands back a recorded prediction regardless of the frame.
#[derive(Clone, Debug)]
pub struct RecordedSegmentation {
    pub embedding: EmbeddingMap,
    pub mask: ForegroundMask,
}

impl LaneSegmenter for RecordedSegmentation {
    fn segment(
        &self,
        _frame: &RgbImageView<'_>,
    ) -> Result<(EmbeddingMap, ForegroundMask), LaneError> {
        Ok((self.embedding.clone(), self.mask.clone()))
    }
}
