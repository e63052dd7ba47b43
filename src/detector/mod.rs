//! Lane detector orchestrating the per-frame pipeline.
//!
//! Overview
//! - An injected [`LaneSegmenter`](crate::predict::LaneSegmenter) produces an
//!   embedding map and a foreground mask for the frame.
//! - The [`InstanceClusterer`](crate::cluster::InstanceClusterer) partitions
//!   the foreground into lane instances.
//! - The label map is resampled (nearest neighbour) to the resolution the
//!   transform predictor works in.
//! - An injected [`TransformPredictor`](crate::predict::TransformPredictor)
//!   yields the six transform coefficients and the
//!   [`CurveFitter`](crate::fit::CurveFitter) fits each lane.
//! - Curves are finally rescaled to frame coordinates.
//!
//! Modules
//! - [`params`] – configuration types used by the detector and the demo.
//! - `pipeline` – the main [`LaneDetector`] implementation.

pub mod params;
mod pipeline;

pub use params::LaneParams;
pub use pipeline::LaneDetector;
