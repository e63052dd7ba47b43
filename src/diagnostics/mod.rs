//! Diagnostics returned alongside detector results.
//!
//! `LaneReport` is the main entry point: the lane partition, the fitted
//! curves in both coordinate frames, and a `PipelineTrace` with stage
//! summaries and timings.

pub mod pipeline;
pub mod timing;

pub use pipeline::{ClusterStage, FitStage, InputDescriptor, LaneReport, PipelineTrace};
pub use timing::{elapsed_ms, StageTiming, TimingBreakdown};
