//! Lane instance clustering in embedding space.
//!
//! Overview
//! - Foreground pixels (mask non-zero) below a fixed top band form a pool.
//! - Groups are formed one at a time from the first pooled pixel in raster
//!   order; every pooled pixel within `distance_threshold` of the centre joins.
//! - Grouping stops at `max_lanes`; anything left over is noise and keeps
//!   the background label.
//!
//! Modules
//! - [`options`] – [`ClusterParams`] and validation.
//! - `seeded` – the [`InstanceClusterer`] itself.
//! - [`overlay`] – colour rendering of label maps.

pub mod options;
pub mod overlay;
mod seeded;

pub use options::ClusterParams;
pub use overlay::{blend_overlay, lane_color, paint_points, render_overlay, LANE_PALETTE};
pub use seeded::{ClusterResult, ClusterStats, InstanceClusterer};

use crate::error::LaneError;
use crate::image::{EmbeddingMap, ForegroundMask};

/// Cluster `mask` pixels by embedding similarity with no top band and no
/// mean refinement.
///
/// Every foreground row is eligible. Callers that want the horizon/hood
/// prior of dropping the top rows must build an [`InstanceClusterer`] with
/// [`ClusterParams::with_top_band_rows`] (the detector does this through
/// its `ClusterParams`, default 65 rows).
///
/// Zero foreground pixels give an empty result, not an error.
pub fn cluster(
    embedding: &EmbeddingMap,
    mask: &ForegroundMask,
    max_lanes: usize,
    distance_threshold: f32,
) -> Result<ClusterResult, LaneError> {
    InstanceClusterer::new(ClusterParams::new(max_lanes, distance_threshold))?
        .cluster(embedding, mask)
}
