//! Configuration and input format of the `lane_fit_demo` tool.
//!
//! The demo replays a recorded network output (a [`FrameDump`]) through the
//! clustering and fitting stages, so no model runtime is needed.

use crate::detector::LaneParams;
use crate::error::LaneError;
use crate::homography::TransformParams;
use crate::image::{EmbeddingMap, ForegroundMask};
use crate::predict::{FixedTransform, RecordedSegmentation};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Default, Deserialize)]
pub struct OutputConfig {
    /// Where to write the JSON report.
    pub json_out: Option<PathBuf>,
    /// Where to write the lane overlay; needs `image`.
    pub overlay_png: Option<PathBuf>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RuntimeConfig {
    /// Recorded network output, see [`FrameDump`].
    pub frame: PathBuf,
    /// Optional RGB frame the dump was produced from.
    #[serde(default)]
    pub image: Option<PathBuf>,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub params: LaneParams,
}

/// Recorded segmentation and transform prediction for one frame.
///
/// `embedding` is row-major `(height, width, dim)`, `mask` holds one byte
/// per pixel and `transform_size` is the `[width, height]` the transform was
/// predicted for.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameDump {
    pub width: usize,
    pub height: usize,
    pub dim: usize,
    pub embedding: Vec<f32>,
    pub mask: Vec<u8>,
    pub transform: [f32; 6],
    pub transform_size: [usize; 2],
}

impl FrameDump {
    /// Validate the buffers and wrap them as replaying predictors.
    pub fn into_predictors(self) -> Result<(RecordedSegmentation, FixedTransform), LaneError> {
        let embedding = EmbeddingMap::from_vec(self.width, self.height, self.dim, self.embedding)?;
        let mask = ForegroundMask::from_vec(self.width, self.height, self.mask)?;
        let transform = FixedTransform {
            params: TransformParams::new(self.transform),
            input_size: (self.transform_size[0], self.transform_size[1]),
        };
        Ok((RecordedSegmentation { embedding, mask }, transform))
    }
}

pub fn load_config(path: &Path) -> Result<RuntimeConfig, String> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    let config: RuntimeConfig = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_uses_defaults() {
        let config: RuntimeConfig = serde_json::from_str(r#"{ "frame": "dump.json" }"#).unwrap();
        assert_eq!(config.frame, PathBuf::from("dump.json"));
        assert!(config.image.is_none());
        assert!(config.output.json_out.is_none());
        assert_eq!(config.params.cluster.top_band_rows, 65);
    }

    #[test]
    fn load_config_reports_missing_file() {
        let err = load_config(Path::new("/nonexistent/lane_fit_demo.json")).unwrap_err();
        assert!(err.contains("Failed to read config"));
    }

    #[test]
    fn frame_dump_checks_buffer_sizes() {
        let dump: FrameDump = serde_json::from_str(
            r#"{
                "width": 2, "height": 1, "dim": 2,
                "embedding": [0.0, 0.0, 1.0],
                "mask": [1, 1],
                "transform": [1.0, 0.0, 0.0, 1.0, 0.0, 0.0],
                "transformSize": [2, 1]
            }"#,
        )
        .unwrap();
        assert_eq!(
            dump.into_predictors().unwrap_err(),
            LaneError::InvalidBuffer {
                expected: 4,
                got: 3
            }
        );
    }
}
