mod common;

use common::init_logging;
use common::synthetic_lanes::{lane_scene, vertical_stripes};
use lane_detector::image::RgbImage;
use lane_detector::predict::{FixedTransform, RecordedSegmentation};
use lane_detector::{
    cluster, fit_and_project, ClusterParams, FitParams, LaneDetector, LaneParams, LaneTransform,
    TransformParams,
};

#[test]
fn two_stripes_give_two_vertical_lanes() {
    init_logging();
    let (embedding, mask) = vertical_stripes(128, 64, &[20, 100], 1, 0.1, 5.0);

    let clusters = cluster(&embedding, &mask, 4, 1.5).unwrap();
    assert_eq!(clusters.instances.len(), 2);

    let fitted = fit_and_project(&clusters.instances, &TransformParams::identity(), 1).unwrap();
    assert_eq!(fitted.fitted_count(), 2);
    let by_id = fitted.points_by_id();
    for (id, column) in [(1u8, 20.0f32), (2, 100.0)] {
        let points = &by_id[&id];
        assert_eq!(points.len(), FitParams::default().sample_count);
        for p in points {
            assert!(
                (p[0] - column).abs() <= 2.0,
                "lane {} point {:?} strays from x={}",
                id,
                p,
                column
            );
        }
    }
}

#[test]
fn detector_recovers_lanes_straight_in_rectified_space() {
    init_logging();
    let params = TransformParams::new([1.0, 0.3, 0.0, 1.0, 0.0, 0.002]);
    // image-space centre line of a lane at rectified x = k
    let lane_a = |y: f32| 30.0 * (1.0 + 0.002 * y) - 0.3 * y;
    let lane_b = |y: f32| 90.0 * (1.0 + 0.002 * y) - 0.3 * y;
    let centres: [&dyn Fn(f32) -> f32; 2] = [&lane_a, &lane_b];
    let (embedding, mask) = lane_scene(128, 64, 4, &centres, 1, 0.1, 5.0);

    let detector = LaneDetector::new(
        LaneParams {
            cluster: ClusterParams::new(4, 1.5),
            fit: FitParams::new(1).with_sample_count(25),
            fit_resolution: None,
        },
        RecordedSegmentation { embedding, mask },
        FixedTransform {
            params,
            input_size: (128, 64),
        },
    )
    .unwrap();
    let frame = RgbImage::new(128, 64);
    let report = detector.process(&frame.as_view()).unwrap();

    assert_eq!(report.instances.len(), 2);
    assert_eq!(report.curves.fitted_count(), 2);
    let transform = LaneTransform::from_params(&params).unwrap();
    for (id, centre) in [1u8, 2].into_iter().zip(centres) {
        let curve = report.curves.curve(id).unwrap();
        assert_eq!(curve.points.len(), 25);
        assert!(curve.rms_residual.unwrap() < 1.5);
        for p in &curve.points {
            assert!(
                (p[0] - centre(p[1])).abs() <= 2.0,
                "lane {} point {:?} expected x={}",
                id,
                p,
                centre(p[1])
            );
        }
        let rect_y: Vec<f32> = curve
            .points
            .iter()
            .map(|&p| transform.rectify(p).unwrap()[1])
            .collect();
        assert!(rect_y.windows(2).all(|w| w[0] <= w[1] + 1e-3));
    }
}

#[test]
fn detector_report_serializes_to_json() {
    init_logging();
    let (embedding, mask) = vertical_stripes(64, 32, &[10, 50], 1, 0.1, 5.0);
    let detector = LaneDetector::new(
        LaneParams {
            cluster: ClusterParams::new(4, 1.5),
            ..Default::default()
        },
        RecordedSegmentation { embedding, mask },
        FixedTransform {
            params: TransformParams::identity(),
            input_size: (64, 32),
        },
    )
    .unwrap();
    let frame = RgbImage::new(64, 32);
    let report = detector.process(&frame.as_view()).unwrap();
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["instances"].as_array().unwrap().len(), 2);
    assert_eq!(json["frameCurves"].as_array().unwrap().len(), 2);
    assert_eq!(json["trace"]["input"]["fitWidth"], 64);
    assert!(json["trace"]["fit"]["matrix"].is_array());
}

#[test]
fn default_top_band_hides_lanes_near_the_horizon() {
    init_logging();
    // stripes only in the top 40 rows of a 512x256 map
    let (embedding, mut mask) = vertical_stripes(512, 256, &[100, 400], 1, 0.1, 5.0);
    for y in 40..256 {
        for x in 0..512 {
            mask.set(x, y, false);
        }
    }
    let detector = LaneDetector::new(
        LaneParams::default(),
        RecordedSegmentation { embedding, mask },
        FixedTransform {
            params: TransformParams::identity(),
            input_size: (512, 256),
        },
    )
    .unwrap();
    let frame = RgbImage::new(512, 256);
    let report = detector.process(&frame.as_view()).unwrap();
    assert!(report.instances.is_empty());
    assert_eq!(report.trace.cluster.stats.masked_top_band, 2 * 3 * 40);
}
