use lane_detector::image::{EmbeddingMap, ForegroundMask, RgbImage};
use lane_detector::predict::{FixedTransform, RecordedSegmentation};
use lane_detector::{LaneDetector, LaneParams, TransformParams};

fn main() {
    // Demo stub: two synthetic vertical lanes with separated embeddings
    let w = 128usize;
    let h = 64usize;
    let mut embedding = EmbeddingMap::new(w, h, 2);
    for y in 0..h {
        for x in w / 2..w {
            embedding.vector_mut(x, y)[0] = 5.0;
        }
    }
    let mask = ForegroundMask::from_fn(w, h, |x, _| x == 20 || x == 100);

    let params = LaneParams {
        cluster: lane_detector::ClusterParams::new(4, 1.5),
        ..Default::default()
    };
    let detector = match LaneDetector::new(
        params,
        RecordedSegmentation { embedding, mask },
        FixedTransform {
            params: TransformParams::identity(),
            input_size: (w, h),
        },
    ) {
        Ok(d) => d,
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    };

    let frame = RgbImage::new(w, h);
    match detector.process(&frame.as_view()) {
        Ok(report) => println!(
            "lanes={} fitted={} latency_ms={:.3}",
            report.instances.len(),
            report.curves.fitted_count(),
            report.trace.timings.total_ms
        ),
        Err(err) => eprintln!("Error: {err}"),
    }
}
