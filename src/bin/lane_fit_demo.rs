use lane_detector::cluster::{blend_overlay, lane_color, paint_points, render_overlay};
use lane_detector::config::demo::{self, FrameDump};
use lane_detector::image::io::{load_rgb_image, read_json_file, save_rgb_png, write_json_file};
use lane_detector::image::RgbImage;
use lane_detector::LaneDetector;
use std::env;
use std::path::Path;

const OVERLAY_ALPHA: f32 = 0.6;
const POINT_RADIUS: i32 = 2;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = demo::load_config(Path::new(&config_path))?;

    let dump: FrameDump = read_json_file(&config.frame)?;
    let (dump_w, dump_h) = (dump.width, dump.height);
    let (segmentation, transform) = dump.into_predictors().map_err(|e| e.to_string())?;

    let frame = match &config.image {
        Some(path) => load_rgb_image(path)?,
        None => RgbImage::new(dump_w, dump_h),
    };

    let detector =
        LaneDetector::new(config.params, segmentation, transform).map_err(|e| e.to_string())?;
    let report = detector
        .process(&frame.as_view())
        .map_err(|e| e.to_string())?;

    println!(
        "frame {}x{}: {} lanes, {} fitted, {:.3} ms",
        frame.w,
        frame.h,
        report.instances.len(),
        report.curves.fitted_count(),
        report.trace.timings.total_ms
    );
    for curve in &report.frame_curves {
        match &curve.failure {
            None => println!(
                "  lane {}: {} points, rms {:.3}",
                curve.id,
                curve.points.len(),
                curve.rms_residual.unwrap_or(0.0)
            ),
            Some(failure) => println!("  lane {}: {}", curve.id, failure),
        }
    }

    if let Some(path) = &config.output.json_out {
        write_json_file(path, &report)?;
        println!("Saved report to {}", path.display());
    }

    if let Some(path) = &config.output.overlay_png {
        let overlay = render_overlay(&report.labels);
        let mut blended = blend_overlay(&frame.as_view(), &overlay, OVERLAY_ALPHA);
        for curve in &report.frame_curves {
            paint_points(&mut blended, &curve.points, POINT_RADIUS, lane_color(curve.id));
        }
        save_rgb_png(&blended, path)?;
        println!("Saved overlay to {}", path.display());
    }

    Ok(())
}

fn usage() -> String {
    "Usage: lane_fit_demo <config.json>".to_string()
}
