//! Colour rendering of a lane partition for visual inspection.

use crate::image::{ImageView, ImageViewMut, LabelMap, Rgb, RgbImage, RgbImageView};
use crate::types::{LaneId, BACKGROUND};

/// Background first, then the colours lanes cycle through.
pub const LANE_PALETTE: [Rgb; 6] = [
    [0, 0, 0],
    [255, 0, 0],
    [0, 255, 0],
    [0, 0, 255],
    [255, 215, 0],
    [0, 255, 255],
];

#[inline]
pub fn lane_color(id: LaneId) -> Rgb {
    if id == BACKGROUND {
        LANE_PALETTE[0]
    } else {
        let lanes = LANE_PALETTE.len() - 1;
        LANE_PALETTE[1 + (id as usize - 1) % lanes]
    }
}

/// Paint every labelled pixel with its lane colour on black.
pub fn render_overlay(labels: &LabelMap) -> RgbImage {
    let mut out = RgbImage::new(labels.w, labels.h);
    for (y, row) in labels.rows().enumerate() {
        for (px, &id) in out.row_mut(y).iter_mut().zip(row) {
            if id != BACKGROUND {
                *px = lane_color(id);
            }
        }
    }
    out
}

/// Mix `alpha * frame + (1 - alpha) * overlay` per channel, rounding to the
/// nearest integer. The overlay is sampled nearest-neighbour when its size
/// differs from the frame.
pub fn blend_overlay(frame: &RgbImageView<'_>, overlay: &RgbImage, alpha: f32) -> RgbImage {
    let alpha = alpha.clamp(0.0, 1.0);
    let mut out = RgbImage::new(frame.w, frame.h);
    if overlay.w == 0 || overlay.h == 0 {
        for y in 0..frame.h {
            out.row_mut(y).copy_from_slice(frame.row(y));
        }
        return out;
    }
    let sx = overlay.w as f32 / frame.w.max(1) as f32;
    let sy = overlay.h as f32 / frame.h.max(1) as f32;
    for y in 0..frame.h {
        let oy = ((y as f32 * sy) as usize).min(overlay.h - 1);
        for x in 0..frame.w {
            let ox = ((x as f32 * sx) as usize).min(overlay.w - 1);
            let f = frame.get(x, y);
            let o = overlay.get(ox, oy);
            let mut px = [0u8; 3];
            for c in 0..3 {
                let v = alpha * f[c] as f32 + (1.0 - alpha) * o[c] as f32;
                px[c] = v.round().clamp(0.0, 255.0) as u8;
            }
            out.set(x, y, px);
        }
    }
    out
}

/// Draw filled discs of `radius` pixels at each point, clipped to the image.
pub fn paint_points(image: &mut RgbImage, points: &[[f32; 2]], radius: i32, color: Rgb) {
    let r2 = radius * radius;
    for p in points {
        if !p[0].is_finite() || !p[1].is_finite() {
            continue;
        }
        let cx = p[0].round() as i64;
        let cy = p[1].round() as i64;
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx * dx + dy * dy > r2 {
                    continue;
                }
                let x = cx + dx as i64;
                let y = cy + dy as i64;
                if x >= 0 && y >= 0 && (x as usize) < image.w && (y as usize) < image.h {
                    image.set(x as usize, y as usize, color);
                }
            }
        }
    }
}
