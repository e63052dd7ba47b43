use lane_detector::image::{EmbeddingMap, ForegroundMask};

/// Embedding map and mask for lanes given as `x = f(y)` centre lines.
///
/// Lane `k` covers `half_width` pixels either side of its centre on every
/// row. Its pixels embed at `[inter * k, intra * ((x + y) % 2), 0, ...]`, so
/// pixels of one lane are at most `intra` apart and distinct lanes at least
/// `inter`.
pub fn lane_scene(
    width: usize,
    height: usize,
    dim: usize,
    lanes: &[&dyn Fn(f32) -> f32],
    half_width: usize,
    intra: f32,
    inter: f32,
) -> (EmbeddingMap, ForegroundMask) {
    assert!(dim >= 2, "embedding needs at least two channels");
    let mut embedding = EmbeddingMap::new(width, height, dim);
    let mut mask = ForegroundMask::new(width, height);
    for (k, centre) in lanes.iter().enumerate() {
        for y in 0..height {
            let cx = centre(y as f32).round() as i64;
            for x in (cx - half_width as i64)..=(cx + half_width as i64) {
                if x < 0 || x as usize >= width {
                    continue;
                }
                let x = x as usize;
                mask.set(x, y, true);
                let v = embedding.vector_mut(x, y);
                v[0] = inter * k as f32;
                v[1] = intra * ((x + y) % 2) as f32;
            }
        }
    }
    (embedding, mask)
}

/// Vertical stripes centred on `columns`.
pub fn vertical_stripes(
    width: usize,
    height: usize,
    columns: &[usize],
    half_width: usize,
    intra: f32,
    inter: f32,
) -> (EmbeddingMap, ForegroundMask) {
    let centres: Vec<Box<dyn Fn(f32) -> f32>> = columns
        .iter()
        .map(|&c| Box::new(move |_y: f32| c as f32) as Box<dyn Fn(f32) -> f32>)
        .collect();
    let refs: Vec<&dyn Fn(f32) -> f32> = centres.iter().map(|b| b.as_ref()).collect();
    lane_scene(width, height, 4, &refs, half_width, intra, inter)
}
