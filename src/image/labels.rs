//! Lane-instance label map (one [`LaneId`] per pixel).
//!
//! The label map and the list of [`LaneInstance`]s are two views of the same
//! partition; `instances` and `from_instances` convert between them.
use crate::error::LaneError;
use crate::image::traits::{ImageView, ImageViewMut};
use crate::types::{LaneId, LaneInstance, BACKGROUND};
use std::collections::BTreeMap;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabelMap {
    pub w: usize,
    pub h: usize,
    data: Vec<LaneId>,
}

impl LabelMap {
    /// All-background map.
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            data: vec![BACKGROUND; w * h],
        }
    }

    pub fn from_vec(w: usize, h: usize, data: Vec<LaneId>) -> Result<Self, LaneError> {
        if data.len() != w * h {
            return Err(LaneError::InvalidBuffer {
                expected: w * h,
                got: data.len(),
            });
        }
        Ok(Self { w, h, data })
    }

    /// Paint every instance into a fresh map. Pixels outside the map are
    /// ignored; later instances overwrite earlier ones on overlap.
    pub fn from_instances(w: usize, h: usize, instances: &[LaneInstance]) -> Self {
        let mut map = Self::new(w, h);
        for inst in instances {
            for &[x, y] in &inst.pixels {
                if x < w && y < h {
                    map.set(x, y, inst.id);
                }
            }
        }
        map
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> LaneId {
        self.data[y * self.w + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, id: LaneId) {
        self.data[y * self.w + x] = id;
    }

    /// Non-background instances, ids ascending, pixels in raster order.
    pub fn instances(&self) -> Vec<LaneInstance> {
        let mut by_id: BTreeMap<LaneId, Vec<[usize; 2]>> = BTreeMap::new();
        for (y, row) in self.rows().enumerate() {
            for (x, &id) in row.iter().enumerate() {
                if id != BACKGROUND {
                    by_id.entry(id).or_default().push([x, y]);
                }
            }
        }
        by_id
            .into_iter()
            .map(|(id, pixels)| LaneInstance { id, pixels })
            .collect()
    }

    /// Nearest-neighbour resize: destination pixel `(x, y)` takes the label
    /// at `(floor(x * w / new_w), floor(y * h / new_h))`.
    pub fn resize_nearest(&self, new_w: usize, new_h: usize) -> LabelMap {
        let mut out = LabelMap::new(new_w, new_h);
        if self.w == 0 || self.h == 0 {
            return out;
        }
        let sx = self.w as f64 / new_w.max(1) as f64;
        let sy = self.h as f64 / new_h.max(1) as f64;
        for y in 0..new_h {
            let src_y = ((y as f64 * sy).floor() as usize).min(self.h - 1);
            let src = self.row(src_y);
            for (x, dst) in out.row_mut(y).iter_mut().enumerate() {
                let src_x = ((x as f64 * sx).floor() as usize).min(self.w - 1);
                *dst = src[src_x];
            }
        }
        out
    }

    /// Number of pixels carrying a lane label.
    pub fn labelled_count(&self) -> usize {
        self.data.iter().filter(|&&id| id != BACKGROUND).count()
    }
}

impl ImageView for LabelMap {
    type Pixel = LaneId;

    #[inline]
    fn width(&self) -> usize {
        self.w
    }
    #[inline]
    fn height(&self) -> usize {
        self.h
    }
    #[inline]
    fn stride(&self) -> usize {
        self.w
    }
    #[inline]
    fn row(&self, y: usize) -> &[LaneId] {
        let start = y * self.w;
        &self.data[start..start + self.w]
    }
    #[inline]
    fn as_slice(&self) -> Option<&[LaneId]> {
        Some(&self.data)
    }
}

impl ImageViewMut for LabelMap {
    #[inline]
    fn row_mut(&mut self, y: usize) -> &mut [LaneId] {
        let start = y * self.w;
        &mut self.data[start..start + self.w]
    }

    #[inline]
    fn as_mut_slice(&mut self) -> Option<&mut [LaneId]> {
        Some(&mut self.data)
    }
}
