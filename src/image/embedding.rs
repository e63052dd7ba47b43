//! Owned per-pixel embedding tensor of shape (H, W, D) in row-major layout.
//!
//! Pixel `(x, y)` owns the `dim` consecutive values starting at
//! `(y * w + x) * dim`.
use crate::error::LaneError;

#[derive(Clone, Debug)]
pub struct EmbeddingMap {
    /// Map width in pixels
    pub w: usize,
    /// Map height in pixels
    pub h: usize,
    /// Embedding dimension per pixel
    pub dim: usize,
    data: Vec<f32>,
}

impl EmbeddingMap {
    /// Zero-initialised map of size `w × h × dim`.
    pub fn new(w: usize, h: usize, dim: usize) -> Self {
        Self {
            w,
            h,
            dim,
            data: vec![0.0; w * h * dim],
        }
    }

    /// Wrap an existing (H, W, D) buffer.
    pub fn from_vec(w: usize, h: usize, dim: usize, data: Vec<f32>) -> Result<Self, LaneError> {
        let expected = w * h * dim;
        if data.len() != expected {
            return Err(LaneError::InvalidBuffer {
                expected,
                got: data.len(),
            });
        }
        Ok(Self { w, h, dim, data })
    }

    /// Convert a channel-first (D, H, W) buffer, the layout most inference
    /// runtimes emit, into the (H, W, D) layout used here.
    pub fn from_channel_first(
        w: usize,
        h: usize,
        dim: usize,
        planes: &[f32],
    ) -> Result<Self, LaneError> {
        let expected = w * h * dim;
        if planes.len() != expected {
            return Err(LaneError::InvalidBuffer {
                expected,
                got: planes.len(),
            });
        }
        let plane = w * h;
        let mut data = vec![0.0f32; expected];
        for (pixel, out) in data.chunks_exact_mut(dim.max(1)).enumerate().take(plane) {
            for (k, v) in out.iter_mut().enumerate() {
                *v = planes[k * plane + pixel];
            }
        }
        Ok(Self { w, h, dim, data })
    }

    #[inline]
    /// Linear pixel index of `(x, y)`.
    pub fn pixel_index(&self, x: usize, y: usize) -> usize {
        y * self.w + x
    }

    #[inline]
    /// Embedding vector at linear pixel index `i`.
    pub fn vector_at(&self, i: usize) -> &[f32] {
        let start = i * self.dim;
        &self.data[start..start + self.dim]
    }

    #[inline]
    /// Embedding vector at `(x, y)`.
    pub fn vector(&self, x: usize, y: usize) -> &[f32] {
        self.vector_at(self.pixel_index(x, y))
    }

    #[inline]
    pub fn vector_mut(&mut self, x: usize, y: usize) -> &mut [f32] {
        let start = self.pixel_index(x, y) * self.dim;
        &mut self.data[start..start + self.dim]
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn size(&self) -> (usize, usize) {
        (self.w, self.h)
    }
}

/// Squared Euclidean distance between two embedding vectors.
#[inline]
pub fn squared_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(p, q)| (p - q) * (p - q)).sum()
}
