use crate::error::LaneError;

/// Binary foreground mask, one byte per pixel, non-zero marks a lane pixel.
#[derive(Clone, Debug)]
pub struct ForegroundMask {
    pub w: usize,
    pub h: usize,
    data: Vec<u8>,
}

impl ForegroundMask {
    /// All-background mask.
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            data: vec![0; w * h],
        }
    }

    pub fn from_vec(w: usize, h: usize, data: Vec<u8>) -> Result<Self, LaneError> {
        if data.len() != w * h {
            return Err(LaneError::InvalidBuffer {
                expected: w * h,
                got: data.len(),
            });
        }
        Ok(Self { w, h, data })
    }

    pub fn from_fn(w: usize, h: usize, mut f: impl FnMut(usize, usize) -> bool) -> Self {
        let mut data = Vec::with_capacity(w * h);
        for y in 0..h {
            for x in 0..w {
                data.push(u8::from(f(x, y)));
            }
        }
        Self { w, h, data }
    }

    /// Per-pixel argmax over the two-class classifier output: a pixel is
    /// foreground when its lane score beats its background score.
    pub fn from_logits(
        w: usize,
        h: usize,
        background: &[f32],
        lane: &[f32],
    ) -> Result<Self, LaneError> {
        for plane in [background, lane] {
            if plane.len() != w * h {
                return Err(LaneError::InvalidBuffer {
                    expected: w * h,
                    got: plane.len(),
                });
            }
        }
        let data = background
            .iter()
            .zip(lane)
            .map(|(&bg, &fg)| u8::from(fg > bg))
            .collect();
        Ok(Self { w, h, data })
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.data[y * self.w + x] != 0
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, on: bool) {
        self.data[y * self.w + x] = u8::from(on);
    }

    /// Number of foreground pixels.
    pub fn count(&self) -> usize {
        self.data.iter().filter(|&&v| v != 0).count()
    }
}

impl crate::image::traits::ImageView for ForegroundMask {
    type Pixel = u8;

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
    fn row(&self, y: usize) -> &[u8] {
        let start = y * self.w;
        &self.data[start..start + self.w]
    }
    #[inline]
    fn as_slice(&self) -> Option<&[u8]> {
        Some(&self.data)
    }
}
