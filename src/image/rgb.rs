//! 8-bit RGB frames: a borrowed view for predictor input and an owned buffer
//! for rendered overlays.
use crate::error::LaneError;

pub type Rgb = [u8; 3];

#[derive(Clone, Debug)]
pub struct RgbImageView<'a> {
    pub w: usize,
    pub h: usize,
    pub stride: usize, // pixels between rows
    pub data: &'a [Rgb],
}

impl<'a> RgbImageView<'a> {
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Rgb {
        self.data[y * self.stride + x]
    }
}

impl<'a> crate::image::traits::ImageView for RgbImageView<'a> {
    type Pixel = Rgb;

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
        self.stride
    }
    #[inline]
    fn row(&self, y: usize) -> &[Rgb] {
        let start = y * self.stride;
        &self.data[start..start + self.w]
    }
    #[inline]
    fn as_slice(&self) -> Option<&[Rgb]> {
        (self.stride == self.w).then_some(&self.data[..self.w * self.h])
    }
}

/// Owned, tightly packed RGB buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RgbImage {
    pub w: usize,
    pub h: usize,
    pub data: Vec<Rgb>,
}

impl RgbImage {
    /// Black image of size `w × h`.
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            data: vec![[0; 3]; w * h],
        }
    }

    /// Build from interleaved `RGBRGB…` bytes.
    pub fn from_interleaved(w: usize, h: usize, bytes: &[u8]) -> Result<Self, LaneError> {
        if bytes.len() != w * h * 3 {
            return Err(LaneError::InvalidBuffer {
                expected: w * h * 3,
                got: bytes.len(),
            });
        }
        let data = bytes.chunks_exact(3).map(|c| [c[0], c[1], c[2]]).collect();
        Ok(Self { w, h, data })
    }

    pub fn to_interleaved(&self) -> Vec<u8> {
        self.data.iter().flat_map(|px| px.iter().copied()).collect()
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Rgb {
        self.data[y * self.w + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, px: Rgb) {
        let i = y * self.w + x;
        self.data[i] = px;
    }

    pub fn as_view(&self) -> RgbImageView<'_> {
        RgbImageView {
            w: self.w,
            h: self.h,
            stride: self.w,
            data: &self.data,
        }
    }
}

impl crate::image::traits::ImageView for RgbImage {
    type Pixel = Rgb;

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
    fn row(&self, y: usize) -> &[Rgb] {
        let start = y * self.w;
        &self.data[start..start + self.w]
    }
    #[inline]
    fn as_slice(&self) -> Option<&[Rgb]> {
        Some(&self.data)
    }
}

impl crate::image::traits::ImageViewMut for RgbImage {
    #[inline]
    fn row_mut(&mut self, y: usize) -> &mut [Rgb] {
        let start = y * self.w;
        &mut self.data[start..start + self.w]
    }

    #[inline]
    fn as_mut_slice(&mut self) -> Option<&mut [Rgb]> {
        Some(&mut self.data)
    }
}
