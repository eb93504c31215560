//! Owned single-channel 8-bit raster in row-major layout (tightly packed).
//!
//! The segmentation pipeline works on semantically binary pages where `0` is
//! ink and `255` is background. `GrayU8` itself does not enforce that; the
//! ingress binarization helper in [`crate::image::io`] produces conforming
//! buffers from arbitrary grayscale scans.

/// Background pixel value in the binary page convention.
pub const BACKGROUND: u8 = 255;
/// Ink pixel value in the binary page convention.
pub const INK: u8 = 0;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrayU8 {
    /// Image width in pixels
    pub w: usize,
    /// Image height in pixels
    pub h: usize,
    /// Backing storage in row-major order, `w * h` bytes
    pub data: Vec<u8>,
}

impl GrayU8 {
    /// Construct a buffer of size `w × h` filled with `value`.
    pub fn filled(w: usize, h: usize, value: u8) -> Self {
        Self {
            w,
            h,
            data: vec![value; w * h],
        }
    }

    /// Wrap raw bytes; returns `None` when `data.len() != w * h`.
    pub fn from_raw(w: usize, h: usize, data: Vec<u8>) -> Option<Self> {
        (data.len() == w * h).then_some(Self { w, h, data })
    }

    #[inline]
    /// Convert (row, col) to a linear index into `data`.
    pub fn idx(&self, row: usize, col: usize) -> usize {
        row * self.w + col
    }

    #[inline]
    /// Get the pixel value at (row, col).
    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.data[self.idx(row, col)]
    }

    #[inline]
    /// Set the pixel value at (row, col).
    pub fn set(&mut self, row: usize, col: usize, v: u8) {
        let i = self.idx(row, col);
        self.data[i] = v;
    }

    /// Copy out the horizontal band of rows `top..bottom` at full width.
    ///
    /// An inverted or empty range yields a zero-height image.
    pub fn crop_rows(&self, top: usize, bottom: usize) -> GrayU8 {
        let bottom = bottom.min(self.h);
        if top >= bottom {
            return GrayU8 {
                w: self.w,
                h: 0,
                data: Vec::new(),
            };
        }
        let start = top * self.w;
        let end = bottom * self.w;
        GrayU8 {
            w: self.w,
            h: bottom - top,
            data: self.data[start..end].to_vec(),
        }
    }

    /// Number of ink pixels in the buffer.
    pub fn count_ink(&self) -> usize {
        self.data.iter().filter(|&&v| v == INK).count()
    }
}

impl crate::image::traits::ImageView for GrayU8 {
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
    fn row(&self, y: usize) -> &[u8] {
        let start = y * self.w;
        &self.data[start..start + self.w]
    }
}

impl crate::image::traits::ImageViewMut for GrayU8 {
    #[inline]
    fn row_mut(&mut self, y: usize) -> &mut [u8] {
        let start = y * self.w;
        let end = start + self.w;
        &mut self.data[start..end]
    }
}
