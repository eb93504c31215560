//! Per-column vertical distance transform.
//!
//! For every pixel the transform records the distance, measured along its own
//! column only, to the nearest ink pixel in that column. The planner reads
//! this map as "vertical clearance": large values mean the pixel sits in the
//! middle of a tall whitespace gap, which is exactly where a line-separating
//! path should run.

use crate::image::u8::{GrayU8, INK};

/// Map entry meaning "no ink anywhere in this column" (treated as infinite
/// clearance by the grid adapter). Distances at or above this value clamp to
/// it as well.
pub const NO_INK: u8 = 255;

/// Column-wise vertical distance map, same shape as the source raster.
#[derive(Clone, Debug)]
pub struct DistanceMap {
    pub w: usize,
    pub h: usize,
    data: Vec<u8>,
}

impl DistanceMap {
    /// Build the transform for a binarized page (ink = 0, background = 255).
    ///
    /// Each column is processed independently with a forward and a backward
    /// sweep, so the whole map costs O(W · H).
    pub fn build(raster: &GrayU8) -> Self {
        let (w, h) = (raster.w, raster.h);
        let mut data = vec![NO_INK; w * h];
        let mut column = vec![u32::MAX; h];

        for col in 0..w {
            // Downward sweep: distance to the nearest ink at or above.
            let mut dist = u32::MAX;
            for row in 0..h {
                if raster.get(row, col) == INK {
                    dist = 0;
                } else if dist != u32::MAX {
                    dist += 1;
                }
                column[row] = dist;
            }
            // Upward sweep: fold in the nearest ink at or below.
            dist = u32::MAX;
            for row in (0..h).rev() {
                if raster.get(row, col) == INK {
                    dist = 0;
                } else if dist != u32::MAX {
                    dist += 1;
                }
                if dist < column[row] {
                    column[row] = dist;
                }
            }
            for row in 0..h {
                data[row * w + col] = column[row].min(NO_INK as u32) as u8;
            }
        }

        Self { w, h, data }
    }

    #[inline]
    /// Clamped 8-bit distance at (row, col); `NO_INK` is the sentinel.
    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.data[row * self.w + col]
    }
}
