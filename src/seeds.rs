//! Seed-row selection from the horizontal ink projection profile.
//!
//! The planner needs one seed row per candidate line separator. The profile
//! counts ink pixels per row, a box filter smooths stroke-level noise, and
//! rows of low ink density between consecutive text bands become the seeds.
//! The planner is free to deviate from the seed row; the seed only anchors
//! the deviation term of the cost model.

use crate::image::u8::{GrayU8, INK};
use crate::image::ImageView;
use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedParams {
    /// Box-filter radius applied to the row profile.
    pub smooth_radius: usize,
    /// Fraction of the profile peak below which a row counts as whitespace.
    pub band_threshold: f32,
    /// Runs of dense rows shorter than this are not considered text bands.
    pub min_band_height: usize,
}

impl Default for SeedParams {
    fn default() -> Self {
        Self {
            smooth_radius: 4,
            band_threshold: 0.05,
            min_band_height: 3,
        }
    }
}

/// Number of ink pixels per row.
pub fn ink_profile(raster: &GrayU8) -> Vec<u32> {
    raster
        .rows()
        .map(|row| row.iter().filter(|&&v| v == INK).count() as u32)
        .collect()
}

/// Box-average of the profile with a window clamped at the page edges.
pub fn smooth_profile(profile: &[u32], radius: usize) -> Vec<f32> {
    let n = profile.len();
    let mut out = vec![0.0f32; n];
    for (i, dst) in out.iter_mut().enumerate() {
        let lo = i.saturating_sub(radius);
        let hi = (i + radius + 1).min(n);
        let sum: u32 = profile[lo..hi].iter().sum();
        *dst = sum as f32 / (hi - lo) as f32;
    }
    out
}

/// Seed rows between consecutive text bands, top to bottom.
///
/// Returns one row per inter-band gap: the whitespace valley with the least
/// smoothed ink density (the middle row when the valley is flat). A page with
/// fewer than two text bands has no separators.
pub fn separator_rows(raster: &GrayU8, params: &SeedParams) -> Vec<usize> {
    let profile = ink_profile(raster);
    let smoothed = smooth_profile(&profile, params.smooth_radius);
    let peak = smoothed.iter().cloned().fold(0.0f32, f32::max);
    if peak <= 0.0 {
        return Vec::new();
    }
    let threshold = params.band_threshold * peak;

    let bands = text_bands(&smoothed, threshold, params.min_band_height);
    debug!(
        "separator_rows: {} text bands over {} rows (threshold {threshold:.2})",
        bands.len(),
        raster.h
    );

    bands
        .windows(2)
        .map(|pair| valley_row(&smoothed, pair[0].1, pair[1].0))
        .collect()
}

/// Maximal runs of rows with smoothed density above `threshold`, as
/// `(first_row, last_row)` pairs, keeping only runs at least `min_height`
/// tall.
fn text_bands(smoothed: &[f32], threshold: f32, min_height: usize) -> Vec<(usize, usize)> {
    let mut bands = Vec::new();
    let mut run_start: Option<usize> = None;
    for (row, &value) in smoothed.iter().enumerate() {
        if value > threshold {
            run_start.get_or_insert(row);
        } else if let Some(start) = run_start.take() {
            if row - start >= min_height {
                bands.push((start, row - 1));
            }
        }
    }
    if let Some(start) = run_start {
        if smoothed.len() - start >= min_height {
            bands.push((start, smoothed.len() - 1));
        }
    }
    bands
}

/// The row of least smoothed density strictly between two bands; the middle
/// of the flattest stretch when several rows tie.
fn valley_row(smoothed: &[f32], upper_band_end: usize, lower_band_start: usize) -> usize {
    let lo = upper_band_end + 1;
    let hi = lower_band_start;
    if lo >= hi {
        return upper_band_end;
    }
    let gap = &smoothed[lo..hi];
    let min = gap.iter().cloned().fold(f32::INFINITY, f32::min);
    let ties: Vec<usize> = gap
        .iter()
        .enumerate()
        .filter(|(_, &v)| v <= min)
        .map(|(i, _)| lo + i)
        .collect();
    ties[ties.len() / 2]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::u8::BACKGROUND;

    fn page_with_bands(bands: &[(usize, usize)], w: usize, h: usize) -> GrayU8 {
        let mut img = GrayU8::filled(w, h, BACKGROUND);
        for &(top, bottom) in bands {
            for row in top..=bottom {
                for col in 0..w {
                    img.set(row, col, INK);
                }
            }
        }
        img
    }

    #[test]
    fn empty_page_has_no_separators() {
        let img = GrayU8::filled(16, 32, BACKGROUND);
        assert!(separator_rows(&img, &SeedParams::default()).is_empty());
    }

    #[test]
    fn single_band_has_no_separators() {
        let img = page_with_bands(&[(10, 20)], 16, 40);
        assert!(separator_rows(&img, &SeedParams::default()).is_empty());
    }

    #[test]
    fn two_bands_yield_one_seed_in_the_gap() {
        let img = page_with_bands(&[(5, 12), (28, 35)], 24, 48);
        let seeds = separator_rows(&img, &SeedParams::default());
        assert_eq!(seeds.len(), 1);
        assert!(
            seeds[0] > 12 && seeds[0] < 28,
            "seed {} not inside the gap",
            seeds[0]
        );
    }

    #[test]
    fn three_bands_yield_two_ordered_seeds() {
        let img = page_with_bands(&[(4, 10), (20, 26), (36, 42)], 24, 50);
        let seeds = separator_rows(&img, &SeedParams::default());
        assert_eq!(seeds.len(), 2);
        assert!(seeds[0] < seeds[1]);
    }

    #[test]
    fn profile_counts_ink_per_row() {
        let mut img = GrayU8::filled(4, 3, BACKGROUND);
        img.set(1, 0, INK);
        img.set(1, 2, INK);
        assert_eq!(ink_profile(&img), vec![0, 2, 0]);
    }

    #[test]
    fn smoothing_averages_over_the_window() {
        let smoothed = smooth_profile(&[0, 6, 0], 1);
        assert_eq!(smoothed, vec![3.0, 2.0, 3.0]);
    }
}
