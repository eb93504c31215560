//! Ground-truth evaluation of detected line images.
//!
//! Each ground-truth line is greedily matched with the detected line that
//! maximizes ink overlap; the matching is deliberately not a bijection, so a
//! single detected line may absorb several ground-truth lines when the
//! segmenter under-splits. All rates are computed over ink pixels only.

use crate::image::u8::{GrayU8, INK};
use log::debug;
use serde::Serialize;

/// One ground-truth line matched against its best detected line.
#[derive(Clone, Debug, Serialize)]
pub struct LineMatch {
    pub groundtruth: String,
    pub detected: String,
    /// Ink intersection over ink union.
    pub hit_rate: f64,
    /// Ink intersection over ground-truth ink.
    pub detection_gt: f64,
    /// Ink intersection over detected ink.
    pub detection_result: f64,
}

impl LineMatch {
    /// A line counts as correctly detected when both detection rates reach
    /// 0.9.
    pub fn correctly_detected(&self) -> bool {
        self.detection_gt >= 0.9 && self.detection_result >= 0.9
    }
}

/// Page-level summary, averaged over the ground-truth lines.
#[derive(Clone, Debug, Default, Serialize)]
pub struct PageStats {
    pub matches: Vec<LineMatch>,
    pub avg_hit_rate: f64,
    pub avg_detection_gt: f64,
    pub avg_detection_result: f64,
    pub correctly_detected: usize,
    pub groundtruth_lines: usize,
}

/// Ink intersection and union of two line images.
///
/// Detected and ground-truth crops may differ in size; pixels outside the
/// common region count towards the union of whichever image holds them.
fn ink_overlap(a: &GrayU8, b: &GrayU8) -> (usize, usize) {
    let w = a.w.min(b.w);
    let h = a.h.min(b.h);
    let mut intersection = 0usize;
    let mut union = 0usize;
    for row in 0..h {
        for col in 0..w {
            let a_ink = a.get(row, col) == INK;
            let b_ink = b.get(row, col) == INK;
            if a_ink && b_ink {
                intersection += 1;
            }
            if a_ink || b_ink {
                union += 1;
            }
        }
    }
    let outside = |img: &GrayU8| {
        let mut n = 0usize;
        for row in 0..img.h {
            for col in 0..img.w {
                if (row >= h || col >= w) && img.get(row, col) == INK {
                    n += 1;
                }
            }
        }
        n
    };
    union += outside(a) + outside(b);
    (intersection, union)
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

/// Match every ground-truth line against the detected lines and aggregate.
pub fn evaluate_page(
    detected: &[(String, GrayU8)],
    groundtruth: &[(String, GrayU8)],
) -> PageStats {
    let mut stats = PageStats {
        groundtruth_lines: groundtruth.len(),
        ..Default::default()
    };
    if groundtruth.is_empty() {
        return stats;
    }

    for (gt_name, gt_image) in groundtruth {
        let gt_ink = gt_image.count_ink();
        let mut best: Option<LineMatch> = None;
        for (det_name, det_image) in detected {
            let (intersection, union) = ink_overlap(det_image, gt_image);
            let candidate = LineMatch {
                groundtruth: gt_name.clone(),
                detected: det_name.clone(),
                hit_rate: ratio(intersection, union),
                detection_gt: ratio(intersection, gt_ink),
                detection_result: ratio(intersection, det_image.count_ink()),
            };
            let improves = best
                .as_ref()
                .is_none_or(|b| candidate.hit_rate > b.hit_rate);
            if improves {
                best = Some(candidate);
            }
        }
        if let Some(m) = best {
            debug!(
                "evaluate_page: {} -> {} hit_rate={:.3}",
                m.groundtruth, m.detected, m.hit_rate
            );
            stats.matches.push(m);
        }
    }

    let n = groundtruth.len() as f64;
    stats.avg_hit_rate = stats.matches.iter().map(|m| m.hit_rate).sum::<f64>() / n;
    stats.avg_detection_gt = stats.matches.iter().map(|m| m.detection_gt).sum::<f64>() / n;
    stats.avg_detection_result =
        stats.matches.iter().map(|m| m.detection_result).sum::<f64>() / n;
    stats.correctly_detected = stats
        .matches
        .iter()
        .filter(|m| m.correctly_detected())
        .count();
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::u8::BACKGROUND;

    fn line_with_ink(cols: std::ops::Range<usize>) -> GrayU8 {
        let mut img = GrayU8::filled(10, 4, BACKGROUND);
        for col in cols {
            img.set(1, col, INK);
        }
        img
    }

    #[test]
    fn identical_images_score_perfectly() {
        let gt = vec![("gt_0".to_string(), line_with_ink(0..10))];
        let det = vec![("line_0".to_string(), line_with_ink(0..10))];
        let stats = evaluate_page(&det, &gt);
        assert_eq!(stats.matches.len(), 1);
        assert_eq!(stats.avg_hit_rate, 1.0);
        assert_eq!(stats.correctly_detected, 1);
    }

    #[test]
    fn best_overlap_wins_the_match() {
        let gt = vec![("gt_0".to_string(), line_with_ink(0..8))];
        let det = vec![
            ("line_0".to_string(), line_with_ink(6..10)),
            ("line_1".to_string(), line_with_ink(0..7)),
        ];
        let stats = evaluate_page(&det, &gt);
        assert_eq!(stats.matches[0].detected, "line_1");
    }

    #[test]
    fn matching_is_not_a_bijection() {
        let whole = line_with_ink(0..10);
        let gt = vec![
            ("gt_0".to_string(), line_with_ink(0..5)),
            ("gt_1".to_string(), line_with_ink(5..10)),
        ];
        let det = vec![("line_0".to_string(), whole)];
        let stats = evaluate_page(&det, &gt);
        assert_eq!(stats.matches.len(), 2);
        assert!(stats.matches.iter().all(|m| m.detected == "line_0"));
    }

    #[test]
    fn size_mismatch_counts_outside_ink_in_the_union() {
        let gt = vec![("gt_0".to_string(), line_with_ink(0..10))];
        let mut small = GrayU8::filled(5, 4, BACKGROUND);
        for col in 0..5 {
            small.set(1, col, INK);
        }
        let det = vec![("line_0".to_string(), small)];
        let stats = evaluate_page(&det, &gt);
        let m = &stats.matches[0];
        assert_eq!(m.hit_rate, 0.5);
        assert_eq!(m.detection_gt, 0.5);
        assert_eq!(m.detection_result, 1.0);
    }

    #[test]
    fn no_groundtruth_gives_empty_stats() {
        let stats = evaluate_page(&[], &[]);
        assert!(stats.matches.is_empty());
        assert_eq!(stats.groundtruth_lines, 0);
    }
}
