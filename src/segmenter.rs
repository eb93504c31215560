//! High-level page segmentation pipeline.
//!
//! Ties the stages together for one page: distance transform, seed-row
//! selection, one A* run per separator, and projection of every band between
//! consecutive boundaries into a line image. Pages are independent; a
//! `LineSegmenter` holds only parameters and can be shared across threads.

use crate::cost::path_cost;
use crate::diagnostics::{BoundaryTrace, PageReport};
use crate::distance::DistanceMap;
use crate::grid::LineGrid;
use crate::image::u8::GrayU8;
use crate::planner::{plan, PlanError, PlanParams};
use crate::project::{project_one, project_two, write_line_image, BoundaryRole, ProjectError};
use crate::seeds::{separator_rows, SeedParams};
use crate::types::Node;
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmenterParams {
    pub plan: PlanParams,
    pub seeds: SeedParams,
}

#[derive(Clone, Debug)]
pub enum SegmentError {
    Plan(PlanError),
    Project(ProjectError),
    Io(String),
}

impl std::fmt::Display for SegmentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SegmentError::Plan(e) => write!(f, "planning failed: {e}"),
            SegmentError::Project(e) => write!(f, "projection failed: {e}"),
            SegmentError::Io(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for SegmentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SegmentError::Plan(e) => Some(e),
            SegmentError::Project(e) => Some(e),
            SegmentError::Io(_) => None,
        }
    }
}

impl From<PlanError> for SegmentError {
    fn from(e: PlanError) -> Self {
        SegmentError::Plan(e)
    }
}

impl From<ProjectError> for SegmentError {
    fn from(e: ProjectError) -> Self {
        SegmentError::Project(e)
    }
}

/// Everything produced for one page.
#[derive(Clone, Debug)]
pub struct PageSegmentation {
    /// One image per detected text line, top to bottom.
    pub lines: Vec<GrayU8>,
    /// The boundary path of each separator, top to bottom.
    pub boundaries: Vec<Vec<Node>>,
    pub report: PageReport,
}

pub struct LineSegmenter {
    params: SegmenterParams,
}

impl LineSegmenter {
    pub fn new(params: SegmenterParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &SegmenterParams {
        &self.params
    }

    /// Segment one binarized page (ink = 0, background = 255) into line
    /// images.
    ///
    /// A page with fewer than two text bands yields a single line (the whole
    /// page) when it holds any ink, and no lines at all when it is blank.
    pub fn segment_page(&self, page: &GrayU8) -> Result<PageSegmentation, SegmentError> {
        let total_start = Instant::now();

        let stage = Instant::now();
        let dmap = DistanceMap::build(page);
        let distance_ms = stage.elapsed().as_secs_f64() * 1000.0;

        let stage = Instant::now();
        let seeds = separator_rows(page, &self.params.seeds);
        let seeds_ms = stage.elapsed().as_secs_f64() * 1000.0;

        let grid = LineGrid::new(page, &dmap);
        let goal_col = self.goal_col(page.w);

        let mut boundaries = Vec::with_capacity(seeds.len());
        let mut traces = Vec::with_capacity(seeds.len());
        for &row in &seeds {
            let start = Node::new(row as i32, 0);
            let goal = Node::new(row as i32, goal_col);
            let stage = Instant::now();
            let planned = plan(&grid, start, goal, &self.params.plan)?;
            let plan_ms = stage.elapsed().as_secs_f64() * 1000.0;
            traces.push(BoundaryTrace {
                seed_row: row,
                path_len: planned.nodes.len(),
                expanded: planned.expanded,
                cost: path_cost(&grid, &planned.nodes, self.params.plan.dataset),
                plan_ms,
            });
            boundaries.push(planned.nodes);
        }

        let lines = cut_lines(page, &boundaries)?;
        debug!(
            "segment_page: {}x{} page, {} separators, {} lines",
            page.w,
            page.h,
            boundaries.len(),
            lines.len()
        );

        let report = PageReport {
            width: page.w,
            height: page.h,
            num_separators: boundaries.len(),
            num_lines: lines.len(),
            distance_ms,
            seeds_ms,
            total_ms: total_start.elapsed().as_secs_f64() * 1000.0,
            boundaries: traces,
        };

        Ok(PageSegmentation {
            lines,
            boundaries,
            report,
        })
    }

    /// Rightmost column reachable from column 0 at the configured step (step
    /// 2 can only land on even columns).
    fn goal_col(&self, width: usize) -> i32 {
        let step = self.params.plan.step.max(1) as i32;
        let last = width as i32 - 1;
        (last - last.rem_euclid(step)).max(0)
    }
}

/// Cut one line image per band between consecutive boundaries. The topmost
/// band is bounded only from below, the bottommost only from above.
fn cut_lines(page: &GrayU8, boundaries: &[Vec<Node>]) -> Result<Vec<GrayU8>, SegmentError> {
    let mut lines = Vec::with_capacity(boundaries.len() + 1);
    if boundaries.is_empty() {
        if page.count_ink() > 0 {
            lines.push(page.clone());
        }
        return Ok(lines);
    }

    lines.push(project_one(page, &boundaries[0], BoundaryRole::Lower)?);
    for pair in boundaries.windows(2) {
        lines.push(project_two(page, &pair[0], &pair[1])?);
    }
    lines.push(project_one(
        page,
        &boundaries[boundaries.len() - 1],
        BoundaryRole::Upper,
    )?);
    Ok(lines)
}

/// Persist every line image as `line_{id}.{ext}` under `dir`, returning the
/// written paths in line order.
pub fn write_lines(
    segmentation: &PageSegmentation,
    dir: &Path,
    ext: &str,
) -> Result<Vec<PathBuf>, SegmentError> {
    let mut paths = Vec::with_capacity(segmentation.lines.len());
    for (id, line) in segmentation.lines.iter().enumerate() {
        let path = write_line_image(dir, id, ext, line).map_err(SegmentError::Io)?;
        paths.push(path);
    }
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::u8::{BACKGROUND, INK};

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
    fn blank_page_has_no_lines() {
        let page = GrayU8::filled(32, 32, BACKGROUND);
        let seg = LineSegmenter::new(SegmenterParams::default())
            .segment_page(&page)
            .unwrap();
        assert!(seg.lines.is_empty());
        assert!(seg.boundaries.is_empty());
        assert_eq!(seg.report.num_lines, 0);
    }

    #[test]
    fn single_band_page_is_one_line() {
        let page = page_with_bands(&[(10, 16)], 32, 40);
        let seg = LineSegmenter::new(SegmenterParams::default())
            .segment_page(&page)
            .unwrap();
        assert_eq!(seg.lines.len(), 1);
        assert!(seg.boundaries.is_empty());
    }

    #[test]
    fn two_band_page_splits_into_two_lines() {
        let page = page_with_bands(&[(6, 12), (28, 34)], 48, 48);
        let seg = LineSegmenter::new(SegmenterParams::default())
            .segment_page(&page)
            .unwrap();
        assert_eq!(seg.boundaries.len(), 1);
        assert_eq!(seg.lines.len(), 2);
        // Each line keeps its own band's ink and nothing else.
        let band_ink = 48 * 7;
        assert_eq!(seg.lines[0].count_ink(), band_ink);
        assert_eq!(seg.lines[1].count_ink(), band_ink);
    }

    #[test]
    fn boundary_spans_the_page_and_stays_in_the_gap() {
        let page = page_with_bands(&[(6, 12), (28, 34)], 40, 48);
        let seg = LineSegmenter::new(SegmenterParams::default())
            .segment_page(&page)
            .unwrap();
        let boundary = &seg.boundaries[0];
        assert_eq!(boundary.first().map(|n| n.col), Some(0));
        assert_eq!(boundary.last().map(|n| n.col), Some(39));
        assert!(
            boundary.iter().all(|n| n.row > 12 && n.row < 28),
            "boundary strayed into a text band"
        );
    }

    #[test]
    fn goal_col_respects_step_parity() {
        let mut params = SegmenterParams::default();
        params.plan.step = 2;
        let segmenter = LineSegmenter::new(params);
        assert_eq!(segmenter.goal_col(16), 14);
        assert_eq!(segmenter.goal_col(17), 16);

        let segmenter = LineSegmenter::new(SegmenterParams::default());
        assert_eq!(segmenter.goal_col(16), 15);
    }

    #[test]
    fn three_band_page_uses_the_two_boundary_projector() {
        let page = page_with_bands(&[(4, 10), (22, 28), (40, 46)], 48, 52);
        let seg = LineSegmenter::new(SegmenterParams::default())
            .segment_page(&page)
            .unwrap();
        assert_eq!(seg.boundaries.len(), 2);
        assert_eq!(seg.lines.len(), 3);
        let band_ink = 48 * 7;
        for (i, line) in seg.lines.iter().enumerate() {
            assert_eq!(line.count_ink(), band_ink, "line {i} lost or gained ink");
        }
    }
}
