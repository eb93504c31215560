//! Projection of boundary paths back onto the page.
//!
//! A boundary path returned by the planner separates two adjacent text lines.
//! To cut a line image out, the projector erases everything on the far side
//! of each boundary with a two-pixel-thick stroke (the path column plus its
//! right neighbor) and crops the remaining band at full page width. The page
//! is cloned first; the original raster is never mutated.

use crate::image::io::save_grayscale_u8;
use crate::image::u8::{GrayU8, BACKGROUND, INK};
use crate::types::Node;
use std::path::{Path, PathBuf};

/// Which side of a band a single boundary bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoundaryRole {
    /// The boundary runs above the band; everything above it is erased.
    Upper,
    /// The boundary runs below the band; everything below it is erased.
    Lower,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ProjectError {
    EmptyBoundary,
}

impl std::fmt::Display for ProjectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProjectError::EmptyBoundary => write!(f, "boundary path is empty"),
        }
    }
}

impl std::error::Error for ProjectError {}

/// Erase everything below a lower boundary: for each path node, columns `c`
/// and `c + 1` are set to background from the node's row downward.
fn erase_below(image: &mut GrayU8, boundary: &[Node]) {
    for &node in boundary {
        let (row, col) = (node.row.max(0) as usize, node.col.max(0) as usize);
        for r in row..image.h {
            image.set(r, col, BACKGROUND);
            if col + 1 < image.w {
                image.set(r, col + 1, BACKGROUND);
            }
        }
    }
}

/// Erase everything above an upper boundary: columns `c` and `c + 1` are set
/// to background from the node's row upward.
fn erase_above(image: &mut GrayU8, boundary: &[Node]) {
    if image.h == 0 {
        return;
    }
    for &node in boundary {
        let (row, col) = (node.row.max(0) as usize, node.col.max(0) as usize);
        for r in (0..=row.min(image.h - 1)).rev() {
            image.set(r, col, BACKGROUND);
            if col + 1 < image.w {
                image.set(r, col + 1, BACKGROUND);
            }
        }
    }
}

/// Overlay a boundary path in ink on a copy of `image`, two pixels thick.
/// Debug aid for inspecting where the planner routed each separator.
pub fn trace_boundary(image: &GrayU8, boundary: &[Node]) -> GrayU8 {
    let mut out = image.clone();
    for &node in boundary {
        let (row, col) = (node.row.max(0) as usize, node.col.max(0) as usize);
        if row < out.h && col < out.w {
            out.set(row, col, INK);
            if col + 1 < out.w {
                out.set(row, col + 1, INK);
            }
        }
    }
    out
}

fn min_row(boundary: &[Node]) -> usize {
    boundary.iter().map(|n| n.row.max(0) as usize).min().unwrap_or(0)
}

fn max_row(boundary: &[Node]) -> usize {
    boundary.iter().map(|n| n.row.max(0) as usize).max().unwrap_or(0)
}

/// Row of the topmost ink pixel, or the image height when there is none.
fn topmost_ink_row(image: &GrayU8) -> usize {
    for row in 0..image.h {
        for col in 0..image.w {
            if image.get(row, col) == INK {
                return row;
            }
        }
    }
    image.h
}

/// Row of the bottommost ink pixel, or 0 when there is none.
fn bottommost_ink_row(image: &GrayU8) -> usize {
    for row in (0..image.h).rev() {
        for col in (0..image.w).rev() {
            if image.get(row, col) == INK {
                return row;
            }
        }
    }
    0
}

/// Cut the band bounded by a single boundary path.
///
/// With [`BoundaryRole::Lower`] the band runs from the topmost remaining ink
/// row down to the boundary's deepest row; with [`BoundaryRole::Upper`] from
/// the boundary's highest row down to the bottommost remaining ink row.
pub fn project_one(
    image: &GrayU8,
    boundary: &[Node],
    role: BoundaryRole,
) -> Result<GrayU8, ProjectError> {
    if boundary.is_empty() {
        return Err(ProjectError::EmptyBoundary);
    }
    let mut work = image.clone();
    let (top, bottom) = match role {
        BoundaryRole::Lower => {
            erase_below(&mut work, boundary);
            (topmost_ink_row(&work), max_row(boundary))
        }
        BoundaryRole::Upper => {
            erase_above(&mut work, boundary);
            // End-exclusive crop, so step one past the bottommost ink row.
            (min_row(boundary), bottommost_ink_row(&work) + 1)
        }
    };
    Ok(work.crop_rows(top, bottom))
}

/// Cut the band between an upper and a lower boundary path.
///
/// Both boundaries are painted on the same working image; the crop spans from
/// the upper boundary's highest row to the lower boundary's deepest row, so
/// the band height equals `max_row(lower) - min_row(upper)`.
pub fn project_two(
    image: &GrayU8,
    upper: &[Node],
    lower: &[Node],
) -> Result<GrayU8, ProjectError> {
    if upper.is_empty() || lower.is_empty() {
        return Err(ProjectError::EmptyBoundary);
    }
    let mut work = image.clone();
    erase_below(&mut work, lower);
    erase_above(&mut work, upper);
    Ok(work.crop_rows(min_row(upper), max_row(lower)))
}

/// Persist a line image as `line_{id}.{ext}` under `dir`.
pub fn write_line_image(
    dir: &Path,
    id: usize,
    ext: &str,
    line: &GrayU8,
) -> Result<PathBuf, String> {
    let path = dir.join(format!("line_{id}.{ext}"));
    save_grayscale_u8(line, &path)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 8x8 background page with one ink row at `row`.
    fn page_with_ink_row(row: usize) -> GrayU8 {
        let mut img = GrayU8::filled(8, 8, BACKGROUND);
        for col in 0..8 {
            img.set(row, col, INK);
        }
        img
    }

    fn flat_boundary(row: i32, width: i32) -> Vec<Node> {
        (0..width).map(|c| Node::new(row, c)).collect()
    }

    #[test]
    fn empty_boundary_is_rejected() {
        let img = GrayU8::filled(4, 4, BACKGROUND);
        assert_eq!(
            project_one(&img, &[], BoundaryRole::Lower),
            Err(ProjectError::EmptyBoundary)
        );
        let b = flat_boundary(1, 4);
        assert_eq!(
            project_two(&img, &[], &b),
            Err(ProjectError::EmptyBoundary)
        );
        assert_eq!(
            project_two(&img, &b, &[]),
            Err(ProjectError::EmptyBoundary)
        );
    }

    #[test]
    fn lower_boundary_keeps_the_ink_above_it() {
        let img = page_with_ink_row(2);
        let boundary = flat_boundary(5, 8);
        let band = project_one(&img, &boundary, BoundaryRole::Lower).unwrap();
        // Crop runs from the topmost ink row (2) to the boundary row (5).
        assert_eq!(band.h, 3);
        assert_eq!(band.w, 8);
        assert!((0..8).all(|c| band.get(0, c) == INK));
    }

    #[test]
    fn lower_boundary_erases_everything_below() {
        let mut img = page_with_ink_row(2);
        for col in 0..8 {
            img.set(6, col, INK);
        }
        let band = project_one(&img, &flat_boundary(4, 8), BoundaryRole::Lower).unwrap();
        assert_eq!(band.count_ink(), 8, "only the upper ink row survives");
    }

    #[test]
    fn upper_boundary_keeps_the_ink_below_it() {
        let mut img = page_with_ink_row(6);
        for col in 0..8 {
            img.set(1, col, INK);
        }
        let band = project_one(&img, &flat_boundary(3, 8), BoundaryRole::Upper).unwrap();
        // Crop runs from the boundary row (3) through the bottommost ink row (6).
        assert_eq!(band.h, 4);
        assert_eq!(band.count_ink(), 8, "the lower ink row must survive");
        assert!((0..8).all(|c| band.get(3, c) == INK));

        let full = project_one(&img, &flat_boundary(3, 8), BoundaryRole::Upper).unwrap();
        assert_eq!(full, band, "projection is deterministic");
    }

    #[test]
    fn two_boundary_band_height_matches_the_row_span() {
        let mut img = GrayU8::filled(10, 10, BACKGROUND);
        for col in 0..10 {
            img.set(4, col, INK);
        }
        let upper = flat_boundary(2, 10);
        let lower = flat_boundary(7, 10);
        let band = project_two(&img, &upper, &lower).unwrap();
        assert_eq!(band.h, 7 - 2);
        assert_eq!(band.w, 10);
        // The ink row sits at offset 4 - 2 inside the band.
        assert!((0..10).all(|c| band.get(2, c) == INK));
    }

    #[test]
    fn projection_is_idempotent() {
        let mut img = page_with_ink_row(3);
        img.set(6, 2, INK);
        let boundary = flat_boundary(5, 8);

        let once = project_one(&img, &boundary, BoundaryRole::Lower).unwrap();
        let twice = project_one(&once, &boundary, BoundaryRole::Lower).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn uneven_boundary_erases_per_column() {
        let mut img = GrayU8::filled(4, 8, BACKGROUND);
        img.set(5, 0, INK);
        img.set(5, 3, INK);
        let boundary = vec![
            Node::new(4, 0),
            Node::new(5, 1),
            Node::new(6, 2),
            Node::new(6, 3),
        ];
        let band = project_one(&img, &boundary, BoundaryRole::Lower).unwrap();
        // Ink at (5, 0) is below the boundary in its column and is erased;
        // ink at (5, 3) is above row 6 and survives.
        assert_eq!(band.count_ink(), 1);
    }

    #[test]
    fn stroke_is_two_pixels_thick() {
        let img = GrayU8::filled(4, 4, BACKGROUND);
        let traced = trace_boundary(&img, &[Node::new(1, 1)]);
        assert_eq!(traced.get(1, 1), INK);
        assert_eq!(traced.get(1, 2), INK);
        // Last column has no right neighbor to thicken into.
        let edge = trace_boundary(&img, &[Node::new(1, 3)]);
        assert_eq!(edge.get(1, 3), INK);
    }
}
