#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod config;
pub mod diagnostics;
pub mod image;
pub mod segmenter;
pub mod types;

// Core search machinery – public for callers that bring their own seeds.
pub mod cost;
pub mod distance;
pub mod eval;
pub mod grid;
pub mod planner;
pub mod project;
pub mod seeds;

// --- High-level re-exports -------------------------------------------------

// Main entry points: segmenter + results.
pub use crate::segmenter::{LineSegmenter, PageSegmentation, SegmentError, SegmenterParams};

// Search-level API for callers that drive the planner directly.
pub use crate::cost::Dataset;
pub use crate::planner::{plan, PlanError, PlanParams, PlannedBoundary};
pub use crate::project::{project_one, project_two, BoundaryRole, ProjectError};
pub use crate::types::Node;

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```
/// use linesegm::prelude::*;
///
/// # fn main() {
/// let mut page = GrayU8::filled(64, 64, 255);
/// for col in 0..64 {
///     page.set(20, col, 0);
///     page.set(44, col, 0);
/// }
///
/// let segmenter = LineSegmenter::new(SegmenterParams::default());
/// let result = segmenter.segment_page(&page).unwrap();
/// println!("lines={} total_ms={:.3}", result.lines.len(), result.report.total_ms);
/// # }
/// ```
pub mod prelude {
    pub use crate::cost::Dataset;
    pub use crate::image::GrayU8;
    pub use crate::types::Node;
    pub use crate::{LineSegmenter, PageSegmentation, SegmenterParams};
}
