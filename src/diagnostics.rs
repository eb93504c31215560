//! Structured, serializable reports about a segmentation run.
//!
//! Everything here is plain data meant for the JSON report written by the
//! CLI; nothing in the pipeline reads these back.

use serde::Serialize;

/// One planner run, from a seed row to the right margin.
#[derive(Clone, Debug, Serialize)]
pub struct BoundaryTrace {
    /// Row the separator search was seeded at.
    pub seed_row: usize,
    /// Number of nodes on the returned boundary path.
    pub path_len: usize,
    /// Nodes expanded by the search.
    pub expanded: usize,
    /// Total path cost under the configured weight vector.
    pub cost: f64,
    pub plan_ms: f64,
}

/// Per-page summary of a full segmentation.
#[derive(Clone, Debug, Default, Serialize)]
pub struct PageReport {
    pub width: usize,
    pub height: usize,
    pub num_separators: usize,
    pub num_lines: usize,
    pub distance_ms: f64,
    pub seeds_ms: f64,
    pub total_ms: f64,
    pub boundaries: Vec<BoundaryTrace>,
}
