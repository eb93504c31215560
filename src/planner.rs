//! A* search for a line-separating boundary path.
//!
//! The planner runs from a seed node on the left margin to a goal node on the
//! right margin, scoring moves with [`crate::cost::step_cost`] and guiding the
//! expansion with a scaled Euclidean heuristic. The heap does not support
//! decrease-key; relaxations push duplicate entries and stale ones are
//! dropped via the closed set on pop.

use crate::cost::{step_cost, Dataset};
use crate::grid::LineGrid;
use crate::types::Node;
use log::debug;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanParams {
    /// Stride applied to the eight directions; 1 or 2. Step 2 roughly
    /// quarters the search work at the cost of diagonal-alignment precision.
    pub step: u32,
    /// Heuristic multiplication factor. 1 keeps the heuristic Euclidean;
    /// larger values inflate it, trading optimality for speed.
    pub mfactor: u32,
    /// Selects the cost-weight vector.
    pub dataset: Dataset,
    /// Optional cap on node expansions; exceeding it fails the search.
    pub max_expansions: Option<usize>,
}

impl Default for PlanParams {
    fn default() -> Self {
        Self {
            step: 1,
            mfactor: 1,
            dataset: Dataset::Default,
            max_expansions: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum PlanError {
    InvalidStep {
        step: u32,
    },
    ZeroFactor,
    ShapeMismatch {
        raster: (usize, usize),
        clearance: (usize, usize),
    },
    OutOfBounds {
        node: Node,
        width: usize,
        height: usize,
    },
    NoPathFound {
        expanded: usize,
    },
}

impl std::fmt::Display for PlanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlanError::InvalidStep { step } => {
                write!(f, "invalid step {step}: must be 1 or 2")
            }
            PlanError::ZeroFactor => {
                write!(f, "multiplication factor must be a positive integer")
            }
            PlanError::ShapeMismatch { raster, clearance } => write!(
                f,
                "raster shape {}x{} does not match distance map {}x{}",
                raster.0, raster.1, clearance.0, clearance.1
            ),
            PlanError::OutOfBounds {
                node,
                width,
                height,
            } => write!(f, "node {node} outside the {width}x{height} page"),
            PlanError::NoPathFound { expanded } => {
                write!(f, "open set exhausted after {expanded} expansions")
            }
        }
    }
}

impl std::error::Error for PlanError {}

/// A boundary path from start to goal, plus how much work the search did.
#[derive(Clone, Debug)]
pub struct PlannedBoundary {
    pub nodes: Vec<Node>,
    pub expanded: usize,
}

/// Scaled Euclidean heuristic.
#[inline]
fn heuristic(node: Node, goal: Node, mfactor: u32) -> f64 {
    mfactor as f64 * node.distance(goal)
}

/// Open-set entry ordered for a min-heap on `(priority, node)`.
///
/// `BinaryHeap` is a max-heap, so the comparison is reversed; priority ties
/// break on the node's (row, col) ordering, which keeps expansion order fully
/// deterministic.
#[derive(Clone, Copy, Debug)]
struct OpenEntry {
    priority: f64,
    node: Node,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenEntry {}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .total_cmp(&self.priority)
            .then_with(|| other.node.cmp(&self.node))
    }
}

/// Find a least-cost path from `start` to `goal` over `grid`.
///
/// Returns the path in start-to-goal order; consecutive nodes are at
/// step-scaled 8-neighbor distance. Fails with [`PlanError::NoPathFound`]
/// when the open set empties before the goal is popped (or the expansion cap
/// is exceeded), and with a parameter error before any search work.
pub fn plan(
    grid: &LineGrid<'_>,
    start: Node,
    goal: Node,
    params: &PlanParams,
) -> Result<PlannedBoundary, PlanError> {
    validate(grid, start, goal, params)?;

    let mut gscore: HashMap<Node, f64> = HashMap::new();
    let mut parents: HashMap<Node, Node> = HashMap::new();
    let mut closed: HashSet<Node> = HashSet::new();
    let mut open: BinaryHeap<OpenEntry> = BinaryHeap::new();
    let mut expanded = 0usize;

    gscore.insert(start, 0.0);
    open.push(OpenEntry {
        priority: 0.0,
        node: start,
    });

    while let Some(OpenEntry { node: current, .. }) = open.pop() {
        if current == goal {
            let nodes = reconstruct_path(start, goal, &parents);
            debug!(
                "plan: reached {goal} from {start} after {expanded} expansions, path_len={}",
                nodes.len()
            );
            return Ok(PlannedBoundary { nodes, expanded });
        }
        if !closed.insert(current) {
            // Stale duplicate from a later relaxation.
            continue;
        }
        expanded += 1;
        if params.max_expansions.is_some_and(|cap| expanded > cap) {
            return Err(PlanError::NoPathFound { expanded });
        }

        let current_g = gscore[&current];
        for neighbor in grid.neighbors(current, params.step) {
            if closed.contains(&neighbor) {
                continue;
            }
            let tentative =
                current_g + step_cost(grid, current, neighbor, start, params.dataset);
            let improves = gscore.get(&neighbor).is_none_or(|&g| tentative < g);
            if improves {
                gscore.insert(neighbor, tentative);
                parents.insert(neighbor, current);
                open.push(OpenEntry {
                    priority: tentative + heuristic(neighbor, goal, params.mfactor),
                    node: neighbor,
                });
            }
        }
    }

    Err(PlanError::NoPathFound { expanded })
}

fn validate(
    grid: &LineGrid<'_>,
    start: Node,
    goal: Node,
    params: &PlanParams,
) -> Result<(), PlanError> {
    if params.step != 1 && params.step != 2 {
        return Err(PlanError::InvalidStep { step: params.step });
    }
    if params.mfactor == 0 {
        return Err(PlanError::ZeroFactor);
    }
    if !grid.is_consistent() {
        return Err(PlanError::ShapeMismatch {
            raster: grid.raster_shape(),
            clearance: grid.clearance_shape(),
        });
    }
    for node in [start, goal] {
        if !grid.in_bounds(node) {
            return Err(PlanError::OutOfBounds {
                node,
                width: grid.width(),
                height: grid.height(),
            });
        }
    }
    Ok(())
}

/// Walk the parent map from goal back to start and reverse.
fn reconstruct_path(start: Node, goal: Node, parents: &HashMap<Node, Node>) -> Vec<Node> {
    let mut path = vec![goal];
    let mut current = goal;
    while current != start {
        // Every node with a g-score other than start has a parent.
        current = parents[&current];
        path.push(current);
    }
    path.reverse();
    path
}
