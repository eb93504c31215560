use serde::{Deserialize, Serialize};

/// A pixel coordinate on the page grid, in (row, col) order.
///
/// The derived `Ord` compares row first, then col; the planner relies on this
/// for deterministic tie-breaking in its priority queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Node {
    pub row: i32,
    pub col: i32,
}

impl Node {
    #[inline]
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Euclidean distance to `other`.
    #[inline]
    pub fn distance(&self, other: Node) -> f64 {
        let dr = (self.row - other.row) as f64;
        let dc = (self.col - other.col) as f64;
        (dr * dr + dc * dc).sqrt()
    }
}

impl std::fmt::Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
