//! Navigable grid over a binarized page and its vertical distance map.
//!
//! Nodes are pixel coordinates; edges connect a node to its eight neighbors
//! at a configurable step. The adapter only answers local queries (bounds,
//! ink, clearance, neighbors); all routing policy lives in the cost model and
//! the planner.

use crate::distance::{DistanceMap, NO_INK};
use crate::image::u8::{GrayU8, INK};
use crate::types::Node;

/// The eight unit moves, in the fixed order the planner expands neighbors.
/// The order is observable: it affects A* tie-breaking.
pub const DIRECTIONS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Read-only view over one page used by a single planner run.
pub struct LineGrid<'a> {
    raster: &'a GrayU8,
    clearance: &'a DistanceMap,
}

impl<'a> LineGrid<'a> {
    pub fn new(raster: &'a GrayU8, clearance: &'a DistanceMap) -> Self {
        Self { raster, clearance }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.raster.w
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.raster.h
    }

    /// (width, height) of the underlying raster.
    pub fn raster_shape(&self) -> (usize, usize) {
        (self.raster.w, self.raster.h)
    }

    /// (width, height) of the underlying distance map.
    pub fn clearance_shape(&self) -> (usize, usize) {
        (self.clearance.w, self.clearance.h)
    }

    /// Shape agreement between the raster and the distance map.
    pub fn is_consistent(&self) -> bool {
        self.raster_shape() == self.clearance_shape()
    }

    #[inline]
    pub fn in_bounds(&self, node: Node) -> bool {
        node.row >= 0
            && (node.row as usize) < self.raster.h
            && node.col >= 0
            && (node.col as usize) < self.raster.w
    }

    /// Whether the pixel at `node` is an ink stroke. Callers must pass an
    /// in-bounds node.
    #[inline]
    pub fn is_ink(&self, node: Node) -> bool {
        debug_assert!(self.in_bounds(node));
        self.raster.get(node.row as usize, node.col as usize) == INK
    }

    /// Vertical clearance at `node`: the distance-map entry, or +∞ where the
    /// map holds the no-ink sentinel.
    #[inline]
    pub fn vertical_clearance(&self, node: Node) -> f64 {
        debug_assert!(self.in_bounds(node));
        let dist = self.clearance.get(node.row as usize, node.col as usize);
        if dist < NO_INK {
            dist as f64
        } else {
            f64::INFINITY
        }
    }

    /// The up-to-eight in-bounds neighbors of `node` at the given step, in
    /// the fixed [`DIRECTIONS`] order.
    pub fn neighbors(&self, node: Node, step: u32) -> Vec<Node> {
        let step = step as i32;
        let mut out = Vec::with_capacity(8);
        for (dr, dc) in DIRECTIONS {
            let neighbor = Node::new(node.row + step * dr, node.col + step * dc);
            if self.in_bounds(neighbor) {
                out.push(neighbor);
            }
        }
        out
    }
}
