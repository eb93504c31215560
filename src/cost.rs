//! Step-cost model for the line-separating search.
//!
//! The cost of moving onto a neighbor combines five terms, all evaluated at
//! the neighbor: vertical deviation from the seed row, the 10/14 axis versus
//! diagonal charge, a heavy but finite ink penalty, and two clearance terms
//! that pull the path towards the middle of the inter-line whitespace.

use crate::grid::LineGrid;
use crate::types::Node;
use serde::{Deserialize, Serialize};

/// Which cost-weight vector to use. The MLS corpus responds better to a
/// stiffer deviation term and no squared clearance component.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Dataset {
    Mls,
    #[default]
    Default,
}

impl Dataset {
    /// Map a free-form dataset tag to a weight vector; anything that is not
    /// `"MLS"` (case-insensitive) selects the default weights.
    pub fn from_tag(tag: &str) -> Self {
        if tag.eq_ignore_ascii_case("mls") {
            Dataset::Mls
        } else {
            Dataset::Default
        }
    }

    fn weights(self) -> CostWeights {
        match self {
            Dataset::Mls => CostWeights {
                deviation: 2.5,
                axis: 1.0,
                ink: 50.0,
                clearance: 130.0,
                clearance_sq: 0.0,
            },
            Dataset::Default => CostWeights {
                deviation: 0.5,
                axis: 1.0,
                ink: 50.0,
                clearance: 150.0,
                clearance_sq: 50.0,
            },
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct CostWeights {
    deviation: f64,
    axis: f64,
    ink: f64,
    clearance: f64,
    clearance_sq: f64,
}

/// Vertical deviation of `node` from the search's seed row.
#[inline]
fn vertical_deviation(node: Node, start: Node) -> f64 {
    (node.row - start.row).abs() as f64
}

/// 10 for axis-aligned moves, 14 for diagonals (the usual integer
/// approximation of 8-neighbor geometry).
#[inline]
fn axis_charge(current: Node, neighbor: Node) -> f64 {
    if current.row == neighbor.row || current.col == neighbor.col {
        10.0
    } else {
        14.0
    }
}

/// 1 when the neighbor lands on an ink stroke, else 0. Crossing ink is
/// heavily penalized but never impossible; touching lines would otherwise
/// make the right margin unreachable.
#[inline]
fn ink_charge(grid: &LineGrid<'_>, node: Node) -> f64 {
    if grid.is_ink(node) {
        1.0
    } else {
        0.0
    }
}

/// The pair `(1/(1+d), 1/(1+d²))` for clearance `d`. Both terms vanish when
/// the column holds no ink at all (`d = +∞`).
#[inline]
fn clearance_charges(grid: &LineGrid<'_>, node: Node) -> (f64, f64) {
    let d = grid.vertical_clearance(node);
    (1.0 / (1.0 + d), 1.0 / (1.0 + d * d))
}

/// Cost of stepping from `current` onto `neighbor` for a search seeded at
/// `start`.
pub fn step_cost(
    grid: &LineGrid<'_>,
    current: Node,
    neighbor: Node,
    start: Node,
    dataset: Dataset,
) -> f64 {
    let w = dataset.weights();
    let v = vertical_deviation(neighbor, start);
    let n = axis_charge(current, neighbor);
    let m = ink_charge(grid, neighbor);
    let (d, d2) = clearance_charges(grid, neighbor);

    w.deviation * v + w.axis * n + w.ink * m + w.clearance * d + w.clearance_sq * d2
}

/// Total cost of a boundary path: the sum of step costs over consecutive
/// pairs, with the path's first node as the seed. Empty and single-node paths
/// cost zero.
pub fn path_cost(grid: &LineGrid<'_>, path: &[Node], dataset: Dataset) -> f64 {
    let Some(&start) = path.first() else {
        return 0.0;
    };
    path.windows(2)
        .map(|pair| step_cost(grid, pair[0], pair[1], start, dataset))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::DistanceMap;
    use crate::image::u8::{GrayU8, BACKGROUND, INK};

    fn empty_grid(w: usize, h: usize) -> (GrayU8, DistanceMap) {
        let raster = GrayU8::filled(w, h, BACKGROUND);
        let dmap = DistanceMap::build(&raster);
        (raster, dmap)
    }

    #[test]
    fn horizontal_move_on_empty_page_costs_axis_only() {
        let (raster, dmap) = empty_grid(8, 8);
        let grid = LineGrid::new(&raster, &dmap);
        let start = Node::new(3, 0);
        let cost = step_cost(&grid, start, Node::new(3, 1), start, Dataset::Default);
        assert_eq!(cost, 10.0);
    }

    #[test]
    fn diagonal_move_on_empty_page_charges_fourteen_plus_deviation() {
        let (raster, dmap) = empty_grid(8, 8);
        let grid = LineGrid::new(&raster, &dmap);
        let start = Node::new(3, 0);
        let cost = step_cost(&grid, start, Node::new(4, 1), start, Dataset::Default);
        assert_eq!(cost, 14.0 + 0.5);
    }

    #[test]
    fn ink_pixel_adds_fifty_and_clearance_terms() {
        let mut raster = GrayU8::filled(8, 8, BACKGROUND);
        raster.set(3, 4, INK);
        let dmap = DistanceMap::build(&raster);
        let grid = LineGrid::new(&raster, &dmap);
        let start = Node::new(3, 0);
        // Clearance at the ink pixel itself is 0, so both D terms are 1.
        let cost = step_cost(&grid, Node::new(3, 3), Node::new(3, 4), start, Dataset::Default);
        assert_eq!(cost, 10.0 + 50.0 + 150.0 + 50.0);
    }

    #[test]
    fn mls_weights_drop_the_squared_clearance_term() {
        let mut raster = GrayU8::filled(8, 8, BACKGROUND);
        raster.set(0, 4, INK);
        let dmap = DistanceMap::build(&raster);
        let grid = LineGrid::new(&raster, &dmap);
        let start = Node::new(3, 0);
        // Clearance at (3, 4) is 3.
        let cost = step_cost(&grid, Node::new(3, 3), Node::new(3, 4), start, Dataset::Mls);
        assert!((cost - (10.0 + 130.0 / 4.0)).abs() < 1e-12);
    }

    #[test]
    fn dataset_tag_parsing_is_case_insensitive() {
        assert_eq!(Dataset::from_tag("MLS"), Dataset::Mls);
        assert_eq!(Dataset::from_tag("mls"), Dataset::Mls);
        assert_eq!(Dataset::from_tag("saintgall"), Dataset::Default);
        assert_eq!(Dataset::from_tag(""), Dataset::Default);
    }
}
