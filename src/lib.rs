//! # occupancy_pathfinding
//!
//! Shortest paths over a discretized 2D occupancy field. An [OccupancyField] (for instance an
//! [OccupancyGrid]) is turned into a [NodeGraph] holding one node per free cell, linked to the
//! free cells in its
//! [Moore neighbourhood](https://en.wikipedia.org/wiki/Moore_neighborhood). A [PathFinder] is
//! scoped to one goal cell: it precomputes a heuristic table once and then answers
//! [A*](https://en.wikipedia.org/wiki/A*_search_algorithm) queries from any start cell, returning
//! the path as world-space waypoints.
//!
//! ```no_run
//! use grid_util::point::Point;
//! use occupancy_pathfinding::{NodeGraph, OccupancyGrid, PathFinder, WorldPosition};
//!
//! let field = OccupancyGrid::from_ascii(&["...", ".#.", "..."], WorldPosition::default(), 1.0)?;
//! let graph = NodeGraph::build(&field);
//! let finder = PathFinder::new(&graph, Point::new(2, 2))?;
//! let result = finder.find_path(Point::new(0, 0))?;
//! assert!(result.found);
//! # Ok::<(), occupancy_pathfinding::PathError>(())
//! ```
pub mod astar;
pub mod error;
pub mod frontier;
pub mod heuristic;
pub mod node_graph;
pub mod occupancy;
pub mod path_finder;

pub use error::{PathError, Result};
pub use frontier::PriorityFrontier;
pub use heuristic::{Heuristic, HeuristicTable};
pub use node_graph::{GraphConfig, Node, NodeGraph, NodeId};
pub use occupancy::{OccupancyField, OccupancyGrid, WorldPosition};
pub use path_finder::{PathFinder, PathFinderConfig, PathResult};

use grid_util::point::Point;

/// Cost of a cardinal (straight) step.
pub const C: i32 = 99;
/// Cost of a diagonal step, approximately `C * sqrt(2)`.
pub const D: i32 = 140;
/// Used by the octile distance formula.
pub const E: i32 = 2 * C - D;

/// Inline capacity of neighbour lists, one slot per direction.
pub const N_SMALLVEC_SIZE: usize = 8;
/// Whether a diagonal step may pass the corner of a blocked cell by default.
pub const ALLOW_CORNER_CUTTING: bool = true;

/// Offsets of the eight neighbours in the order they are linked and expanded.
pub(crate) const NEIGHBOUR_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Converts the integer cost to an approximate floating point equivalent where cardinal directions have cost 1.0.
pub fn convert_cost_to_unit_cost_float(cost: i32) -> f64 {
    (cost as f64) / (C as f64)
}

/// Cost of moving between two adjacent cells.
pub fn step_cost(p1: &Point, p2: &Point) -> i32 {
    debug_assert!((p1.x - p2.x).abs() <= 1 && (p1.y - p2.y).abs() <= 1);
    if p1.x != p2.x && p1.y != p2.y {
        D
    } else {
        C
    }
}

/// Octile distance: the cost of the cheapest obstacle-free route between two cells, taking the
/// maximal amount of diagonal steps before going straight.
pub fn octile_distance(p1: &Point, p2: &Point) -> i32 {
    let delta_x = (p1.x - p2.x).abs();
    let delta_y = (p1.y - p2.y).abs();
    // Formula from https://github.com/riscy/a_star_on_grids
    (E * (delta_x - delta_y).abs() + D * (delta_x + delta_y)) / 2
}

/// Sums the step costs along a sequence of adjacent cells.
pub fn path_cost(cells: &[Point]) -> i32 {
    use itertools::Itertools;
    cells
        .iter()
        .tuple_windows()
        .map(|(a, b)| step_cost(a, b))
        .sum()
}
