use crate::node_graph::{NodeGraph, NodeId};
use crate::{octile_distance, C, D};
use grid_util::point::Point;

/// Caps estimates so that `cost + estimate` cannot overflow on very large grids.
const MAX_ESTIMATE: i64 = (i32::MAX / 4) as i64;

/// Distance estimate from a cell to the goal, in the same integer units as [step_cost](crate::step_cost).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Heuristic {
    /// Exact obstacle-free cost on an 8-connected grid. Admissible and consistent.
    #[default]
    Octile,
    /// Straight line distance, scaled so that it never exceeds [Heuristic::Octile].
    Euclidean,
    /// Squared straight line distance. Not admissible: the search becomes a greedy best-first
    /// search that still always finds a path if one exists, but not necessarily the cheapest.
    SquaredEuclidean,
    /// No estimate at all, which turns the search into Dijkstra's algorithm.
    Zero,
}

impl Heuristic {
    pub fn estimate(&self, p1: &Point, p2: &Point) -> i32 {
        let delta_x = (p1.x - p2.x).abs() as i64;
        let delta_y = (p1.y - p2.y).abs() as i64;
        let estimate = match self {
            Heuristic::Octile => octile_distance(p1, p2) as i64,
            Heuristic::Euclidean => {
                let unit = D as f64 / std::f64::consts::SQRT_2;
                (((delta_x * delta_x + delta_y * delta_y) as f64).sqrt() * unit).floor() as i64
            }
            Heuristic::SquaredEuclidean => (delta_x * delta_x + delta_y * delta_y) * C as i64,
            Heuristic::Zero => 0,
        };
        estimate.min(MAX_ESTIMATE) as i32
    }

    /// Whether the search is guaranteed to return a cheapest path with this heuristic
    /// (at a heuristic factor of at most 1).
    pub fn is_admissible(&self) -> bool {
        !matches!(self, Heuristic::SquaredEuclidean)
    }
}

/// Estimates from every node of a [NodeGraph] to one goal cell, indexed by [NodeId].
#[derive(Clone, Debug)]
pub struct HeuristicTable {
    goal: Point,
    estimates: Vec<i32>,
}

impl HeuristicTable {
    /// Multiplies each estimate by `factor`, as a weighted A* would. Scaled estimates are capped
    /// like unscaled ones.
    pub fn new(
        graph: &NodeGraph,
        goal: Point,
        heuristic: Heuristic,
        factor: f32,
    ) -> HeuristicTable {
        let factor = f64::from(factor.max(0.0));
        let estimates = graph
            .nodes()
            .map(|node| {
                let scaled = f64::from(heuristic.estimate(&node.cell, &goal)) * factor;
                scaled.min(MAX_ESTIMATE as f64) as i32
            })
            .collect();
        HeuristicTable { goal, estimates }
    }

    pub fn goal(&self) -> Point {
        self.goal
    }

    /// Returns [None] for ids that do not belong to the graph the table was built from.
    #[inline]
    pub fn get(&self, id: NodeId) -> Option<i32> {
        self.estimates.get(id.index()).copied()
    }

    pub fn len(&self) -> usize {
        self.estimates.len()
    }
    pub fn is_empty(&self) -> bool {
        self.estimates.is_empty()
    }
}
