use crate::astar::{astar, SearchOutcome};
use crate::convert_cost_to_unit_cost_float;
use crate::error::{PathError, Result};
use crate::heuristic::{Heuristic, HeuristicTable};
use crate::node_graph::{Node, NodeGraph, NodeId};
use crate::occupancy::WorldPosition;
use grid_util::point::Point;
use log::{debug, info, warn};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PathFinderConfig {
    pub heuristic: Heuristic,
    /// Scales every heuristic estimate. Values above 1.0 trade optimality for fewer expansions.
    pub heuristic_factor: f32,
    /// Searches that would expand more nodes than this fail with
    /// [PathError::SearchBudgetExceeded].
    pub max_expansions: Option<usize>,
}

impl Default for PathFinderConfig {
    fn default() -> PathFinderConfig {
        PathFinderConfig {
            heuristic: Heuristic::default(),
            heuristic_factor: 1.0,
            max_expansions: None,
        }
    }
}

/// The answer to a single [PathFinder::find_path] call. When no path exists `found` is [false]
/// and both sequences are empty.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PathResult {
    pub found: bool,
    /// Cells from start to goal, both included.
    pub cells: Vec<Point>,
    /// World positions of the cell centers along the path.
    pub waypoints: Vec<WorldPosition>,
    /// Total step cost, see [step_cost](crate::step_cost).
    pub cost: i32,
}

impl PathResult {
    pub fn not_found() -> PathResult {
        PathResult::default()
    }
    pub fn len(&self) -> usize {
        self.cells.len()
    }
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
    /// The cost in cell units, where a straight step costs 1.0.
    pub fn unit_cost(&self) -> f64 {
        convert_cost_to_unit_cost_float(self.cost)
    }

    /// The endpoints plus every cell at which the direction of travel changes. Following these
    /// in straight lines reproduces the path.
    pub fn turning_points(&self) -> Vec<Point> {
        let n = self.cells.len();
        if n <= 2 {
            return self.cells.clone();
        }
        let dir = |a: &Point, b: &Point| (b.x - a.x, b.y - a.y);
        let mut points = vec![self.cells[0]];
        for i in 1..n - 1 {
            let (prev, cur, next) = (&self.cells[i - 1], &self.cells[i], &self.cells[i + 1]);
            if dir(prev, cur) != dir(cur, next) {
                points.push(*cur);
            }
        }
        points.push(self.cells[n - 1]);
        points
    }
}

/// [PathFinder] searches a borrowed [NodeGraph] for paths towards a single goal. The heuristic
/// estimate of every node is computed once on construction and reused by every search, so one
/// finder can serve many start cells. Searches only read shared state: a finder may be used from
/// several threads at the same time.
///
/// The borrow keeps the graph from being rebuilt while the finder is alive; after a rebuild a new
/// finder has to be created.
#[derive(Clone, Debug)]
pub struct PathFinder<'g> {
    graph: &'g NodeGraph,
    goal: Option<NodeId>,
    heuristic: HeuristicTable,
    config: PathFinderConfig,
}

impl<'g> PathFinder<'g> {
    pub fn new(graph: &'g NodeGraph, goal: Point) -> Result<PathFinder<'g>> {
        PathFinder::with_config(graph, goal, PathFinderConfig::default())
    }

    /// Fails with [PathError::InvalidGoal] if `goal` is not a node of `graph`. An empty graph is
    /// accepted; every search on it reports that no path exists.
    pub fn with_config(
        graph: &'g NodeGraph,
        goal: Point,
        config: PathFinderConfig,
    ) -> Result<PathFinder<'g>> {
        let goal_id = match graph.node_id(goal) {
            Some(id) => Some(id),
            None if graph.is_empty() => {
                debug!("Path finder towards {} created on an empty graph", goal);
                None
            }
            None => return Err(PathError::InvalidGoal(goal)),
        };
        let heuristic = HeuristicTable::new(graph, goal, config.heuristic, config.heuristic_factor);
        Ok(PathFinder {
            graph,
            goal: goal_id,
            heuristic,
            config,
        })
    }

    pub fn graph(&self) -> &'g NodeGraph {
        self.graph
    }
    pub fn goal(&self) -> Point {
        self.heuristic.goal()
    }
    pub fn goal_node(&self) -> Option<&'g Node> {
        self.goal.and_then(|id| self.graph.node(id))
    }
    pub fn config(&self) -> &PathFinderConfig {
        &self.config
    }
    /// The precomputed heuristic estimate for a cell, if it is a node of the graph.
    pub fn heuristic_at(&self, cell: Point) -> Option<i32> {
        self.graph.node_id(cell).and_then(|id| self.heuristic.get(id))
    }

    /// Computes a path from `start` to the goal using A*. With an admissible
    /// [Heuristic] and a heuristic factor of at most 1.0 the path is a cheapest one.
    /// Repeated calls with the same start return the same path.
    ///
    /// Fails with [PathError::InvalidStart] if `start` is not a node of a non-empty graph and with
    /// [PathError::SearchBudgetExceeded] if the configured expansion budget runs out.
    pub fn find_path(&self, start: Point) -> Result<PathResult> {
        if self.graph.is_empty() {
            return Ok(PathResult::not_found());
        }
        let start_id = self
            .graph
            .node_id(start)
            .ok_or(PathError::InvalidStart(start))?;
        let Some(goal_id) = self.goal else {
            return Ok(PathResult::not_found());
        };
        if !self.graph.same_component(start_id, goal_id) {
            info!("{} is not reachable from {}", self.goal(), start);
            return Ok(PathResult::not_found());
        }

        let outcome = astar(
            &start_id,
            |id| self.graph.neighbours_and_cost(*id),
            |id| self.heuristic.get(*id).unwrap_or(0),
            |id| *id == goal_id,
            self.config.max_expansions,
        );
        match outcome {
            SearchOutcome::Found {
                path,
                cost,
                expansions,
            } => {
                debug!(
                    "Path from {} to {} with {} cells found after {} expansions",
                    start,
                    self.goal(),
                    path.len(),
                    expansions
                );
                Ok(self.to_result(&path, cost))
            }
            SearchOutcome::Exhausted { expansions } => {
                warn!(
                    "Reachable goal {} could not be pathed to from {} after {} expansions, are the components correct?",
                    self.goal(),
                    start,
                    expansions
                );
                Ok(PathResult::not_found())
            }
            SearchOutcome::BudgetExceeded { expansions } => {
                warn!(
                    "Search from {} to {} stopped after {} expansions",
                    start,
                    self.goal(),
                    expansions
                );
                Err(PathError::SearchBudgetExceeded { expansions })
            }
        }
    }

    fn to_result(&self, path: &[NodeId], cost: i32) -> PathResult {
        let (cells, waypoints): (Vec<Point>, Vec<WorldPosition>) = path
            .iter()
            .filter_map(|id| self.graph.node(*id))
            .map(|node| (node.cell, node.world))
            .unzip();
        PathResult {
            found: true,
            cells,
            waypoints,
            cost,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::occupancy::OccupancyGrid;
    use crate::{C, D};

    fn graph(rows: &[&str]) -> NodeGraph {
        NodeGraph::build(&OccupancyGrid::from_ascii(rows, WorldPosition::default(), 1.0).unwrap())
    }

    /// Asserts that the case in which start and goal are equal is handled correctly.
    #[test]
    fn equal_start_goal() {
        let graph = graph(&["..", ".."]);
        let finder = PathFinder::new(&graph, Point::new(1, 1)).unwrap();
        let result = finder.find_path(Point::new(1, 1)).unwrap();
        assert!(result.found);
        assert_eq!(result.cells, vec![Point::new(1, 1)]);
        assert_eq!(result.waypoints, vec![WorldPosition::new(1.5, 1.5)]);
        assert_eq!(result.cost, 0);
    }

    #[test]
    fn open_grid_takes_the_diagonal() {
        let graph = graph(&["...", "...", "..."]);
        let finder = PathFinder::new(&graph, Point::new(2, 2)).unwrap();
        let result = finder.find_path(Point::new(0, 0)).unwrap();
        assert!(result.found);
        assert_eq!(
            result.cells,
            vec![Point::new(0, 0), Point::new(1, 1), Point::new(2, 2)]
        );
        assert_eq!(result.waypoints.len(), 3);
        assert_eq!(result.cost, 2 * D);
    }

    /// Asserts that the optimal 4 step solution around a blocked center is found.
    #[test]
    fn routes_around_blocked_center() {
        let graph = graph(&["...", ".#.", "..."]);
        let finder = PathFinder::new(&graph, Point::new(2, 2)).unwrap();
        let result = finder.find_path(Point::new(0, 0)).unwrap();
        assert!(result.found);
        assert_eq!(result.len(), 4);
        assert_eq!(result.cost, 2 * C + D);
        assert!(!result.cells.contains(&Point::new(1, 1)));
        assert_eq!(result.cells.first(), Some(&Point::new(0, 0)));
        assert_eq!(result.cells.last(), Some(&Point::new(2, 2)));
        assert_eq!(result.waypoints[0], WorldPosition::new(0.5, 0.5));
        assert_eq!(result.waypoints[3], WorldPosition::new(2.5, 2.5));
    }

    #[test]
    fn wall_blocks_every_path() {
        let graph = graph(&["..#..", "..#..", "..#.."]);
        let finder = PathFinder::new(&graph, Point::new(4, 1)).unwrap();
        let result = finder.find_path(Point::new(0, 1)).unwrap();
        assert!(!result.found);
        assert!(result.waypoints.is_empty());
        assert!(result.cells.is_empty());
    }

    #[test]
    fn invalid_start_and_goal() {
        let graph = graph(&["..#", "..."]);
        let finder = PathFinder::new(&graph, Point::new(0, 0)).unwrap();
        assert_eq!(
            finder.find_path(Point::new(2, 1)),
            Err(PathError::InvalidStart(Point::new(2, 1)))
        );
        assert_eq!(
            finder.find_path(Point::new(7, -1)),
            Err(PathError::InvalidStart(Point::new(7, -1)))
        );
        assert!(matches!(
            PathFinder::new(&graph, Point::new(2, 1)),
            Err(PathError::InvalidGoal(_))
        ));
    }

    #[test]
    fn empty_graph_reports_not_found() {
        let graph = graph(&["##", "##"]);
        let finder = PathFinder::new(&graph, Point::new(0, 0)).unwrap();
        assert!(finder.goal_node().is_none());
        let result = finder.find_path(Point::new(1, 1)).unwrap();
        assert_eq!(result, PathResult::not_found());
    }

    #[test]
    fn repeated_searches_are_identical() {
        let graph = graph(&[".....", ".#.#.", ".....", ".#.#.", "....."]);
        let finder = PathFinder::new(&graph, Point::new(4, 4)).unwrap();
        let first = finder.find_path(Point::new(0, 0)).unwrap();
        for _ in 0..5 {
            assert_eq!(finder.find_path(Point::new(0, 0)).unwrap(), first);
        }
    }

    #[test]
    fn budget_exceeded_is_an_error() {
        let graph = graph(&["......", "......", "......", "......"]);
        let config = PathFinderConfig {
            heuristic: Heuristic::Zero,
            max_expansions: Some(3),
            ..Default::default()
        };
        let finder = PathFinder::with_config(&graph, Point::new(5, 3), config).unwrap();
        assert_eq!(
            finder.find_path(Point::new(0, 0)),
            Err(PathError::SearchBudgetExceeded { expansions: 3 })
        );
        assert!(finder.find_path(Point::new(5, 3)).unwrap().found);
    }

    #[test]
    fn greedy_heuristic_still_finds_a_path() {
        let graph = graph(&["......", ".####.", "......"]);
        let config = PathFinderConfig {
            heuristic: Heuristic::SquaredEuclidean,
            ..Default::default()
        };
        let finder = PathFinder::with_config(&graph, Point::new(5, 2), config).unwrap();
        let result = finder.find_path(Point::new(0, 0)).unwrap();
        assert!(result.found);
        assert_eq!(result.cells.last(), Some(&Point::new(5, 2)));
        assert_eq!(result.cost, crate::path_cost(&result.cells));
    }

    #[test]
    fn weighted_heuristic_finds_valid_paths() {
        let graph = graph(&["........", ".######.", "......#.", "####.##.", "........"]);
        let goal = Point::new(0, 0);
        for heuristic_factor in [0.5, 1.5, 2.0, 10.0] {
            let config = PathFinderConfig {
                heuristic_factor,
                ..Default::default()
            };
            let finder = PathFinder::with_config(&graph, goal, config).unwrap();
            let result = finder.find_path(Point::new(0, 4)).unwrap();
            assert!(result.found);
            assert_eq!(result.cells.first(), Some(&Point::new(0, 4)));
            assert_eq!(result.cells.last(), Some(&goal));
            assert_eq!(crate::path_cost(&result.cells), result.cost);
        }
    }

    /// Long distances with a large heuristic factor must not overflow the scored cost.
    #[test]
    fn long_corridor_with_scaled_heuristic() {
        let row = ".".repeat(3000);
        let graph = graph(&[row.as_str()]);
        let goal = Point::new(0, 0);
        for (heuristic, heuristic_factor) in [
            (Heuristic::SquaredEuclidean, 4.0),
            (Heuristic::Octile, 2.0),
            (Heuristic::Octile, 1e8),
        ] {
            let config = PathFinderConfig {
                heuristic,
                heuristic_factor,
                ..Default::default()
            };
            let finder = PathFinder::with_config(&graph, goal, config).unwrap();
            let result = finder.find_path(Point::new(2999, 0)).unwrap();
            assert!(result.found);
            assert_eq!(result.cells.len(), 3000);
            assert_eq!(result.cost, 2999 * C);
            assert_eq!(crate::path_cost(&result.cells), result.cost);
        }
    }

    #[test]
    fn huge_heuristic_factor_on_small_grid() {
        let graph = graph(&["...", "...", "..."]);
        let config = PathFinderConfig {
            heuristic_factor: 1e8,
            ..Default::default()
        };
        let finder = PathFinder::with_config(&graph, Point::new(2, 2), config).unwrap();
        let result = finder.find_path(Point::new(0, 0)).unwrap();
        assert!(result.found);
        assert_eq!(result.cost, 2 * D);
    }

    #[test]
    fn heuristic_lookup() {
        let graph = graph(&["...", "..."]);
        let finder = PathFinder::new(&graph, Point::new(2, 0)).unwrap();
        assert_eq!(finder.heuristic_at(Point::new(0, 1)), Some(C + D));
        assert_eq!(finder.heuristic_at(Point::new(2, 0)), Some(0));
        assert_eq!(finder.heuristic_at(Point::new(3, 0)), None);
    }

    #[test]
    fn turning_points_of_an_l_shape() {
        let result = PathResult {
            found: true,
            cells: vec![
                Point::new(0, 0),
                Point::new(1, 0),
                Point::new(2, 0),
                Point::new(3, 1),
                Point::new(4, 2),
            ],
            waypoints: vec![],
            cost: 0,
        };
        assert_eq!(
            result.turning_points(),
            vec![Point::new(0, 0), Point::new(2, 0), Point::new(4, 2)]
        );
        assert!(PathResult::not_found().turning_points().is_empty());
    }

    #[test]
    fn concurrent_searches_share_one_finder() {
        let graph = graph(&["........", ".######.", "........", ".######.", "........"]);
        let finder = PathFinder::new(&graph, Point::new(7, 4)).unwrap();
        let starts = [Point::new(0, 0), Point::new(3, 0), Point::new(0, 2), Point::new(7, 0)];
        let expected = starts
            .iter()
            .map(|s| finder.find_path(*s).unwrap())
            .collect::<Vec<_>>();
        let finder = &finder;
        let results = std::thread::scope(|scope| {
            let handles = starts
                .iter()
                .map(|s| scope.spawn(move || finder.find_path(*s).unwrap()))
                .collect::<Vec<_>>();
            handles
                .into_iter()
                .map(|h| h.join().unwrap())
                .collect::<Vec<_>>()
        });
        assert_eq!(results, expected);
        assert!(results.iter().all(|r| r.found));
    }
}
