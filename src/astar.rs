//! A best-first search core in the shape of
//! [pathfinding's astar function](https://docs.rs/pathfinding/latest/pathfinding/directed/astar/index.html),
//! driven by [PriorityFrontier] with lazy deletion of stale entries and an optional expansion
//! budget.
use crate::frontier::PriorityFrontier;
use fxhash::FxBuildHasher;
use indexmap::map::Entry::{Occupied, Vacant};
use indexmap::IndexMap;
use num_traits::Zero;
use std::hash::Hash;

type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

/// How a call to [astar] ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchOutcome<N, C> {
    /// The path runs from the start to the first node accepted by `success`, both included.
    Found {
        path: Vec<N>,
        cost: C,
        expansions: usize,
    },
    /// Every node reachable from the start was expanded without success.
    Exhausted { expansions: usize },
    BudgetExceeded { expansions: usize },
}

fn reverse_path<N, V, F>(parents: &FxIndexMap<N, V>, mut parent: F, start: usize) -> Vec<N>
where
    N: Eq + Hash + Clone,
    F: FnMut(&V) -> usize,
{
    let mut i = start;
    let mut path: Vec<N> = std::iter::from_fn(|| {
        parents.get_index(i).map(|(node, value)| {
            i = parent(value);
            node.clone()
        })
    })
    .collect();
    path.reverse();
    path
}

/// Searches from `start` until `success` accepts a node. `successors` yields neighbours with the
/// cost of moving to them and `heuristic` estimates the remaining cost. A node's best-known cost
/// and its predecessor are only replaced when a strictly cheaper route to it is found.
///
/// `max_expansions` limits how many nodes may be expanded. The start node is tested for success
/// before anything is expanded, so a zero budget still answers `start == goal` searches.
pub fn astar<N, C, FN, IN, FH, FS>(
    start: &N,
    mut successors: FN,
    mut heuristic: FH,
    mut success: FS,
    max_expansions: Option<usize>,
) -> SearchOutcome<N, C>
where
    N: Eq + Hash + Clone,
    C: Zero + Ord + Copy,
    FN: FnMut(&N) -> IN,
    IN: IntoIterator<Item = (N, C)>,
    FH: FnMut(&N) -> C,
    FS: FnMut(&N) -> bool,
{
    let mut frontier: PriorityFrontier<(usize, C), C> = PriorityFrontier::new();
    // Index 0 is the start. Values hold the index of the predecessor and the best-known cost;
    // absent nodes have not been reached yet.
    let mut parents: FxIndexMap<N, (usize, C)> = FxIndexMap::default();
    parents.insert(start.clone(), (usize::MAX, Zero::zero()));
    frontier.push((0, Zero::zero()), heuristic(start));

    let mut expansions = 0;
    while let Some(((index, cost), _)) = frontier.pop_min() {
        let successors = {
            let Some((node, &(_, best))) = parents.get_index(index) else {
                continue;
            };
            // The node was pushed again with a lower cost after this entry was queued.
            if cost > best {
                continue;
            }
            if success(node) {
                let path = reverse_path(&parents, |&(p, _)| p, index);
                return SearchOutcome::Found {
                    path,
                    cost,
                    expansions,
                };
            }
            if max_expansions.is_some_and(|max| expansions >= max) {
                return SearchOutcome::BudgetExceeded { expansions };
            }
            expansions += 1;
            successors(node)
        };
        for (successor, move_cost) in successors {
            let new_cost = cost + move_cost;
            let h;
            let n;
            match parents.entry(successor) {
                Vacant(e) => {
                    h = heuristic(e.key());
                    n = e.index();
                    e.insert((index, new_cost));
                }
                Occupied(mut e) => {
                    if e.get().1 > new_cost {
                        h = heuristic(e.key());
                        n = e.index();
                        e.insert((index, new_cost));
                    } else {
                        continue;
                    }
                }
            }
            frontier.push((n, new_cost), new_cost + h);
        }
    }
    SearchOutcome::Exhausted { expansions }
}
