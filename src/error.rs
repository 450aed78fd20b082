//! Error types for graph construction and search.

use grid_util::point::Point;
use thiserror::Error;

/// Structural failures. A search that simply finds no path is not an error, see
/// [PathResult::found](crate::PathResult::found).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PathError {
    #[error("start cell {0} is not a free cell of the node graph")]
    InvalidStart(Point),

    #[error("goal cell {0} is not a free cell of the node graph")]
    InvalidGoal(Point),

    #[error("search gave up after expanding {expansions} nodes")]
    SearchBudgetExceeded { expansions: usize },

    #[error("cell resolution must be finite and positive, got {0}")]
    InvalidResolution(f32),

    #[error("map row {row} has {found} cells, expected {expected}")]
    MalformedMap {
        row: usize,
        expected: usize,
        found: usize,
    },
}

pub type Result<T> = std::result::Result<T, PathError>;
