use crate::error::{PathError, Result};
use core::fmt;
use grid_util::grid::Grid;
use grid_util::point::Point;
use grid_util::BoolGrid;

/// A position in world space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WorldPosition {
    pub x: f32,
    pub y: f32,
}

impl WorldPosition {
    pub const fn new(x: f32, y: f32) -> WorldPosition {
        WorldPosition { x, y }
    }
    pub fn distance(&self, other: &WorldPosition) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl fmt::Display for WorldPosition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}

/// The read-only view of an occupancy field that [NodeGraph](crate::NodeGraph) is built from.
/// Queries are only ever made for `0 <= x < width` and `0 <= y < height`.
pub trait OccupancyField {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn is_free(&self, x: i32, y: i32) -> bool;
    /// World position of the center of the cell at `(x, y)`.
    fn cell_center(&self, x: i32, y: i32) -> WorldPosition;
}

/// [OccupancyGrid] stores blocked cells in a [BoolGrid] where `true` means occupied, together with
/// the square cell resolution and the world position of the bottom left corner of cell `(0, 0)`.
/// Cells are indexed row-major starting from the bottom row.
#[derive(Clone, Debug)]
pub struct OccupancyGrid {
    pub grid: BoolGrid,
    origin: WorldPosition,
    resolution: f32,
}

impl OccupancyGrid {
    /// Creates a grid of free cells.
    pub fn new(
        width: usize,
        height: usize,
        origin: WorldPosition,
        resolution: f32,
    ) -> Result<OccupancyGrid> {
        OccupancyGrid::from_bool_grid(BoolGrid::new(width, height, false), origin, resolution)
    }

    pub fn from_bool_grid(
        grid: BoolGrid,
        origin: WorldPosition,
        resolution: f32,
    ) -> Result<OccupancyGrid> {
        if !resolution.is_finite() || resolution <= 0.0 {
            return Err(PathError::InvalidResolution(resolution));
        }
        Ok(OccupancyGrid {
            grid,
            origin,
            resolution,
        })
    }

    /// Parses a map drawn with `#` for blocked cells and any other character for free cells.
    /// The first row is the top of the map, so the last row ends up at `y = 0`.
    pub fn from_ascii<S: AsRef<str>>(
        rows: &[S],
        origin: WorldPosition,
        resolution: f32,
    ) -> Result<OccupancyGrid> {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.as_ref().chars().count());
        let mut grid = BoolGrid::new(width, height, false);
        for (row, line) in rows.iter().enumerate() {
            let found = line.as_ref().chars().count();
            if found != width {
                return Err(PathError::MalformedMap {
                    row,
                    expected: width,
                    found,
                });
            }
            let y = height - 1 - row;
            for (x, c) in line.as_ref().chars().enumerate() {
                grid.set(x, y, c == '#');
            }
        }
        OccupancyGrid::from_bool_grid(grid, origin, resolution)
    }

    pub fn origin(&self) -> WorldPosition {
        self.origin
    }
    pub fn resolution(&self) -> f32 {
        self.resolution
    }
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.grid.width() && (y as usize) < self.grid.height()
    }
    /// Out of bounds cells count as blocked.
    pub fn is_blocked(&self, x: i32, y: i32) -> bool {
        !self.in_bounds(x, y) || self.grid.get(x as usize, y as usize)
    }
    pub fn set_blocked(&mut self, x: i32, y: i32, blocked: bool) {
        if self.in_bounds(x, y) {
            self.grid.set(x as usize, y as usize, blocked);
        }
    }

    pub fn cell_index(&self, x: i32, y: i32) -> usize {
        y as usize * self.grid.width() + x as usize
    }
    pub fn index_to_cell(&self, index: usize) -> Point {
        let w = self.grid.width();
        Point::new((index % w) as i32, (index / w) as i32)
    }

    /// Converts a cell coordinate to the world position of its center, whether or not the cell
    /// lies inside the grid.
    pub fn cell_to_world(&self, cell: Point) -> WorldPosition {
        WorldPosition::new(
            self.origin.x + self.resolution * (cell.x as f32 + 0.5),
            self.origin.y + self.resolution * (cell.y as f32 + 0.5),
        )
    }

    /// The cell containing `position`, if it lies inside the grid.
    pub fn world_to_cell(&self, position: WorldPosition) -> Option<Point> {
        let x = ((position.x - self.origin.x) / self.resolution).floor();
        let y = ((position.y - self.origin.y) / self.resolution).floor();
        if !x.is_finite() || !y.is_finite() {
            return None;
        }
        let (x, y) = (x as i32, y as i32);
        self.in_bounds(x, y).then(|| Point::new(x, y))
    }

    pub fn free_cells(&self) -> Vec<Point> {
        self.cells_with(false)
    }
    pub fn blocked_cells(&self) -> Vec<Point> {
        self.cells_with(true)
    }
    fn cells_with(&self, blocked: bool) -> Vec<Point> {
        let mut cells = Vec::new();
        for y in 0..self.grid.height() {
            for x in 0..self.grid.width() {
                if self.grid.get(x, y) == blocked {
                    cells.push(Point::new(x as i32, y as i32));
                }
            }
        }
        cells
    }
}

impl OccupancyField for OccupancyGrid {
    fn width(&self) -> usize {
        self.grid.width()
    }
    fn height(&self) -> usize {
        self.grid.height()
    }
    fn is_free(&self, x: i32, y: i32) -> bool {
        !self.is_blocked(x, y)
    }
    fn cell_center(&self, x: i32, y: i32) -> WorldPosition {
        self.cell_to_world(Point::new(x, y))
    }
}

impl fmt::Display for OccupancyGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for y in (0..self.grid.height()).rev() {
            let row = (0..self.grid.width())
                .map(|x| if self.grid.get(x, y) { '#' } else { '.' })
                .collect::<String>();
            writeln!(f, "{}", row)?;
        }
        Ok(())
    }
}
