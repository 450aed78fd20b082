use grid_util::point::Point;
use occupancy_pathfinding::{NodeGraph, OccupancyGrid, PathFinder, WorldPosition};

// In this example a path is found on a grid with shape
// #####
// #S  #
// # # #
// #  E#
// #####
// S marks the start
// E marks the end
fn main() -> occupancy_pathfinding::Result<()> {
    let field = OccupancyGrid::from_ascii(
        &["#####", "#S..#", "#.#.#", "#..E#", "#####"],
        WorldPosition::default(),
        1.0,
    )?;
    let graph = NodeGraph::build(&field);
    let start = Point::new(1, 3);
    let end = Point::new(3, 1);
    let finder = PathFinder::new(&graph, end)?;
    let result = finder.find_path(start)?;
    if result.found {
        println!("A path has been found:");
        for p in result.cells {
            println!("{:?}", p);
        }
    }
    Ok(())
}
