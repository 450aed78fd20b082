use occupancy_pathfinding::{
    GraphConfig, NodeGraph, OccupancyGrid, PathFinder, PathFinderConfig, WorldPosition,
};

// Plans between two world positions on a 0.5 unit grid whose bottom left corner sits at
// (-2, -1), once with corner cutting and once without.
fn main() -> occupancy_pathfinding::Result<()> {
    let field = OccupancyGrid::from_ascii(
        &[
            "..........",
            "....#.....",
            "...#..#...",
            "..#....#..",
            "..........",
        ],
        WorldPosition::new(-2.0, -1.0),
        0.5,
    )?;
    println!("{}", field);
    let from = WorldPosition::new(-1.8, -0.9);
    let to = WorldPosition::new(2.9, 1.4);
    let (Some(start), Some(goal)) = (field.world_to_cell(from), field.world_to_cell(to)) else {
        println!("Endpoints lie outside the field");
        return Ok(());
    };

    for allow_corner_cutting in [true, false] {
        let graph = NodeGraph::build_with_config(&field, GraphConfig { allow_corner_cutting });
        let finder = PathFinder::with_config(&graph, goal, PathFinderConfig::default())?;
        let result = finder.find_path(start)?;
        println!(
            "corner cutting: {allow_corner_cutting}, found: {}, length: {:.2} cells",
            result.found,
            result.unit_cost()
        );
        for waypoint in &result.waypoints {
            println!("  {}", waypoint);
        }
        println!("  turning points: {:?}", result.turning_points());
    }
    Ok(())
}
