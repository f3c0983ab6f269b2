use risk_pathfinding::{plan_route, Cell, RiskGrid};

// In this example a route is planned on a 5x7 grid with shape
//  _______
// |S  #   |
// |   # ~ |
// |   W ~ |
// |   # ~G|
// |   #   |
//  _______
// where
// - # marks an obstacle
// - ~ marks a risk cell
// - W marks a waypoint the route has to pass
// - S marks the start
// - G marks the goal

fn main() {
    let obstacles = [0, 1, 3, 4].map(|row| Cell::new(row, 3));
    let risk = (1..4).map(|row| (Cell::new(row, 5), 0.8));
    let grid = RiskGrid::with_layout(5, 7, obstacles, risk).unwrap();
    println!("{}", grid);
    let start = Cell::new(0, 0);
    let waypoint = Cell::new(2, 3);
    let goal = Cell::new(3, 6);
    match plan_route(&grid, Some(start), &[waypoint], Some(goal)) {
        Some(route) => {
            println!("Route: {}", route);
            println!("{}", route.metrics(&grid));
        }
        None => println!("No route found"),
    }
}
