use rand::prelude::*;
use risk_pathfinding::{PlanningSession, RoutePlanner};
use risk_pathfinding_scenarios::{random_free_cell, random_grid, ScenarioConfig};

// Plans routes on a few randomly generated 30x30 fields with two waypoints each, resetting the
// session between fields.

const MAX_ATTEMPTS: usize = 1000;

fn main() {
    let config = ScenarioConfig::default();
    let mut rng = StdRng::seed_from_u64(7);
    let mut session = PlanningSession::new(random_grid(&config, &mut rng));
    let planner = RoutePlanner::default();
    for round in 0..3 {
        if round > 0 {
            session.reset(random_grid(&config, &mut rng));
        }
        println!("{}", session.grid());
        // Edits on blocked or duplicate cells are rejected; give up on the field after a while
        for _ in 0..MAX_ATTEMPTS {
            let Some(cell) = random_free_cell(session.grid(), &mut rng) else {
                break;
            };
            if session.start().is_none() {
                let _ = session.set_start(cell);
            } else if session.goal().is_none() {
                let _ = session.set_goal(cell);
            } else if session.waypoints().len() < 2 {
                if let Err(e) = session.add_waypoint(cell) {
                    println!("Skipping waypoint: {}", e);
                }
            } else {
                break;
            }
        }
        if session.start().is_none() || session.goal().is_none() {
            println!("Could not place start and goal\n");
            continue;
        }
        match session.plan(&planner) {
            Some(route) => println!("{}\n{}\n", route, route.metrics(session.grid())),
            None => println!("No route found\n"),
        }
    }
}
