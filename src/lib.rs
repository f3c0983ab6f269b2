//! # risk_pathfinding
//!
//! Risk-aware route planning on a 2D occupancy grid. Routes are computed with
//! [A*](https://en.wikipedia.org/wiki/A*_search_algorithm) over 8-connected cells, from a start
//! cell through an ordered list of waypoints to a goal cell. Cells may carry a risk penalty which
//! is added to the cost of every move leaving them. Pre-computes
//! [connected components](https://en.wikipedia.org/wiki/Component_(graph_theory))
//! to avoid flood-filling behaviour if no path exists.
//!
//! ```
//! use risk_pathfinding::{plan_route, Cell, RiskGrid};
//!
//! let mut grid = RiskGrid::new(5, 5).unwrap();
//! grid.set_obstacle(Cell::new(1, 1), true).unwrap();
//! grid.set_risk(Cell::new(2, 2), 0.5).unwrap();
//! grid.update();
//!
//! let route = plan_route(&grid, Some(Cell::new(0, 0)), &[], Some(Cell::new(4, 4))).unwrap();
//! assert_eq!(route.first(), Cell::new(0, 0));
//! assert_eq!(route.last(), Cell::new(4, 4));
//! println!("{}", route.metrics(&grid));
//! ```
pub mod astar;
pub mod cell;
pub mod error;
pub mod risk_grid;
pub mod route;
pub mod session;
pub mod solver;

pub use cell::Cell;
pub use error::{GridError, SessionError};
pub use risk_grid::RiskGrid;
pub use route::{plan_route, Route, RouteMetrics, RoutePlanner};
pub use session::PlanningSession;
pub use solver::RiskAstarSolver;

/// Ordered cells from a segment's start to its goal, both included.
pub type Path = Vec<Cell>;

/// Fraction of the grid diagonal that grid generators keep risk values under.
pub const MAX_RISK_FRACTION: f64 = 0.1;
