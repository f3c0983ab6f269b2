use log::info;

use crate::cell::Cell;
use crate::error::SessionError;
use crate::risk_grid::RiskGrid;
use crate::route::{Route, RoutePlanner};

/// Caller-owned planning state: the grid together with the start, goal and waypoints picked on it.
/// Edits are validated against the grid; routes are computed on demand and never cached.
#[derive(Clone, Debug)]
pub struct PlanningSession {
    grid: RiskGrid,
    start: Option<Cell>,
    goal: Option<Cell>,
    waypoints: Vec<Cell>,
}

impl PlanningSession {
    pub fn new(grid: RiskGrid) -> PlanningSession {
        PlanningSession {
            grid,
            start: None,
            goal: None,
            waypoints: Vec::new(),
        }
    }

    pub fn grid(&self) -> &RiskGrid {
        &self.grid
    }

    pub fn start(&self) -> Option<Cell> {
        self.start
    }

    pub fn goal(&self) -> Option<Cell> {
        self.goal
    }

    pub fn waypoints(&self) -> &[Cell] {
        &self.waypoints
    }

    /// Replaces the grid and forgets every checkpoint.
    pub fn reset(&mut self, grid: RiskGrid) {
        info!("Resetting session on a {}x{} grid", grid.rows(), grid.cols());
        self.grid = grid;
        self.start = None;
        self.goal = None;
        self.waypoints.clear();
    }

    fn check_free(&self, cell: Cell) -> Result<(), SessionError> {
        if self.grid.is_blocked(cell) {
            Err(SessionError::Blocked { cell })
        } else {
            Ok(())
        }
    }

    pub fn set_start(&mut self, cell: Cell) -> Result<(), SessionError> {
        self.check_free(cell)?;
        self.start = Some(cell);
        Ok(())
    }

    pub fn set_goal(&mut self, cell: Cell) -> Result<(), SessionError> {
        self.check_free(cell)?;
        if self.start == Some(cell) {
            return Err(SessionError::GoalIsStart { cell });
        }
        self.goal = Some(cell);
        Ok(())
    }

    /// Appends a waypoint. Waypoints are visited in the order they were added.
    pub fn add_waypoint(&mut self, cell: Cell) -> Result<(), SessionError> {
        self.check_free(cell)?;
        if self.start == Some(cell) {
            return Err(SessionError::WaypointIsStart { cell });
        }
        if self.waypoints.contains(&cell) {
            return Err(SessionError::DuplicateWaypoint { cell });
        }
        self.waypoints.push(cell);
        Ok(())
    }

    pub fn clear_waypoints(&mut self) {
        self.waypoints.clear();
    }

    /// Plans a route through the current checkpoints.
    pub fn plan(&self, planner: &RoutePlanner) -> Option<Route> {
        planner.plan_route(&self.grid, self.start, &self.waypoints, self.goal)
    }
}
