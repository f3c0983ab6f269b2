use core::fmt;

use itertools::Itertools;
use log::{debug, info};

use crate::cell::Cell;
use crate::risk_grid::RiskGrid;
use crate::solver::RiskAstarSolver;
use crate::Path;

/// A continuous path through a sequence of checkpoints. Junction cells between consecutive
/// segments appear only once.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Route {
    cells: Vec<Cell>,
}

/// Figures derived from a [Route] for display.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RouteMetrics {
    /// Number of cells on the route, both endpoints included.
    pub cells: usize,
    /// Number of route cells that carry a risk penalty.
    pub risky_cells: usize,
    pub total_cost: f64,
}

impl Route {
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn into_cells(self) -> Vec<Cell> {
        self.cells
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Cell> {
        self.cells.iter()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Routes always hold at least their start cell.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn first(&self) -> Cell {
        self.cells[0]
    }

    pub fn last(&self) -> Cell {
        self.cells[self.cells.len() - 1]
    }

    pub fn contains(&self, cell: &Cell) -> bool {
        self.cells.contains(cell)
    }

    /// Number of route cells present in the risk map of `grid`.
    pub fn risky_cells(&self, grid: &RiskGrid) -> usize {
        self.cells.iter().filter(|c| grid.is_risky(**c)).count()
    }

    /// Cost of traversing the route, recomputed from the cells rather than taken from the search.
    pub fn total_cost(&self, grid: &RiskGrid) -> f64 {
        let solver = RiskAstarSolver::new();
        self.cells
            .iter()
            .tuple_windows()
            .map(|(a, b)| solver.cost(grid, a, b))
            .sum()
    }

    pub fn metrics(&self, grid: &RiskGrid) -> RouteMetrics {
        RouteMetrics {
            cells: self.len(),
            risky_cells: self.risky_cells(grid),
            total_cost: self.total_cost(grid),
        }
    }
}

impl<'a> IntoIterator for &'a Route {
    type Item = &'a Cell;
    type IntoIter = std::slice::Iter<'a, Cell>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.cells.iter().join(" -> "))
    }
}

impl fmt::Display for RouteMetrics {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "cells: {}, risky cells: {}, total cost: {:.2}",
            self.cells, self.risky_cells, self.total_cost
        )
    }
}

/// Plans routes through ordered checkpoints by chaining single-segment searches.
#[derive(Clone, Debug, Default)]
pub struct RoutePlanner {
    pub solver: RiskAstarSolver,
}

impl RoutePlanner {
    pub fn new(solver: RiskAstarSolver) -> RoutePlanner {
        RoutePlanner { solver }
    }

    /// Computes a route from `start` through every waypoint in order to `goal`. Returns [None] if
    /// start or goal is missing, if any checkpoint is blocked, or if any segment cannot be pathed;
    /// there is no partial route.
    pub fn plan_route(
        &self,
        grid: &RiskGrid,
        start: Option<Cell>,
        waypoints: &[Cell],
        goal: Option<Cell>,
    ) -> Option<Route> {
        let (start, goal) = match (start, goal) {
            (Some(start), Some(goal)) => (start, goal),
            _ => {
                debug!("Route requested without both a start and a goal");
                return None;
            }
        };
        let checkpoints: Vec<Cell> = std::iter::once(start)
            .chain(waypoints.iter().copied())
            .chain(std::iter::once(goal))
            .collect();
        if let Some(blocked) = checkpoints.iter().find(|c| grid.is_blocked(**c)) {
            info!("Checkpoint {} is blocked, no route", blocked);
            return None;
        }

        let mut cells: Vec<Cell> = Vec::new();
        for (i, (from, to)) in checkpoints.iter().tuple_windows().enumerate() {
            if !grid.components_dirty && grid.unreachable(*from, *to) {
                info!("{} is not reachable from {}", to, from);
                return None;
            }
            let segment: Path = match self.solver.find_path(grid, *from, *to) {
                Some(segment) => segment,
                None => {
                    info!("No path for segment {}: {} -> {}", i, from, to);
                    return None;
                }
            };
            let skip = if i == 0 { 0 } else { 1 };
            cells.extend(segment.into_iter().skip(skip));
        }
        debug!(
            "Planned route of {} cells through {} checkpoints",
            cells.len(),
            checkpoints.len()
        );
        Some(Route { cells })
    }
}

/// Plans a route with the default [RoutePlanner]. See [RoutePlanner::plan_route].
pub fn plan_route(
    grid: &RiskGrid,
    start: Option<Cell>,
    waypoints: &[Cell],
    goal: Option<Cell>,
) -> Option<Route> {
    RoutePlanner::default().plan_route(grid, start, waypoints, goal)
}
