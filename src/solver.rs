use itertools::Itertools;
use log::debug;
use smallvec::SmallVec;

use crate::astar::SearchContext;
use crate::cell::Cell;
use crate::risk_grid::RiskGrid;
use crate::Path;

/// Single-segment A* search over a [RiskGrid] with 8-connected movement.
///
/// The same function serves as step cost and as goal estimate: the euclidean distance between two
/// cells plus the risk of the cell being left. The estimate is not a strict lower bound: a risky
/// goal cell is estimated at its own risk instead of zero. Every other cell pays its risk on the
/// first step anyway, so elsewhere the estimate stays below the remaining cost.
#[derive(Clone, Debug, Default)]
pub struct RiskAstarSolver {
    /// Skip pushing a cell unless it improves on the best known cost to it. Off by default, in
    /// which case every non-closed neighbour is pushed on each expansion.
    pub relax_open_set: bool,
}

impl RiskAstarSolver {
    pub fn new() -> RiskAstarSolver {
        RiskAstarSolver {
            relax_open_set: false,
        }
    }

    pub fn relaxed() -> RiskAstarSolver {
        RiskAstarSolver {
            relax_open_set: true,
        }
    }

    /// Euclidean distance from `from` to `to` plus the risk of `from`.
    pub fn heuristic(&self, grid: &RiskGrid, from: &Cell, to: &Cell) -> f64 {
        from.euclidean_distance(to) + grid.risk_of(*from)
    }

    /// Cost of moving between two neighbouring cells, identical to the heuristic.
    pub fn cost(&self, grid: &RiskGrid, from: &Cell, to: &Cell) -> f64 {
        self.heuristic(grid, from, to)
    }

    /// In-bounds, non-obstacle neighbours of a cell.
    pub fn successors(&self, grid: &RiskGrid, cell: &Cell) -> SmallVec<[Cell; 8]> {
        cell.moore_neighborhood()
            .into_iter()
            .filter(|n| !grid.is_blocked(*n))
            .collect()
    }

    /// Total cost of a path, summing [cost](Self::cost) over consecutive cells.
    pub fn path_cost(&self, grid: &RiskGrid, path: &[Cell]) -> f64 {
        path.iter()
            .tuple_windows()
            .map(|(a, b)| self.cost(grid, a, b))
            .sum()
    }

    /// Computes a path from start to goal, both included. Returns [None] if the goal cannot be
    /// reached or if either endpoint is blocked.
    pub fn find_path(&self, grid: &RiskGrid, start: Cell, goal: Cell) -> Option<Path> {
        let mut ct = SearchContext::with_relaxation(self.relax_open_set);
        self.search(&mut ct, grid, start, goal).map(|(path, _g)| path)
    }

    /// Like [find_path](Self::find_path) but runs in a caller supplied context, which keeps the
    /// search statistics and node arena around for inspection. Also returns the accumulated cost.
    pub fn search(
        &self,
        ct: &mut SearchContext<Cell, f64>,
        grid: &RiskGrid,
        start: Cell,
        goal: Cell,
    ) -> Option<(Path, f64)> {
        if grid.is_blocked(start) || grid.is_blocked(goal) {
            debug!("Segment {} -> {} has a blocked endpoint", start, goal);
            return None;
        }
        ct.relax = self.relax_open_set;
        let result = ct.astar(
            &start,
            |cell| self.successors(grid, cell),
            |from, to| self.cost(grid, from, to),
            |cell| self.heuristic(grid, cell, &goal),
            |cell| *cell == goal,
        );
        debug!(
            "Segment {} -> {}: {} expanded, {} pushed",
            start,
            goal,
            ct.expanded,
            ct.pushed()
        );
        result
    }
}
