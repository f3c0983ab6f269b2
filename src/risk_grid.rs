use core::fmt;

use fxhash::{FxBuildHasher, FxHashSet};
use indexmap::IndexMap;
use log::{debug, info};
use petgraph::unionfind::UnionFind;

use crate::cell::Cell;
use crate::error::GridError;
use crate::MAX_RISK_FRACTION;

pub(crate) type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

/// [RiskGrid] describes the traversable space of a planning request: its dimensions, the set of
/// impassable cells and a map of per-cell risk penalties. In addition it maintains information
/// about connected components of free cells using a [UnionFind] structure so that searches between
/// disconnected cells can be rejected without flood-filling the grid.
#[derive(Clone, Debug)]
pub struct RiskGrid {
    rows: usize,
    cols: usize,
    obstacles: FxHashSet<Cell>,
    risk: FxIndexMap<Cell, f64>,
    pub components: UnionFind<usize>,
    pub components_dirty: bool,
}

impl RiskGrid {
    /// Creates an empty grid with `rows` x `cols` free, risk-free cells.
    pub fn new(rows: usize, cols: usize) -> Result<RiskGrid, GridError> {
        if rows == 0 || cols == 0 {
            return Err(GridError::EmptyDimensions { rows, cols });
        }
        // Cells are addressed with signed coordinates and indexed as `row * cols + col`
        let max = i32::MAX as usize;
        let n_cells = match rows.checked_mul(cols) {
            Some(n) if rows <= max && cols <= max => n,
            _ => return Err(GridError::TooLarge { rows, cols }),
        };
        let mut grid = RiskGrid {
            rows,
            cols,
            obstacles: FxHashSet::default(),
            risk: FxIndexMap::default(),
            components: UnionFind::new(n_cells),
            components_dirty: false,
        };
        grid.generate_components();
        Ok(grid)
    }

    /// Builds a grid from an obstacle set and a risk map in one go.
    pub fn with_layout<O, R>(
        rows: usize,
        cols: usize,
        obstacles: O,
        risk: R,
    ) -> Result<RiskGrid, GridError>
    where
        O: IntoIterator<Item = Cell>,
        R: IntoIterator<Item = (Cell, f64)>,
    {
        let mut grid = RiskGrid::new(rows, cols)?;
        for cell in obstacles {
            grid.check_bounds(cell)?;
            grid.obstacles.insert(cell);
        }
        for (cell, value) in risk {
            grid.set_risk(cell, value)?;
        }
        grid.generate_components();
        Ok(grid)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Length of the grid diagonal, `sqrt(rows² + cols²)`.
    pub fn diagonal(&self) -> f64 {
        (self.rows as f64).hypot(self.cols as f64)
    }

    /// The largest risk value grid generators are expected to assign. Not enforced.
    pub fn max_risk(&self) -> f64 {
        MAX_RISK_FRACTION * self.diagonal()
    }

    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.row >= 0
            && cell.col >= 0
            && (cell.row as usize) < self.rows
            && (cell.col as usize) < self.cols
    }

    /// True if the cell is an obstacle or lies outside the grid.
    pub fn is_blocked(&self, cell: Cell) -> bool {
        !self.in_bounds(cell) || self.obstacles.contains(&cell)
    }

    /// Risk penalty of the cell, zero if it carries none.
    pub fn risk_of(&self, cell: Cell) -> f64 {
        self.risk.get(&cell).copied().unwrap_or(0.0)
    }

    /// True if the cell is present in the risk map.
    pub fn is_risky(&self, cell: Cell) -> bool {
        self.risk.contains_key(&cell)
    }

    pub fn obstacles(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.obstacles.iter()
    }

    /// Risk cells in the order they were assigned.
    pub fn risk_cells(&self) -> impl Iterator<Item = (&Cell, &f64)> + '_ {
        self.risk.iter()
    }

    fn check_bounds(&self, cell: Cell) -> Result<(), GridError> {
        if self.in_bounds(cell) {
            Ok(())
        } else {
            Err(GridError::OutOfBounds {
                cell,
                rows: self.rows,
                cols: self.cols,
            })
        }
    }

    fn ix(&self, cell: Cell) -> usize {
        cell.row as usize * self.cols + cell.col as usize
    }

    fn free_neighbours(&self, cell: Cell) -> impl Iterator<Item = Cell> + '_ {
        cell.moore_neighborhood()
            .into_iter()
            .filter(move |n| !self.is_blocked(*n))
    }

    /// Updates a cell. Joins newly connected components and flags the components as dirty if
    /// components are (potentially) broken apart into multiple.
    pub fn set_obstacle(&mut self, cell: Cell, blocked: bool) -> Result<(), GridError> {
        self.check_bounds(cell)?;
        if blocked {
            if self.obstacles.insert(cell) {
                self.components_dirty = true;
            }
        } else if self.obstacles.remove(&cell) {
            let ix = self.ix(cell);
            let neighbours: Vec<usize> = self.free_neighbours(cell).map(|n| self.ix(n)).collect();
            for n_ix in neighbours {
                self.components.union(ix, n_ix);
            }
        }
        Ok(())
    }

    /// Assigns a risk penalty to a cell, replacing any previous value.
    pub fn set_risk(&mut self, cell: Cell, value: f64) -> Result<(), GridError> {
        self.check_bounds(cell)?;
        if !value.is_finite() || value <= 0.0 {
            return Err(GridError::InvalidRisk { cell, value });
        }
        if value > self.max_risk() {
            debug!(
                "Risk {} at {} exceeds the expected bound {:.3}",
                value,
                cell,
                self.max_risk()
            );
        }
        self.risk.insert(cell, value);
        Ok(())
    }

    /// Removes the risk penalty of a cell, returning it if there was one.
    pub fn clear_risk(&mut self, cell: Cell) -> Option<f64> {
        self.risk.shift_remove(&cell)
    }

    /// Retrieves the component id a given free [Cell] belongs to.
    pub fn get_component(&self, cell: Cell) -> Option<usize> {
        (!self.is_blocked(cell)).then(|| self.components.find(self.ix(cell)))
    }

    /// Checks if start and goal are free and on the same component.
    pub fn reachable(&self, start: Cell, goal: Cell) -> bool {
        !self.unreachable(start, goal)
    }

    /// Checks if start or goal is blocked, or if they are not on the same component.
    pub fn unreachable(&self, start: Cell, goal: Cell) -> bool {
        if self.is_blocked(start) || self.is_blocked(goal) {
            true
        } else {
            !self.components.equiv(self.ix(start), self.ix(goal))
        }
    }

    /// Regenerates the components if they are marked as dirty.
    pub fn update(&mut self) {
        if self.components_dirty {
            info!("Components are dirty: regenerating components");
            self.generate_components();
        }
    }

    /// Generates a new [UnionFind] structure and links up free 8-neighbours to the same components.
    pub fn generate_components(&mut self) {
        let mut components = UnionFind::new(self.rows * self.cols);
        for row in 0..self.rows as i32 {
            for col in 0..self.cols as i32 {
                let cell = Cell::new(row, col);
                if self.is_blocked(cell) {
                    continue;
                }
                // Links to the later half of the neighbourhood suffice to cover every edge once
                for n in [
                    cell.offset(0, 1),
                    cell.offset(1, -1),
                    cell.offset(1, 0),
                    cell.offset(1, 1),
                ] {
                    if !self.is_blocked(n) {
                        components.union(self.ix(cell), self.ix(n));
                    }
                }
            }
        }
        self.components = components;
        self.components_dirty = false;
    }
}

impl fmt::Display for RiskGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in 0..self.rows as i32 {
            let line: String = (0..self.cols as i32)
                .map(|col| {
                    let cell = Cell::new(row, col);
                    if self.obstacles.contains(&cell) {
                        '#'
                    } else if self.is_risky(cell) {
                        '~'
                    } else {
                        '.'
                    }
                })
                .collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queries() {
        let grid = RiskGrid::with_layout(
            3,
            4,
            [Cell::new(1, 1)],
            [(Cell::new(0, 2), 0.5), (Cell::new(1, 1), 2.0)],
        )
        .unwrap();
        assert!(grid.is_blocked(Cell::new(1, 1)));
        assert!(grid.is_blocked(Cell::new(-1, 0)));
        assert!(grid.is_blocked(Cell::new(3, 0)));
        assert!(grid.is_blocked(Cell::new(0, 4)));
        assert!(!grid.is_blocked(Cell::new(2, 3)));
        assert_eq!(grid.risk_of(Cell::new(0, 2)), 0.5);
        assert_eq!(grid.risk_of(Cell::new(0, 0)), 0.0);
        // Obstacles and risk cells are allowed to overlap
        assert!(grid.is_risky(Cell::new(1, 1)));
        assert_eq!(grid.to_string(), "..~.\n.#..\n....\n");
    }

    #[test]
    fn rejects_invalid_input() {
        assert_eq!(
            RiskGrid::new(0, 3).unwrap_err(),
            GridError::EmptyDimensions { rows: 0, cols: 3 }
        );
        let huge = usize::MAX / 2;
        assert_eq!(
            RiskGrid::new(huge, 3).unwrap_err(),
            GridError::TooLarge { rows: huge, cols: 3 }
        );
        let wide = i32::MAX as usize + 1;
        assert_eq!(
            RiskGrid::new(1, wide).unwrap_err(),
            GridError::TooLarge { rows: 1, cols: wide }
        );
        assert!(matches!(
            RiskGrid::with_layout(wide, 1, [], []),
            Err(GridError::TooLarge { .. })
        ));
        let mut grid = RiskGrid::new(2, 2).unwrap();
        assert!(matches!(
            grid.set_obstacle(Cell::new(2, 0), true),
            Err(GridError::OutOfBounds { .. })
        ));
        assert!(matches!(
            grid.set_risk(Cell::new(0, 0), 0.0),
            Err(GridError::InvalidRisk { .. })
        ));
        assert!(matches!(
            grid.set_risk(Cell::new(0, 0), f64::NAN),
            Err(GridError::InvalidRisk { .. })
        ));
        // Values above the generator bound are accepted as supplied
        assert!(grid.set_risk(Cell::new(0, 0), 100.0).is_ok());
        assert_eq!(grid.clear_risk(Cell::new(0, 0)), Some(100.0));
        assert!(!grid.is_risky(Cell::new(0, 0)));
    }

    /// Tests whether cells are correctly mapped to different connected components
    #[test]
    fn test_component_generation() {
        // |.#.|
        // |.#.|
        let grid =
            RiskGrid::with_layout(2, 3, [Cell::new(0, 1), Cell::new(1, 1)], []).unwrap();
        assert!(grid.reachable(Cell::new(0, 0), Cell::new(1, 0)));
        assert!(grid.unreachable(Cell::new(0, 0), Cell::new(0, 2)));
        assert!(grid.unreachable(Cell::new(0, 0), Cell::new(0, 1)));
        assert_eq!(grid.get_component(Cell::new(0, 1)), None);
    }

    #[test]
    fn diagonal_gaps_connect() {
        // |.#|
        // |#.|
        let grid =
            RiskGrid::with_layout(2, 2, [Cell::new(0, 1), Cell::new(1, 0)], []).unwrap();
        assert!(grid.reachable(Cell::new(0, 0), Cell::new(1, 1)));
    }

    #[test]
    fn incremental_updates() {
        let mut grid = RiskGrid::new(3, 3).unwrap();
        for row in 0..3 {
            grid.set_obstacle(Cell::new(row, 1), true).unwrap();
        }
        assert!(grid.components_dirty);
        grid.update();
        assert!(!grid.components_dirty);
        assert!(grid.unreachable(Cell::new(0, 0), Cell::new(0, 2)));
        // Freeing a cell joins components without a full regeneration
        grid.set_obstacle(Cell::new(2, 1), false).unwrap();
        assert!(!grid.components_dirty);
        assert!(grid.reachable(Cell::new(0, 0), Cell::new(0, 2)));
    }
}
