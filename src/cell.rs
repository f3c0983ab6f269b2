use core::fmt;

/// Offsets (drow, dcol) of the 8-neighbourhood in the order successors are generated: the four
/// axis-aligned moves first, then the four diagonals. The order is observable since it decides
/// which of several equal-cost nodes enters the open set first.
pub const MOORE_OFFSETS: [(i32, i32); 8] = [
    (0, -1),
    (0, 1),
    (-1, 0),
    (1, 0),
    (-1, -1),
    (-1, 1),
    (1, -1),
    (1, 1),
];

/// A (row, column) coordinate on the grid. Coordinates are signed so that neighbours of border
/// cells can be formed; such cells are simply reported as blocked by the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Cell {
    pub row: i32,
    pub col: i32,
}

impl Cell {
    pub const fn new(row: i32, col: i32) -> Cell {
        Cell { row, col }
    }

    /// Straight-line distance between the centres of two cells.
    pub fn euclidean_distance(&self, other: &Cell) -> f64 {
        let d_row = (self.row - other.row) as f64;
        let d_col = (self.col - other.col) as f64;
        d_row.hypot(d_col)
    }

    /// Number of king moves between two cells.
    pub fn move_distance(&self, other: &Cell) -> i32 {
        (self.row - other.row)
            .abs()
            .max((self.col - other.col).abs())
    }

    /// True if `other` is one of the 8 neighbours of this cell.
    pub fn is_adjacent(&self, other: &Cell) -> bool {
        self.move_distance(other) == 1
    }

    pub fn offset(&self, d_row: i32, d_col: i32) -> Cell {
        Cell::new(self.row + d_row, self.col + d_col)
    }

    /// All 8 neighbours in [MOORE_OFFSETS] order, including ones outside any grid.
    pub fn moore_neighborhood(&self) -> [Cell; 8] {
        MOORE_OFFSETS.map(|(d_row, d_col)| self.offset(d_row, d_col))
    }
}

impl From<(i32, i32)> for Cell {
    fn from((row, col): (i32, i32)) -> Cell {
        Cell::new(row, col)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
