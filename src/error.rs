use thiserror::Error;

use crate::cell::Cell;

/// Errors raised while building or editing a [RiskGrid](crate::risk_grid::RiskGrid).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GridError {
    #[error("grid dimensions must be positive, got {rows}x{cols}")]
    EmptyDimensions { rows: usize, cols: usize },

    #[error("grid dimensions {rows}x{cols} exceed the addressable cell range")]
    TooLarge { rows: usize, cols: usize },

    #[error("cell {cell} lies outside the {rows}x{cols} grid")]
    OutOfBounds { cell: Cell, rows: usize, cols: usize },

    /// Risk values must be finite and strictly positive; zero risk is expressed by absence.
    #[error("invalid risk value {value} for cell {cell}")]
    InvalidRisk { cell: Cell, value: f64 },
}

/// Rejected edits to a [PlanningSession](crate::session::PlanningSession).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("cell {cell} is blocked")]
    Blocked { cell: Cell },

    #[error("goal {cell} coincides with the start")]
    GoalIsStart { cell: Cell },

    #[error("waypoint {cell} coincides with the start")]
    WaypointIsStart { cell: Cell },

    #[error("waypoint {cell} was already added")]
    DuplicateWaypoint { cell: Cell },
}
