//! Error types for the rule engine, search and configuration

use thiserror::Error;

use crate::board::Pos;

/// Errors produced by move validation, game bookkeeping and search.
///
/// The rejection variants (`OutOfBounds` through `GameOver`) are recoverable:
/// the caller's board is untouched and the human may try again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GomokuError {
    #[error("coordinate ({row}, {col}) is outside the board")]
    OutOfBounds { row: i32, col: i32 },

    #[error("cell ({}, {}) is already occupied", .0.row, .0.col)]
    CellOccupied(Pos),

    #[error("move at ({}, {}) would create two free threes", .0.row, .0.col)]
    DoubleThreeViolation(Pos),

    #[error("illegal move: {0}")]
    IllegalMove(&'static str),

    #[error("the game is already over")]
    GameOver,

    #[error("no legal move available")]
    NoLegalMoves,

    /// Raised inside the search when the time budget runs out. The searcher
    /// turns it into a result from the last completed depth.
    #[error("search time budget exceeded after {elapsed_ms} ms")]
    SearchTimeExceeded { elapsed_ms: u64 },

    #[error("board invariant violated: {0}")]
    InvariantViolation(String),
}

impl GomokuError {
    /// Whether the error is a move rejection the host can recover from.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            GomokuError::OutOfBounds { .. }
                | GomokuError::CellOccupied(_)
                | GomokuError::DoubleThreeViolation(_)
                | GomokuError::IllegalMove(_)
                | GomokuError::GameOver
        )
    }
}

/// Errors from loading or validating an [`EngineConfig`](crate::config::EngineConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, GomokuError>;
