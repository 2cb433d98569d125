//! Error types shared by the engines and drivers

use crate::board::Cell;

/// Errors raised by the game model and the search entry points
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HexError {
    #[error("invalid move {cell}: {reason}")]
    InvalidMove { cell: Cell, reason: &'static str },

    #[error("invalid board size {0} (expected 1..={max})", max = crate::board::MAX_BOARD_SIZE)]
    InvalidBoardSize(usize),

    #[error("empty count {given} does not match board ({actual} empty cells)")]
    EmptyCountMismatch { given: usize, actual: usize },

    #[error("invalid search parameter: {0}")]
    InvalidParameter(String),

    #[error("failed to parse board: {0}")]
    Parse(String),
}
