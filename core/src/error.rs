//! Error types for the checkers core.
//!
//! Board errors are precondition breaches: the rule engine never triggers
//! them on a consistent board, so one surfacing during search means an
//! invariant has been broken.

use crate::types::{Coord, Move};
use thiserror::Error;

/// Errors raised by board mutation and move generation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    /// Row or column outside `0..8`
    #[error("invalid coordinate ({row}, {col}): must be within 0..8")]
    InvalidCoordinate { row: i32, col: i32 },

    /// Placement onto a cell that already holds a piece
    #[error("cell {0} is already occupied")]
    OccupiedCell(Coord),

    /// Removal from, or move out of, a cell with no piece
    #[error("cell {0} is empty")]
    EmptyCell(Coord),
}

/// Errors raised while parsing a board diagram.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("expected 8 rows, got {0}")]
    RowCount(usize),

    #[error("row {row} has {width} cells, expected 8")]
    RowWidth { row: usize, width: usize },

    #[error("invalid piece character '{0}'")]
    InvalidPiece(char),

    #[error("piece on light square {0}")]
    LightSquare(Coord),

    #[error(transparent)]
    Board(#[from] BoardError),
}

/// Errors raised by game flow.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("illegal move: {0}")]
    IllegalMove(Move),

    #[error("the game is already over")]
    GameOver,

    #[error(transparent)]
    Board(#[from] BoardError),
}
