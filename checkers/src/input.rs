use checkers_core::{Coord, Successor};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotationError {
    #[error("empty input")]
    Empty,
    #[error("'{0}' is not a cell (expected a row letter a-h and a column 1-8, e.g. c2)")]
    BadCoordinate(String),
    #[error("no piece of yours that can move stands on {0}")]
    NotMovable(Coord),
    #[error("{from} cannot move to {to}")]
    Unreachable { from: Coord, to: Coord },
    #[error("{0} is not a legal move")]
    Illegal(String),
}

/// Parses a single cell such as `c2`.
pub fn parse_coord(text: &str) -> Result<Coord, NotationError> {
    Coord::from_notation(text).ok_or_else(|| NotationError::BadCoordinate(text.trim().to_string()))
}

/// Splits `c2-d3`, `c2xe4xg6` or `c2 e4` into cells.
pub fn parse_path(text: &str) -> Result<Vec<Coord>, NotationError> {
    let cells: Vec<&str> = text
        .split(|c: char| c == '-' || c == 'x' || c == 'X' || c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .collect();
    if cells.is_empty() {
        return Err(NotationError::Empty);
    }
    cells.into_iter().map(parse_coord).collect()
}

/// Checks that the typed cell holds a piece with at least one legal move.
pub fn select_piece(legal: &[Successor], text: &str) -> Result<Coord, NotationError> {
    let from = parse_coord(text)?;
    if legal.iter().any(|s| s.mv.from() == from) {
        Ok(from)
    } else {
        Err(NotationError::NotMovable(from))
    }
}

/// Picks the legal move starting at `from` and ending at the typed target.
/// A chain is identified by its final landing cell unless two chains share it,
/// in which case the first in generation order is taken.
pub fn select_target(
    legal: &[Successor],
    from: Coord,
    text: &str,
) -> Result<Successor, NotationError> {
    let to = parse_coord(text)?;
    legal
        .iter()
        .find(|s| s.mv.from() == from && s.mv.to() == to)
        .cloned()
        .ok_or(NotationError::Unreachable { from, to })
}

/// Resolves a full move typed on one line. Two cells name origin and final
/// landing; longer paths must match a chain exactly.
pub fn select_move(legal: &[Successor], text: &str) -> Result<Successor, NotationError> {
    let path = parse_path(text)?;
    if path.len() < 2 {
        return Err(NotationError::Illegal(text.trim().to_string()));
    }
    let found = if path.len() == 2 {
        legal
            .iter()
            .find(|s| s.mv.from() == path[0] && s.mv.to() == path[1])
    } else {
        legal.iter().find(|s| s.mv.path() == path.as_slice())
    };
    found
        .cloned()
        .ok_or_else(|| NotationError::Illegal(text.trim().to_string()))
}

/// Human-readable list of the moves on offer.
pub fn describe_moves(legal: &[Successor]) -> String {
    legal
        .iter()
        .map(|s| s.mv.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
