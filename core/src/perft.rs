use crate::board::Board;
use crate::error::BoardError;
use crate::move_gen::all_moves_for_color;
use crate::types::{Color, Move};

/// Perft (performance test) results at each depth.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PerftResults {
    pub nodes: u64,
    pub captures: u64,
    /// Captures of more than one piece
    pub multi_captures: u64,
    pub promotions: u64,
}

impl PerftResults {
    /// Combines results from child nodes.
    pub fn add(&mut self, other: &Self) {
        self.nodes += other.nodes;
        self.captures += other.captures;
        self.multi_captures += other.multi_captures;
        self.promotions += other.promotions;
    }
}

/// Counts leaf nodes of the move tree to the given depth, `color` moving first.
pub fn perft(board: &Board, color: Color, depth: u8) -> Result<u64, BoardError> {
    if depth == 0 {
        return Ok(1);
    }

    let mut scratch = board.clone();
    let successors = all_moves_for_color(&mut scratch, color)?;

    if depth == 1 {
        return Ok(successors.len() as u64);
    }

    let mut nodes = 0;
    for s in &successors {
        nodes += perft(&s.board, color.opponent(), depth - 1)?;
    }
    Ok(nodes)
}

/// Performs perft with a per-move breakdown at the root.
pub fn perft_divide(
    board: &Board,
    color: Color,
    depth: u8,
) -> Result<Vec<(Move, u64)>, BoardError> {
    let mut scratch = board.clone();
    let successors = all_moves_for_color(&mut scratch, color)?;

    let mut results = Vec::with_capacity(successors.len());
    for s in successors {
        let nodes = if depth <= 1 {
            1
        } else {
            perft(&s.board, color.opponent(), depth - 1)?
        };
        results.push((s.mv, nodes));
    }
    Ok(results)
}

/// Performs perft with move classification at the leaves.
pub fn perft_detailed(
    board: &Board,
    color: Color,
    depth: u8,
) -> Result<PerftResults, BoardError> {
    let mut results = PerftResults::default();

    if depth == 0 {
        results.nodes = 1;
        return Ok(results);
    }

    let mut scratch = board.clone();
    let kings_before = board.kings(color);

    for s in all_moves_for_color(&mut scratch, color)? {
        if depth == 1 {
            results.nodes += 1;
            if s.mv.is_capture() {
                results.captures += 1;
                if s.mv.legs() > 1 {
                    results.multi_captures += 1;
                }
            }
            // A capture chain can take kings, never crown more than one man
            if s.board.kings(color) > kings_before {
                results.promotions += 1;
            }
        } else {
            results.add(&perft_detailed(&s.board, color.opponent(), depth - 1)?);
        }
    }

    Ok(results)
}

/// Known node counts from the starting position, Black to move.
pub mod positions {
    pub const STARTING_POSITION: &[(u8, u64)] = &[
        (1, 7),
        (2, 49),
        (3, 302),
        (4, 1469),
        (5, 7361),
        (6, 36_768),
        (7, 179_740),
    ];
}
