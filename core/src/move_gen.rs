//! Move and capture generation.
//!
//! Capture chains are explored depth-first on the caller's board: each jump is
//! applied in place through a [`Jump`] guard whose `Drop` undoes it, so the
//! board is restored on every exit path, including early error returns.

use crate::board::Board;
use crate::error::BoardError;
use crate::types::{Color, Coord, Move, Piece, Step};
use tracing::error;

/// A legal move together with the board it produces.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Successor {
    pub mv: Move,
    pub board: Board,
}

/// Directions a piece may move or capture in, in canonical scan order.
/// Men only use the two forward diagonals.
fn directions(piece: Piece) -> impl Iterator<Item = Step> {
    let reach = if piece.is_king() { 4 } else { 2 };
    piece.color.directions().into_iter().take(reach)
}

/// Logs a consistency breach once, at the point it is detected.
fn breach(err: BoardError) -> BoardError {
    error!(%err, "board consistency breach during move generation");
    err
}

fn off_board(from: Coord, step: Step) -> BoardError {
    BoardError::InvalidCoordinate {
        row: i32::from(from.row()) + i32::from(step.rows),
        col: i32::from(from.col()) + i32::from(step.cols),
    }
}

/// Single-step moves available to the piece on `from`.
/// Returns an empty list for an empty cell.
pub fn simple_moves(board: &Board, from: Coord) -> Vec<Step> {
    let Some(piece) = board.get(from) else {
        return Vec::new();
    };
    directions(piece)
        .filter(|&step| from.offset(step).map_or(false, |to| board.is_free(to)))
        .collect()
}

/// Single jumps available to the piece on `from`, as two-cell steps.
/// A jump needs an opposing piece on the adjacent diagonal cell and an empty
/// landing cell beyond it.
pub fn capture_steps(board: &Board, from: Coord) -> Vec<Step> {
    let Some(piece) = board.get(from) else {
        return Vec::new();
    };
    directions(piece)
        .filter(|&step| {
            match (from.offset(step), from.offset(step.doubled())) {
                (Some(over), Some(landing)) => {
                    board.is_enemy(over, piece.color) && board.is_free(landing)
                }
                _ => false,
            }
        })
        .map(Step::doubled)
        .collect()
}

/// One jump applied to a board. Dropping the guard undoes the jump,
/// restoring both pieces and their slots in the position index.
struct Jump<'a> {
    board: &'a mut Board,
    from: Coord,
    over: Coord,
    landing: Coord,
    mover: Piece,
    mover_slot: usize,
    captured: Piece,
    captured_slot: usize,
}

impl<'a> Jump<'a> {
    fn apply(board: &'a mut Board, from: Coord, step: Step) -> Result<Self, BoardError> {
        let landing = from.offset(step).ok_or_else(|| off_board(from, step))?;
        let over = from.midpoint(landing);
        let mover = board.get(from).ok_or(BoardError::EmptyCell(from))?;
        if !board.is_enemy(over, mover.color) {
            return Err(BoardError::EmptyCell(over));
        }
        if !board.is_free(landing) {
            return Err(BoardError::OccupiedCell(landing));
        }

        // Preconditions hold, so none of these can fail on a consistent board
        let (mover, mover_slot) = board.detach(from)?;
        board.place(landing, mover)?;
        let (captured, captured_slot) = board.detach(over)?;

        Ok(Self {
            board,
            from,
            over,
            landing,
            mover,
            mover_slot,
            captured,
            captured_slot,
        })
    }

    fn board(&mut self) -> &mut Board {
        self.board
    }
}

impl Drop for Jump<'_> {
    fn drop(&mut self) {
        self.board
            .reattach(self.over, self.captured, self.captured_slot);
        if let Err(err) = self.board.detach(self.landing) {
            error!(%err, landing = %self.landing, "board consistency breach while undoing a jump");
        }
        // The mover goes back uncrowned even if the jump crowned it
        self.board.reattach(self.from, self.mover, self.mover_slot);
    }
}

/// Records every maximal capture chain starting at `at`.
fn capture_chains(
    board: &mut Board,
    at: Coord,
    path: &mut Vec<Coord>,
    out: &mut Vec<Successor>,
) -> Result<(), BoardError> {
    path.push(at);
    let steps = capture_steps(board, at);

    if steps.is_empty() {
        // A bare origin is not a move
        if let Some(mv) = Move::from_path(path.clone()) {
            out.push(Successor {
                mv,
                board: board.clone(),
            });
        }
    }

    for step in steps {
        let mut jump = Jump::apply(board, at, step).map_err(breach)?;
        let landing = jump.landing;
        capture_chains(jump.board(), landing, path, out)?;
    }

    path.pop();
    Ok(())
}

/// Appends the simple moves of the piece on `from`.
fn simple_successors(
    board: &Board,
    from: Coord,
    out: &mut Vec<Successor>,
) -> Result<(), BoardError> {
    for step in simple_moves(board, from) {
        let to = from.offset(step).ok_or_else(|| off_board(from, step))?;
        let mut next = board.clone();
        next.move_piece(from, to).map_err(breach)?;
        out.push(Successor {
            mv: Move::simple(from, to),
            board: next,
        });
    }
    Ok(())
}

/// All legal moves of the piece on `from`, with their resulting boards.
///
/// If the piece can capture, only complete capture chains are returned;
/// otherwise its simple moves. The board is left exactly as received.
pub fn all_moves_from(board: &mut Board, from: Coord) -> Result<Vec<Successor>, BoardError> {
    let mut successors = Vec::new();
    capture_chains(board, from, &mut Vec::new(), &mut successors)?;
    if successors.is_empty() {
        simple_successors(board, from, &mut successors)?;
    }
    Ok(successors)
}

/// All legal moves of a color, with their resulting boards.
///
/// Capture is mandatory across the whole side: if any piece can capture, only
/// capture chains are offered. Order follows the color's position index, then
/// the canonical direction order. The board is left exactly as received.
pub fn all_moves_for_color(
    board: &mut Board,
    color: Color,
) -> Result<Vec<Successor>, BoardError> {
    let origins = board.positions(color).to_vec();

    let mut successors = Vec::new();
    for &from in &origins {
        capture_chains(board, from, &mut Vec::new(), &mut successors)?;
    }
    if !successors.is_empty() {
        return Ok(successors);
    }

    for &from in &origins {
        simple_successors(board, from, &mut successors)?;
    }
    Ok(successors)
}

/// Legal moves of a color, for move validation by callers holding a shared board.
pub fn legal_moves(board: &Board, color: Color) -> Result<Vec<Move>, BoardError> {
    let mut scratch = board.clone();
    let successors = all_moves_for_color(&mut scratch, color)?;
    Ok(successors.into_iter().map(|s| s.mv).collect())
}

/// Legal moves of the piece on `from`, considered on its own.
pub fn legal_moves_from(board: &Board, from: Coord) -> Result<Vec<Move>, BoardError> {
    let mut scratch = board.clone();
    let successors = all_moves_from(&mut scratch, from)?;
    Ok(successors.into_iter().map(|s| s.mv).collect())
}

/// Returns true if any piece of `color` can capture.
pub fn can_capture(board: &Board, color: Color) -> bool {
    board
        .positions(color)
        .iter()
        .any(|&at| !capture_steps(board, at).is_empty())
}

/// Returns true if `color` has at least one legal move.
pub fn has_any_move(board: &Board, color: Color) -> bool {
    board
        .positions(color)
        .iter()
        .any(|&at| !capture_steps(board, at).is_empty() || !simple_moves(board, at).is_empty())
}

/// Returns true if `color` cannot move: it has no pieces or is blocked.
pub fn is_terminal(board: &Board, color: Color) -> bool {
    !has_any_move(board, color)
}
