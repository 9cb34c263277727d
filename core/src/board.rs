/// Board representation: an 8x8 grid plus a per-color index of occupied cells.
/// The grid answers "what is here", the index answers "where are my pieces".
use crate::error::BoardError;
use crate::types::*;

/// Rows each side fills at the start of a game.
const STARTING_ROWS: u8 = 3;

/// Mutable checkers board.
///
/// Invariant: a coordinate appears in a color's position index iff the cell
/// holds a piece of that color. Equality compares index order too, so a board
/// restored after exploration compares equal to the one handed in.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Board {
    /// Cells indexed `[row][col]`
    squares: [[Option<Piece>; BOARD_SIZE as usize]; BOARD_SIZE as usize],
    /// Occupied cells per color, indexed by `Color::index()`
    positions: [Vec<Coord>; 2],
}

impl Board {
    /// Creates an empty board.
    pub fn empty() -> Self {
        Self {
            squares: [[None; BOARD_SIZE as usize]; BOARD_SIZE as usize],
            positions: [Vec::with_capacity(12), Vec::with_capacity(12)],
        }
    }

    /// Creates the standard starting position: twelve men per side on the
    /// dark squares of each side's three back rows. Black fills rows 0-2.
    pub fn starting_position() -> Self {
        let mut board = Self::empty();
        for at in Coord::all().filter(|c| c.is_dark()) {
            let color = if at.row() < STARTING_ROWS {
                Color::Black
            } else if at.row() >= BOARD_SIZE - STARTING_ROWS {
                Color::White
            } else {
                continue;
            };
            board.squares[at.row() as usize][at.col() as usize] = Some(Piece::man(color));
            board.positions[color.index()].push(at);
        }
        board
    }

    /// Gets the piece at the given cell.
    pub fn get(&self, at: Coord) -> Option<Piece> {
        self.squares[at.row() as usize][at.col() as usize]
    }

    /// Returns true if the given cell is empty.
    pub fn is_free(&self, at: Coord) -> bool {
        self.get(at).is_none()
    }

    /// Returns true if the cell holds a piece of the opposite color.
    pub fn is_enemy(&self, at: Coord, color: Color) -> bool {
        self.get(at).map_or(false, |p| p.color == color.opponent())
    }

    /// Places a piece on an empty cell, crowning a man that lands on its
    /// promotion row.
    pub fn place(&mut self, at: Coord, piece: Piece) -> Result<(), BoardError> {
        if !self.is_free(at) {
            return Err(BoardError::OccupiedCell(at));
        }
        let piece = piece.crowned_on(at.row());
        self.squares[at.row() as usize][at.col() as usize] = Some(piece);
        self.positions[piece.color.index()].push(at);
        Ok(())
    }

    /// Removes and returns the piece on the given cell.
    pub fn remove(&mut self, at: Coord) -> Result<Piece, BoardError> {
        self.detach(at).map(|(piece, _)| piece)
    }

    /// Moves the piece on `from` to the empty cell `to`, crowning as `place` does.
    pub fn move_piece(&mut self, from: Coord, to: Coord) -> Result<Piece, BoardError> {
        if !self.is_free(to) {
            return Err(BoardError::OccupiedCell(to));
        }
        let piece = self.remove(from)?;
        self.place(to, piece)?;
        Ok(piece)
    }

    /// Removes a piece and reports where it sat in its color's index, so an
    /// undo can put it back in the same slot.
    pub(crate) fn detach(&mut self, at: Coord) -> Result<(Piece, usize), BoardError> {
        let piece = self.get(at).ok_or(BoardError::EmptyCell(at))?;
        let index = self.positions[piece.color.index()]
            .iter()
            .position(|&c| c == at)
            .ok_or(BoardError::EmptyCell(at))?;
        self.positions[piece.color.index()].remove(index);
        self.squares[at.row() as usize][at.col() as usize] = None;
        Ok((piece, index))
    }

    /// Inverse of `detach`: restores the piece verbatim, without crowning.
    pub(crate) fn reattach(&mut self, at: Coord, piece: Piece, index: usize) {
        debug_assert!(self.is_free(at), "reattach onto occupied cell {at}");
        self.squares[at.row() as usize][at.col() as usize] = Some(piece);
        self.positions[piece.color.index()].insert(index, at);
    }

    /// Occupied cells of a color, in index order.
    pub fn positions(&self, color: Color) -> &[Coord] {
        &self.positions[color.index()]
    }

    /// Pieces of a color together with their cells.
    pub fn pieces(&self, color: Color) -> impl Iterator<Item = (Coord, Piece)> + '_ {
        self.positions(color)
            .iter()
            .filter_map(move |&at| self.get(at).map(|p| (at, p)))
    }

    /// Number of pieces of a color.
    pub fn count(&self, color: Color) -> usize {
        self.positions(color).len()
    }

    /// Number of kings of a color.
    pub fn kings(&self, color: Color) -> usize {
        self.pieces(color).filter(|(_, p)| p.is_king()).count()
    }

    /// Number of men of a color.
    pub fn men(&self, color: Color) -> usize {
        self.count(color) - self.kings(color)
    }

    /// Returns true if the position index matches the grid exactly.
    /// Useful for debugging and testing.
    pub fn is_consistent(&self) -> bool {
        let mut seen = 0;
        for at in Coord::all() {
            if let Some(piece) = self.get(at) {
                let listed = self.positions(piece.color).iter().filter(|&&c| c == at);
                if listed.count() != 1 {
                    return false;
                }
                seen += 1;
            }
        }
        seen == self.positions.iter().map(Vec::len).sum::<usize>()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::starting_position()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(row: i32, col: i32) -> Coord {
        Coord::new(row, col).unwrap()
    }

    #[test]
    fn test_starting_position() {
        let board = Board::starting_position();

        assert_eq!(board.count(Color::Black), 12);
        assert_eq!(board.count(Color::White), 12);
        assert_eq!(board.kings(Color::Black), 0);

        assert_eq!(board.get(at(0, 1)), Some(Piece::man(Color::Black)));
        assert_eq!(board.get(at(2, 7)), Some(Piece::man(Color::Black)));
        assert_eq!(board.get(at(5, 0)), Some(Piece::man(Color::White)));
        assert_eq!(board.get(at(7, 6)), Some(Piece::man(Color::White)));

        // Light squares and the middle rows stay empty
        assert!(board.is_free(at(0, 0)));
        assert!(board.is_free(at(3, 2)));
        assert!(board.is_free(at(4, 1)));

        assert!(board.positions(Color::Black).iter().all(|c| c.is_dark()));
        assert!(board.is_consistent());
    }

    #[test]
    fn test_place_and_remove_keep_index() {
        let mut board = Board::empty();
        board.place(at(3, 2), Piece::man(Color::Black)).unwrap();
        board.place(at(4, 3), Piece::man(Color::White)).unwrap();
        assert_eq!(board.positions(Color::Black), &[at(3, 2)]);
        assert_eq!(board.positions(Color::White), &[at(4, 3)]);
        assert!(board.is_consistent());

        assert_eq!(board.remove(at(4, 3)), Ok(Piece::man(Color::White)));
        assert!(board.positions(Color::White).is_empty());
        assert!(board.is_free(at(4, 3)));
        assert!(board.is_consistent());
    }

    #[test]
    fn test_place_occupied_fails() {
        let mut board = Board::starting_position();
        let before = board.clone();
        assert_eq!(
            board.place(at(0, 1), Piece::man(Color::White)),
            Err(BoardError::OccupiedCell(at(0, 1)))
        );
        assert_eq!(board, before);
    }

    #[test]
    fn test_remove_empty_fails() {
        let mut board = Board::empty();
        assert_eq!(board.remove(at(3, 4)), Err(BoardError::EmptyCell(at(3, 4))));
    }

    #[test]
    fn test_place_promotes_on_far_row() {
        let mut board = Board::empty();
        board.place(at(7, 0), Piece::man(Color::Black)).unwrap();
        board.place(at(0, 1), Piece::man(Color::White)).unwrap();
        board.place(at(0, 3), Piece::man(Color::Black)).unwrap();
        assert_eq!(board.get(at(7, 0)), Some(Piece::king(Color::Black)));
        assert_eq!(board.get(at(0, 1)), Some(Piece::king(Color::White)));
        // Black's own back row does not crown
        assert_eq!(board.get(at(0, 3)), Some(Piece::man(Color::Black)));
    }

    #[test]
    fn test_detach_reattach_restores_order() {
        let mut board = Board::starting_position();
        let before = board.clone();
        let (piece, index) = board.detach(at(1, 2)).unwrap();
        assert!(board.is_consistent());
        board.reattach(at(1, 2), piece, index);
        assert_eq!(board, before);
    }

    #[test]
    fn test_move_piece() {
        let mut board = Board::starting_position();
        board.move_piece(at(2, 1), at(3, 0)).unwrap();
        assert!(board.is_free(at(2, 1)));
        assert_eq!(board.get(at(3, 0)), Some(Piece::man(Color::Black)));
        assert!(board.is_consistent());
        assert_eq!(
            board.move_piece(at(1, 0), at(2, 3)),
            Err(BoardError::OccupiedCell(at(2, 3)))
        );
    }
}
