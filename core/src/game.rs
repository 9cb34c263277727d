/// Game flow: side to move, ply counting and move validation on top of the
/// rule engine. Moves are kept in memory only.
use crate::board::Board;
use crate::error::{BoardError, GameError};
use crate::move_gen::{all_moves_for_color, is_terminal, Successor};
use crate::types::{Color, Move};

/// Creates the board of a new game.
pub fn new_game() -> Board {
    Board::starting_position()
}

/// Plays `mv` for `color` on a copy of `board`, rejecting anything outside
/// the color's legal move set.
pub fn apply_move(board: &Board, color: Color, mv: &Move) -> Result<Board, GameError> {
    let mut scratch = board.clone();
    all_moves_for_color(&mut scratch, color)?
        .into_iter()
        .find(|s| &s.mv == mv)
        .map(|s| s.board)
        .ok_or_else(|| GameError::IllegalMove(mv.clone()))
}

/// Outcome of a game so far.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GameStatus {
    InProgress,
    /// The other side cannot move
    Won(Color),
    /// The ply limit was reached
    Draw,
}

/// Complete state of a checkers game.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Game {
    /// The current board position
    pub board: Board,
    /// Which side is to move
    pub turn: Color,
    /// Plies played so far
    pub ply: u32,
    /// Plies after which the game is declared drawn
    pub max_plies: Option<u32>,
    moves: Vec<Move>,
}

impl Game {
    /// Creates a new game in the starting position, Black to move.
    pub fn new() -> Self {
        Self::from_position(new_game(), Color::Black)
    }

    /// Creates a game from an arbitrary position.
    pub fn from_position(board: Board, turn: Color) -> Self {
        Self {
            board,
            turn,
            ply: 0,
            max_plies: None,
            moves: Vec::new(),
        }
    }

    /// Declares the game drawn once `limit` plies have been played.
    pub fn with_ply_limit(mut self, limit: u32) -> Self {
        self.max_plies = Some(limit);
        self
    }

    /// Moves played so far, oldest first.
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    /// Legal moves for the side to move, with their resulting boards.
    pub fn legal_moves(&self) -> Result<Vec<Successor>, BoardError> {
        let mut scratch = self.board.clone();
        all_moves_for_color(&mut scratch, self.turn)
    }

    pub fn status(&self) -> GameStatus {
        if is_terminal(&self.board, self.turn) {
            GameStatus::Won(self.turn.opponent())
        } else if self.max_plies.map_or(false, |limit| self.ply >= limit) {
            GameStatus::Draw
        } else {
            GameStatus::InProgress
        }
    }

    pub fn is_over(&self) -> bool {
        self.status() != GameStatus::InProgress
    }

    /// Validates and plays a move for the side to move.
    pub fn play(&mut self, mv: &Move) -> Result<(), GameError> {
        if self.is_over() {
            return Err(GameError::GameOver);
        }
        let board = apply_move(&self.board, self.turn, mv)?;
        self.advance(mv.clone(), board);
        Ok(())
    }

    /// Adopts a successor generated from the current position, as returned by
    /// `legal_moves` or a search.
    pub fn apply(&mut self, successor: Successor) -> Result<(), GameError> {
        if self.is_over() {
            return Err(GameError::GameOver);
        }
        self.advance(successor.mv, successor.board);
        Ok(())
    }

    fn advance(&mut self, mv: Move, board: Board) {
        self.board = board;
        self.moves.push(mv);
        self.turn = self.turn.opponent();
        self.ply += 1;
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Coord;

    fn at(row: i32, col: i32) -> Coord {
        Coord::new(row, col).unwrap()
    }

    #[test]
    fn test_new_game() {
        let game = Game::new();
        assert_eq!(game.turn, Color::Black);
        assert_eq!(game.ply, 0);
        assert_eq!(game.status(), GameStatus::InProgress);
        assert_eq!(game.legal_moves().unwrap().len(), 7);
    }

    #[test]
    fn test_play_simple_move() {
        let mut game = Game::new();
        game.play(&Move::simple(at(2, 1), at(3, 0))).unwrap();

        assert_eq!(game.turn, Color::White);
        assert_eq!(game.ply, 1);
        assert!(game.board.is_free(at(2, 1)));
        assert!(!game.board.is_free(at(3, 0)));
        assert_eq!(game.moves(), &[Move::simple(at(2, 1), at(3, 0))]);
    }

    #[test]
    fn test_illegal_move_rejected() {
        let mut game = Game::new();
        let mv = Move::simple(at(2, 1), at(3, 2));
        game.play(&mv).unwrap();

        // White must not move Black's pieces, nor step backwards
        let wrong = Move::simple(at(3, 2), at(4, 3));
        assert_eq!(game.play(&wrong), Err(GameError::IllegalMove(wrong)));
        assert_eq!(game.turn, Color::White);
        assert_eq!(game.ply, 1);
    }

    #[test]
    fn test_blocked_side_loses() {
        let board = Board::from_diagram(
            "......../......../......../......../......../b...b.../.b.b..../..w.....",
        )
        .unwrap();
        let mut game = Game::from_position(board, Color::White);
        assert_eq!(game.status(), GameStatus::Won(Color::Black));
        assert_eq!(
            game.play(&Move::simple(at(7, 2), at(6, 1))),
            Err(GameError::GameOver)
        );
    }

    #[test]
    fn test_ply_limit_draws() {
        let mut game = Game::new().with_ply_limit(2);
        let first = game.legal_moves().unwrap().remove(0);
        game.apply(first).unwrap();
        let reply = game.legal_moves().unwrap().remove(0);
        game.apply(reply).unwrap();
        assert_eq!(game.status(), GameStatus::Draw);
    }

    #[test]
    fn test_apply_move_helper() {
        let board = new_game();
        let next = apply_move(&board, Color::Black, &Move::simple(at(2, 7), at(3, 6))).unwrap();
        assert_eq!(next.count(Color::Black), 12);
        assert!(next.is_consistent());
        assert!(apply_move(&board, Color::White, &Move::simple(at(2, 7), at(3, 6))).is_err());
    }
}
