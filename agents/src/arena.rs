use crate::Agent;
use checkers_core::{Color, Game, GameError, GameStatus, Move};
use tracing::{debug, info};

/// Result of one game between two agents.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchRecord {
    pub status: GameStatus,
    pub plies: u32,
    pub moves: Vec<Move>,
    pub black_pieces: usize,
    pub white_pieces: usize,
}

impl MatchRecord {
    pub fn winner(&self) -> Option<Color> {
        match self.status {
            GameStatus::Won(color) => Some(color),
            _ => None,
        }
    }

    /// Own pieces minus opponent pieces on the final board.
    pub fn piece_differential(&self, color: Color) -> i64 {
        let (own, theirs) = match color {
            Color::Black => (self.black_pieces, self.white_pieces),
            Color::White => (self.white_pieces, self.black_pieces),
        };
        own as i64 - theirs as i64
    }
}

/// Plays a full game from the starting position, Black moving first.
/// The game is drawn once `max_plies` plies have been played.
pub fn play_match(
    black: &mut dyn Agent,
    white: &mut dyn Agent,
    max_plies: u32,
) -> Result<MatchRecord, GameError> {
    play_from(Game::new().with_ply_limit(max_plies), black, white)
}

/// Plays `game` to its end.
pub fn play_from(
    mut game: Game,
    black: &mut dyn Agent,
    white: &mut dyn Agent,
) -> Result<MatchRecord, GameError> {
    while !game.is_over() {
        let agent: &mut dyn Agent = match game.turn {
            Color::Black => &mut *black,
            Color::White => &mut *white,
        };
        // Status already covers the side to move being stuck
        let Some(successor) = agent.choose(&game.board, game.turn)? else {
            break;
        };
        debug!(ply = game.ply, color = %game.turn, agent = agent.name(), mv = %successor.mv, "move");
        game.apply(successor)?;
    }

    let record = MatchRecord {
        status: game.status(),
        plies: game.ply,
        moves: game.moves().to_vec(),
        black_pieces: game.board.count(Color::Black),
        white_pieces: game.board.count(Color::White),
    };
    info!(
        black = black.name(),
        white = white.name(),
        status = ?record.status,
        plies = record.plies,
        "match finished"
    );
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Heuristic, MinimaxAgent, RandomAgent};
    use checkers_core::{positions, Board};

    #[test]
    fn test_ply_limit_draws() {
        let mut black = RandomAgent::seeded(1);
        let mut white = RandomAgent::seeded(2);
        let record = play_match(&mut black, &mut white, 4).unwrap();
        assert!(record.plies <= 4);
        if record.plies == 4 {
            assert_eq!(record.status, GameStatus::Draw);
        }
        assert_eq!(record.moves.len(), record.plies as usize);
    }

    #[test]
    fn test_random_games_finish() {
        let mut black = RandomAgent::seeded(11);
        let mut white = RandomAgent::seeded(12);
        let record = play_match(&mut black, &mut white, 200).unwrap();
        assert_ne!(record.status, GameStatus::InProgress);
        assert_eq!(record.moves.len(), record.plies as usize);
        if record.winner().is_none() {
            assert_eq!(record.plies, 200);
        }
    }

    #[test]
    fn test_search_finishes_won_position() {
        let board = Board::from_diagram(positions::DOUBLE_JUMP).unwrap();
        let game = Game::from_position(board, Color::Black).with_ply_limit(10);
        let mut black = MinimaxAgent::new(2, Heuristic::Material);
        let mut white = RandomAgent::seeded(3);
        let record = play_from(game, &mut black, &mut white).unwrap();
        assert_eq!(record.status, GameStatus::Won(Color::Black));
        assert_eq!(record.plies, 1);
        assert_eq!(record.white_pieces, 0);
        assert_eq!(record.piece_differential(Color::Black), 1);
    }
}
