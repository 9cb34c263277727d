pub mod arena;
pub mod evaluation;
pub mod minimax;
pub mod random;
pub mod search;

use checkers_core::{Board, BoardError, Color, Successor};

/// Core trait for checkers agents
pub trait Agent {
    /// Choose a move for `color`, returning it with the board it produces.
    /// `None` means the side has no legal move.
    fn choose(&mut self, board: &Board, color: Color) -> Result<Option<Successor>, BoardError>;

    /// Get the agent's name
    fn name(&self) -> &str;
}

pub use arena::{play_from, play_match, MatchRecord};
pub use evaluation::*;
pub use minimax::MinimaxAgent;
pub use random::RandomAgent;
pub use search::*;
