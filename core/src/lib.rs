pub mod board;
pub mod error;
pub mod game;
pub mod layout;
pub mod move_gen;
pub mod perft;
pub mod types;

pub use board::*;
pub use error::{BoardError, GameError, LayoutError};
pub use game::*;
pub use layout::positions;
pub use move_gen::*;
pub use perft::{perft, perft_detailed, perft_divide, PerftResults};
pub use types::*;
