use crate::Agent;
use checkers_core::{all_moves_for_color, Board, BoardError, Color, Successor};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Plays a uniformly random legal move.
pub struct RandomAgent {
    name: String,
    rng: StdRng,
}

impl RandomAgent {
    pub fn new() -> Self {
        RandomAgent {
            name: "Random".to_string(),
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible agent for tests and benchmarks.
    pub fn seeded(seed: u64) -> Self {
        RandomAgent {
            name: format!("Random(seed={})", seed),
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for RandomAgent {
    fn choose(&mut self, board: &Board, color: Color) -> Result<Option<Successor>, BoardError> {
        let mut scratch = board.clone();
        let successors = all_moves_for_color(&mut scratch, color)?;
        Ok(successors.choose(&mut self.rng).cloned())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use checkers_core::{positions, legal_moves};

    #[test]
    fn test_random_move_is_legal() {
        let board = Board::starting_position();
        let legal = legal_moves(&board, Color::Black).unwrap();
        let mut agent = RandomAgent::seeded(7);
        for _ in 0..20 {
            let chosen = agent.choose(&board, Color::Black).unwrap().unwrap();
            assert!(legal.contains(&chosen.mv));
        }
    }

    #[test]
    fn test_seeded_is_reproducible() {
        let board = Board::starting_position();
        let mut a = RandomAgent::seeded(42);
        let mut b = RandomAgent::seeded(42);
        for _ in 0..5 {
            assert_eq!(
                a.choose(&board, Color::Black).unwrap(),
                b.choose(&board, Color::Black).unwrap()
            );
        }
    }

    #[test]
    fn test_respects_mandatory_capture() {
        let board = Board::from_diagram(positions::DOUBLE_JUMP).unwrap();
        let chosen = RandomAgent::seeded(1)
            .choose(&board, Color::Black)
            .unwrap()
            .unwrap();
        assert!(chosen.mv.is_capture());
    }
}
