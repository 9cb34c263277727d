use crate::{
    evaluation::{Evaluator, Heuristic},
    search::{search, search_parallel, SearchConfig, SearchLimits},
    Agent,
};
use checkers_core::{Board, BoardError, Color, Successor};

pub struct MinimaxAgent {
    name: String,
    config: SearchConfig,
    parallel: bool,
}

impl MinimaxAgent {
    pub fn new(depth: u32, heuristic: Heuristic) -> Self {
        MinimaxAgent {
            name: format!("Minimax(depth={}, {})", depth, heuristic.name()),
            config: SearchConfig::depth(depth, heuristic),
            parallel: false,
        }
    }

    pub fn with_time_limit(time_ms: u64, heuristic: Heuristic) -> Self {
        MinimaxAgent {
            name: format!("Minimax(time={}ms, {})", time_ms, heuristic.name()),
            config: SearchConfig::new(SearchLimits::move_time(time_ms), Evaluator::new(heuristic)),
            parallel: false,
        }
    }

    pub fn with_config(config: SearchConfig) -> Self {
        let depth = match config.limits.max_depth {
            Some(depth) => depth.to_string(),
            None => "unbounded".to_string(),
        };
        MinimaxAgent {
            name: format!("Minimax(depth={}, {})", depth, config.evaluator.heuristic.name()),
            config,
            parallel: false,
        }
    }

    /// Spread root moves across threads.
    pub fn parallel(mut self) -> Self {
        self.parallel = true;
        self
    }
}

impl Agent for MinimaxAgent {
    fn choose(&mut self, board: &Board, color: Color) -> Result<Option<Successor>, BoardError> {
        let result = if self.parallel {
            search_parallel(board, color, &self.config)?
        } else {
            search(board, color, &self.config)?
        };
        Ok(result.best)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names() {
        assert_eq!(
            MinimaxAgent::new(3, Heuristic::Composite).name(),
            "Minimax(depth=3, composite)"
        );
        let unbounded = SearchConfig::new(SearchLimits::unbounded(), Evaluator::default());
        assert_eq!(
            MinimaxAgent::with_config(unbounded).name(),
            "Minimax(depth=unbounded, material+proximity)"
        );
    }

    #[test]
    fn test_parallel_agent_matches_sequential() {
        let board = Board::starting_position();
        let mut sequential = MinimaxAgent::new(3, Heuristic::MaterialProximity);
        let mut parallel = MinimaxAgent::new(3, Heuristic::MaterialProximity).parallel();
        let a = sequential.choose(&board, Color::Black).unwrap().unwrap();
        let b = parallel.choose(&board, Color::Black).unwrap().unwrap();
        assert_eq!(a.mv, b.mv);
    }
}
