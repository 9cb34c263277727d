//! Engine-vs-engine experiments: a depth sweep and a heuristic comparison.

use checkers_agents::{play_match, Heuristic, MatchRecord, MinimaxAgent};
use checkers_core::{Color, GameError};
use std::fmt;
use tracing::info;

/// One game outcome, as shown in the result tables.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Outcome {
    Won(Color),
    /// Ply limit reached; Black's piece lead scaled by 0.1
    Unfinished(f64),
}

impl Outcome {
    fn from_record(record: &MatchRecord) -> Self {
        match record.winner() {
            Some(color) => Outcome::Won(color),
            None => Outcome::Unfinished(record.piece_differential(Color::Black) as f64 * 0.1),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Won(Color::Black) => write!(f, "B"),
            Outcome::Won(Color::White) => write!(f, "W"),
            Outcome::Unfinished(balance) => write!(f, "{balance:+.1}"),
        }
    }
}

/// Outcomes of every Black depth against every White depth.
#[derive(Clone, Debug, PartialEq)]
pub struct DepthGrid {
    pub heuristic: Heuristic,
    /// `outcomes[b][w]` is Black at depth `b + 1` against White at `w + 1`
    pub outcomes: Vec<Vec<Outcome>>,
}

impl fmt::Display for DepthGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Depth sweep ({}), rows: Black depth, columns: White depth", self.heuristic.name())?;
        write!(f, "     ")?;
        for white in 1..=self.outcomes.len() {
            write!(f, "{white:>6}")?;
        }
        writeln!(f)?;
        for (black, row) in self.outcomes.iter().enumerate() {
            write!(f, "{:>5}", black + 1)?;
            for outcome in row {
                write!(f, "{:>6}", outcome.to_string())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Plays Black at each depth `1..=max_depth` against White at each depth.
pub fn compare_depths(
    max_depth: u32,
    heuristic: Heuristic,
    max_plies: u32,
) -> Result<DepthGrid, GameError> {
    let mut outcomes = Vec::with_capacity(max_depth as usize);
    for black_depth in 1..=max_depth {
        let mut row = Vec::with_capacity(max_depth as usize);
        for white_depth in 1..=max_depth {
            let mut black = MinimaxAgent::new(black_depth, heuristic);
            let mut white = MinimaxAgent::new(white_depth, heuristic);
            let record = play_match(&mut black, &mut white, max_plies)?;
            let outcome = Outcome::from_record(&record);
            info!(black_depth, white_depth, %outcome, plies = record.plies, "depth sweep game");
            row.push(outcome);
        }
        outcomes.push(row);
    }
    Ok(DepthGrid {
        heuristic,
        outcomes,
    })
}

/// Heuristic comparison at equal depths.
#[derive(Clone, Debug, PartialEq)]
pub struct HeuristicDuel {
    pub black: Heuristic,
    pub white: Heuristic,
    /// `outcomes[d]` is the game played at depth `d + 1`
    pub outcomes: Vec<Outcome>,
}

impl fmt::Display for HeuristicDuel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Black: {} vs White: {}",
            self.black.name(),
            self.white.name()
        )?;
        for (depth, outcome) in self.outcomes.iter().enumerate() {
            writeln!(f, "depth {:>2}: {outcome}", depth + 1)?;
        }
        Ok(())
    }
}

/// Material with proximity as Black against the composite heuristic as White,
/// both sides searching to the same depth, for each depth `1..=max_depth`.
pub fn compare_heuristics(max_depth: u32, max_plies: u32) -> Result<HeuristicDuel, GameError> {
    let (black_heuristic, white_heuristic) = (Heuristic::MaterialProximity, Heuristic::Composite);
    let mut outcomes = Vec::with_capacity(max_depth as usize);
    for depth in 1..=max_depth {
        let mut black = MinimaxAgent::new(depth, black_heuristic);
        let mut white = MinimaxAgent::new(depth, white_heuristic);
        let record = play_match(&mut black, &mut white, max_plies)?;
        let outcome = Outcome::from_record(&record);
        info!(depth, %outcome, plies = record.plies, "heuristic comparison game");
        outcomes.push(outcome);
    }
    Ok(HeuristicDuel {
        black: black_heuristic,
        white: white_heuristic,
        outcomes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_grid_shape() {
        let grid = compare_depths(2, Heuristic::Material, 6).unwrap();
        assert_eq!(grid.outcomes.len(), 2);
        assert!(grid.outcomes.iter().all(|row| row.len() == 2));
        let text = grid.to_string();
        assert!(text.contains("Depth sweep (material)"));
    }

    #[test]
    fn test_short_games_report_balance() {
        // Nothing can be captured in the first two plies
        let duel = compare_heuristics(1, 2).unwrap();
        assert_eq!(duel.outcomes, vec![Outcome::Unfinished(0.0)]);
        assert_eq!(duel.outcomes[0].to_string(), "+0.0");
    }
}
