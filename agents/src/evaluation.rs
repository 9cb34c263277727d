use checkers_core::{capture_steps, Board, Color, Coord, BOARD_SIZE};

/// Weight of the proximity term when added to material.
const PROXIMITY_WEIGHT: f64 = 0.01;

/// Twice the squared length of the board's long diagonal, 2 * (7^2 + 7^2).
const PROXIMITY_SCALE: f64 = 98.0;

// Composite term weights
const COUNT_WEIGHT: f64 = 3.125;
const CAPTURE_WEIGHT: f64 = 1.0417;
const ADVANCE_WEIGHT: f64 = 1.429;
const SAFETY_WEIGHT: f64 = 5.263;

/// Default king weights: the material heuristics value a king at one and a
/// half men, the composite heuristic at two.
pub const MATERIAL_KING_WEIGHT: f64 = 1.5;
pub const COMPOSITE_KING_WEIGHT: f64 = 2.0;

/// Evaluation strategy selector.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Heuristic {
    /// Weighted material balance
    Material,
    /// Material plus a small reward for closing in on the opponent
    MaterialProximity,
    /// Piece count, capture potential, advancement and safety
    Composite,
}

impl Heuristic {
    pub const ALL: [Heuristic; 3] = [
        Heuristic::Material,
        Heuristic::MaterialProximity,
        Heuristic::Composite,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Heuristic::Material => "material",
            Heuristic::MaterialProximity => "material+proximity",
            Heuristic::Composite => "composite",
        }
    }
}

/// A configured evaluation function: `(board, perspective) -> score`,
/// higher is better for the perspective color.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Evaluator {
    pub heuristic: Heuristic,
    pub king_weight: f64,
}

impl Evaluator {
    /// Creates an evaluator with the heuristic's default king weight.
    pub const fn new(heuristic: Heuristic) -> Self {
        let king_weight = match heuristic {
            Heuristic::Composite => COMPOSITE_KING_WEIGHT,
            _ => MATERIAL_KING_WEIGHT,
        };
        Self {
            heuristic,
            king_weight,
        }
    }

    pub fn with_king_weight(mut self, king_weight: f64) -> Self {
        self.king_weight = king_weight;
        self
    }

    /// Scores `board` for `perspective`.
    pub fn evaluate(&self, board: &Board, perspective: Color) -> f64 {
        match self.heuristic {
            Heuristic::Material => material(board, perspective, self.king_weight),
            Heuristic::MaterialProximity => {
                material(board, perspective, self.king_weight)
                    + PROXIMITY_WEIGHT * proximity(board, perspective)
            }
            Heuristic::Composite => composite(board, perspective, self.king_weight),
        }
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new(Heuristic::MaterialProximity)
    }
}

/// Weighted material of one color.
fn weighted_material(board: &Board, color: Color, king_weight: f64) -> f64 {
    board.men(color) as f64 + board.kings(color) as f64 * king_weight
}

/// Material balance normalized by the number of pieces on the board.
/// Returns `+inf` once the opponent has no pieces left.
pub fn material(board: &Board, perspective: Color, king_weight: f64) -> f64 {
    let opponent = perspective.opponent();
    if board.count(opponent) == 0 {
        return f64::INFINITY;
    }
    let total = (board.count(perspective) + board.count(opponent)) as f64;
    (weighted_material(board, perspective, king_weight)
        - weighted_material(board, opponent, king_weight))
        / total
}

/// Rewards keeping every own piece close to its nearest opponent.
/// One minus the summed squared distances, scaled; `+inf` once the opponent
/// has no pieces left.
pub fn proximity(board: &Board, perspective: Color) -> f64 {
    let theirs = board.positions(perspective.opponent());
    if theirs.is_empty() {
        return f64::INFINITY;
    }
    let total: u32 = board
        .positions(perspective)
        .iter()
        .filter_map(|own| theirs.iter().map(|&t| own.distance_squared(t)).min())
        .sum();
    1.0 - f64::from(total) / PROXIMITY_SCALE
}

/// Raw per-color inputs of the composite heuristic.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct Features {
    count: f64,
    captures: f64,
    advance: f64,
    safety: f64,
}

/// Safety of a cell: largest on the edges, smallest in the centre, where a
/// man can be jumped from every side. Symmetric under a half turn of the
/// board, so both colors measure it the same way.
fn edge_distance(at: Coord) -> f64 {
    let far = BOARD_SIZE - 1;
    let r = f64::from(at.row().max(far - at.row()));
    let c = f64::from(at.col().max(far - at.col()));
    (r.hypot(c) / 2.0).floor()
}

fn features(board: &Board, color: Color, king_weight: f64) -> Features {
    let mut f = Features {
        count: weighted_material(board, color, king_weight),
        ..Features::default()
    };
    for (at, piece) in board.pieces(color) {
        f.captures += capture_steps(board, at).len() as f64;
        if !piece.is_king() {
            f.advance += f64::from(at.row().abs_diff(color.home_row()));
            f.safety += edge_distance(at);
        }
    }
    f
}

/// Signed differential normalized by `1 + |sum|`, bounded and never dividing by zero.
fn differential(own: f64, theirs: f64) -> f64 {
    (own - theirs) / (1.0 + (own + theirs).abs())
}

/// Weighted combination of piece count, capture potential, advancement of
/// men and safety differentials.
pub fn composite(board: &Board, perspective: Color, king_weight: f64) -> f64 {
    let own = features(board, perspective, king_weight);
    let theirs = features(board, perspective.opponent(), king_weight);

    COUNT_WEIGHT * differential(own.count, theirs.count)
        + CAPTURE_WEIGHT * differential(own.captures, theirs.captures)
        + ADVANCE_WEIGHT * differential(own.advance, theirs.advance)
        + SAFETY_WEIGHT * differential(own.safety, theirs.safety)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(diagram: &str) -> Board {
        Board::from_diagram(diagram).unwrap()
    }

    #[test]
    fn test_starting_position_is_balanced() {
        let board = Board::starting_position();
        for heuristic in Heuristic::ALL {
            let eval = Evaluator::new(heuristic);
            let black = eval.evaluate(&board, Color::Black);
            let white = eval.evaluate(&board, Color::White);
            assert!((black - white).abs() < 1e-9, "{heuristic:?}: {black} vs {white}");
        }
        assert_eq!(material(&board, Color::Black, MATERIAL_KING_WEIGHT), 0.0);
    }

    #[test]
    fn test_material_counts_kings() {
        // One black king against two white men
        let board = board("......../......../......../....B.../......../w.w...../......../........");
        let score = material(&board, Color::Black, 1.5);
        assert!((score - (1.5 - 2.0) / 3.0).abs() < 1e-12);
        let score = material(&board, Color::Black, 2.0);
        assert_eq!(score, 0.0);
        assert!(material(&board, Color::White, 1.5) > 0.0);
    }

    #[test]
    fn test_material_win_is_infinite() {
        let board = board("......../......../......../....B.../......../......../......../........");
        assert_eq!(material(&board, Color::Black, 1.5), f64::INFINITY);
        assert_eq!(proximity(&board, Color::Black), f64::INFINITY);
        assert!(material(&board, Color::White, 1.5).is_finite());
    }

    #[test]
    fn test_proximity_prefers_engagement() {
        let near = board("......../......../......../..b...../...w..../......../......../........");
        let far = board(".b....../......../......../......../......../......../......../......w.");
        assert!(proximity(&near, Color::Black) > proximity(&far, Color::Black));
        // Adjacent diagonal: squared distance 2
        assert!((proximity(&near, Color::Black) - (1.0 - 2.0 / 98.0)).abs() < 1e-12);
    }

    #[test]
    fn test_composite_rewards_material() {
        let ahead = board("......../......../.b.b..../......../......../......../.....w../........");
        assert!(composite(&ahead, Color::Black, 2.0) > 0.0);
        assert!(composite(&ahead, Color::White, 2.0) < 0.0);
    }

    #[test]
    fn test_differential_normalization() {
        assert_eq!(differential(3.0, 1.0), 2.0 / 5.0);
        assert_eq!(differential(1.0, 3.0), -2.0 / 5.0);
        assert_eq!(differential(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_composite_rewards_advancement() {
        // Black man four rows out, White man two, equally safe
        let board = board("......../......../......../......../.b....../......w./......../........");
        let black = features(&board, Color::Black, 2.0);
        let white = features(&board, Color::White, 2.0);
        assert_eq!((black.advance, white.advance), (4.0, 2.0));
        assert_eq!(black.safety, white.safety);
        assert_eq!((black.captures, white.captures), (0.0, 0.0));

        let expected = ADVANCE_WEIGHT * 2.0 / 7.0;
        assert!((composite(&board, Color::Black, 2.0) - expected).abs() < 1e-12);
        assert!((composite(&board, Color::White, 2.0) + expected).abs() < 1e-12);
    }

    #[test]
    fn test_composite_rewards_edge_men() {
        // Black man on the edge, White man in the centre, both three rows out
        let board = board("......../......../......../b......./...w..../......../......../........");
        let black = features(&board, Color::Black, 2.0);
        let white = features(&board, Color::White, 2.0);
        assert_eq!((black.safety, white.safety), (4.0, 2.0));
        assert_eq!(black.advance, white.advance);

        let expected = SAFETY_WEIGHT * 2.0 / 7.0;
        assert!((composite(&board, Color::Black, 2.0) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_composite_counts_pending_captures() {
        // Black on d3 can jump e4; e4's own jump back is blocked by c2
        let board = board("......../......../.b....../..b...../...w..../......../......../w.......");
        let black = features(&board, Color::Black, 2.0);
        let white = features(&board, Color::White, 2.0);
        assert_eq!(black.count, white.count);
        assert_eq!((black.captures, white.captures), (1.0, 0.0));
        assert_eq!(differential(black.captures, white.captures), 0.5);
        assert!(differential(white.captures, black.captures) < 0.0);
    }

    #[test]
    fn test_composite_is_finite_on_empty_side() {
        let board = board("......../......../......../....B.../......../......../......../........");
        let score = Evaluator::new(Heuristic::Composite).evaluate(&board, Color::White);
        assert!(score.is_finite());
    }

    #[test]
    fn test_default_king_weights() {
        assert_eq!(Evaluator::new(Heuristic::Material).king_weight, 1.5);
        assert_eq!(Evaluator::new(Heuristic::Composite).king_weight, 2.0);
        assert_eq!(
            Evaluator::new(Heuristic::Material)
                .with_king_weight(2.0)
                .king_weight,
            2.0
        );
    }
}
