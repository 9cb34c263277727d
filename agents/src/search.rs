use crate::evaluation::{Evaluator, Heuristic};
use checkers_core::{all_moves_for_color, Board, BoardError, Color, Move, Successor};
use rayon::prelude::*;
use std::time::{Duration, Instant};
use tracing::{debug, trace, warn};

const TIME_CHECK_INTERVAL: u64 = 1000; // Check time every 1000 nodes
/// Hard ply ceiling for any search, bounded or not
const MAX_PLY: u32 = 64;

/// Node budget for a search with neither a depth limit nor a budget.
/// Kings can shuffle forever, so such a search never reaches a terminal position.
pub const UNBOUNDED_NODE_BUDGET: u64 = 1_000_000;

/// Depth used when nothing else is configured.
pub const DEFAULT_DEPTH: u32 = 4;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchLimits {
    /// Plies to search; `None` deepens iteratively until the budget runs out
    pub max_depth: Option<u32>,
    pub move_time: Option<Duration>,
    pub nodes: Option<u64>,
}

impl SearchLimits {
    pub fn depth(depth: u32) -> Self {
        Self {
            max_depth: Some(depth),
            ..Self::default()
        }
    }

    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn move_time(millis: u64) -> Self {
        Self {
            move_time: Some(Duration::from_millis(millis)),
            ..Self::default()
        }
    }

    pub fn with_nodes(mut self, nodes: u64) -> Self {
        self.nodes = Some(nodes);
        self
    }

    pub fn with_move_time(mut self, millis: u64) -> Self {
        self.move_time = Some(Duration::from_millis(millis));
        self
    }

    fn is_budgeted(&self) -> bool {
        self.move_time.is_some() || self.nodes.is_some()
    }

    /// Gives a search without depth limit or budget the default node budget.
    fn budgeted(mut self) -> Self {
        if self.max_depth.is_none() && !self.is_budgeted() {
            self.nodes = Some(UNBOUNDED_NODE_BUDGET);
        }
        self
    }
}

/// Immutable search parameters threaded through the whole search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchConfig {
    pub limits: SearchLimits,
    pub evaluator: Evaluator,
}

impl SearchConfig {
    pub fn new(limits: SearchLimits, evaluator: Evaluator) -> Self {
        Self { limits, evaluator }
    }

    pub fn depth(depth: u32, heuristic: Heuristic) -> Self {
        Self::new(SearchLimits::depth(depth), Evaluator::new(heuristic))
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self::new(SearchLimits::depth(DEFAULT_DEPTH), Evaluator::default())
    }
}

#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Chosen move and the board it produces; `None` if the side cannot move
    pub best: Option<Successor>,
    /// Score of `best` from the searching side's perspective
    pub score: f64,
    /// Deepest completed depth; 0 if the budget cut the first pass short
    pub depth: u32,
    pub nodes: u64,
    pub stopped: bool,
}

impl SearchResult {
    pub fn best_move(&self) -> Option<&Move> {
        self.best.as_ref().map(|s| &s.mv)
    }

    pub fn into_parts(self) -> (Option<Move>, Option<Board>) {
        match self.best {
            Some(s) => (Some(s.mv), Some(s.board)),
            None => (None, None),
        }
    }
}

struct SearchInfo {
    start_time: Instant,
    limits: SearchLimits,
    evaluator: Evaluator,
    /// Every position is scored from the root mover's point of view
    agent: Color,
    nodes: u64,
    stopped: bool,
    /// Set when some node was cut off by the depth limit
    depth_cutoff: bool,
}

impl SearchInfo {
    fn new(config: &SearchConfig, agent: Color, start_time: Instant) -> Self {
        Self {
            start_time,
            limits: config.limits.budgeted(),
            evaluator: config.evaluator,
            agent,
            nodes: 0,
            stopped: false,
            depth_cutoff: false,
        }
    }

    fn should_stop(&mut self) -> bool {
        if self.stopped {
            return true;
        }

        // Check node limit
        if let Some(max_nodes) = self.limits.nodes {
            if self.nodes >= max_nodes {
                self.stopped = true;
                return true;
            }
        }

        // Check time limit periodically
        if self.nodes % TIME_CHECK_INTERVAL == 0 {
            if let Some(move_time) = self.limits.move_time {
                if self.start_time.elapsed() >= move_time {
                    self.stopped = true;
                    return true;
                }
            }
        }

        false
    }

    fn evaluate(&self, board: &Board) -> f64 {
        self.evaluator.evaluate(board, self.agent)
    }

    /// Counts the node and returns its static score if the search ends here.
    fn cutoff(&mut self, board: &Board, depth: u32) -> Option<f64> {
        self.nodes += 1;
        if self.should_stop() {
            return Some(self.evaluate(board));
        }
        if depth >= self.limits.max_depth.map_or(MAX_PLY, |max| max.min(MAX_PLY)) {
            self.depth_cutoff = true;
            return Some(self.evaluate(board));
        }
        None
    }

    fn max_value(
        &mut self,
        board: &mut Board,
        color: Color,
        mut alpha: f64,
        beta: f64,
        depth: u32,
    ) -> Result<f64, BoardError> {
        if let Some(score) = self.cutoff(board, depth) {
            return Ok(score);
        }

        let successors = all_moves_for_color(board, color)?;
        if successors.is_empty() {
            return Ok(self.evaluate(board));
        }

        let mut v = f64::NEG_INFINITY;
        for mut s in successors {
            v = v.max(self.min_value(&mut s.board, color.opponent(), alpha, beta, depth + 1)?);
            if v >= beta || self.stopped {
                return Ok(v);
            }
            alpha = alpha.max(v);
        }
        Ok(v)
    }

    fn min_value(
        &mut self,
        board: &mut Board,
        color: Color,
        alpha: f64,
        mut beta: f64,
        depth: u32,
    ) -> Result<f64, BoardError> {
        if let Some(score) = self.cutoff(board, depth) {
            return Ok(score);
        }

        let successors = all_moves_for_color(board, color)?;
        if successors.is_empty() {
            return Ok(self.evaluate(board));
        }

        let mut v = f64::INFINITY;
        for mut s in successors {
            v = v.min(self.max_value(&mut s.board, color.opponent(), alpha, beta, depth + 1)?);
            if v <= alpha || self.stopped {
                return Ok(v);
            }
            beta = beta.min(v);
        }
        Ok(v)
    }

    /// Plain minimax over the same tree, used as a reference for pruning.
    fn minimax(
        &mut self,
        board: &mut Board,
        color: Color,
        maximizing: bool,
        depth: u32,
    ) -> Result<f64, BoardError> {
        if let Some(score) = self.cutoff(board, depth) {
            return Ok(score);
        }

        let successors = all_moves_for_color(board, color)?;
        if successors.is_empty() {
            return Ok(self.evaluate(board));
        }

        let mut v = if maximizing {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
        for mut s in successors {
            let child = self.minimax(&mut s.board, color.opponent(), !maximizing, depth + 1)?;
            v = if maximizing { v.max(child) } else { v.min(child) };
        }
        Ok(v)
    }
}

/// Finds the best move for `color` with alpha-beta search.
///
/// Without a depth limit the search deepens iteratively within its node or
/// time budget, or within [`UNBOUNDED_NODE_BUDGET`] if none is set, and keeps
/// the last completed iteration.
pub fn search(board: &Board, color: Color, config: &SearchConfig) -> Result<SearchResult, BoardError> {
    if config.limits.max_depth.is_none() {
        let config = SearchConfig::new(config.limits.budgeted(), config.evaluator);
        return iterative_deepening(board, color, &config);
    }

    let mut info = SearchInfo::new(config, color, Instant::now());
    let result = alpha_beta_root(board, color, &mut info)?;
    if result.stopped {
        warn!(nodes = result.nodes, "search stopped early on its budget");
    }
    Ok(result)
}

/// Fixed-depth search with a depth given in plies.
pub fn search_depth(
    board: &Board,
    color: Color,
    depth: u32,
    heuristic: Heuristic,
) -> Result<SearchResult, BoardError> {
    search(board, color, &SearchConfig::depth(depth, heuristic))
}

/// Search entry point returning the chosen move and resulting board,
/// or `(None, None)` when `color` has no legal move.
pub fn apply_best_move(
    board: &Board,
    color: Color,
    max_depth: Option<u32>,
    heuristic: Heuristic,
) -> Result<(Option<Move>, Option<Board>), BoardError> {
    let limits = SearchLimits {
        max_depth,
        ..SearchLimits::default()
    };
    let config = SearchConfig::new(limits, Evaluator::new(heuristic));
    Ok(search(board, color, &config)?.into_parts())
}

fn alpha_beta_root(
    board: &Board,
    color: Color,
    info: &mut SearchInfo,
) -> Result<SearchResult, BoardError> {
    let mut scratch = board.clone();
    let successors = all_moves_for_color(&mut scratch, color)?;
    debug!(
        %color,
        moves = successors.len(),
        depth = ?info.limits.max_depth,
        heuristic = info.evaluator.heuristic.name(),
        "search start"
    );

    if successors.is_empty() {
        return Ok(SearchResult {
            best: None,
            score: info.evaluate(board),
            depth: 0,
            nodes: info.nodes,
            stopped: false,
        });
    }

    let fallback = successors[0].clone();
    let mut best: Option<Successor> = None;
    let mut best_score = f64::NEG_INFINITY;

    for mut s in successors {
        let score = info.min_value(&mut s.board, color.opponent(), best_score, f64::INFINITY, 1)?;

        // A subtree cut short by the budget has no reliable score
        if info.stopped {
            break;
        }
        trace!(mv = %s.mv, score, "root move");

        if best.is_none() || score > best_score {
            best_score = score;
            best = Some(s);
        }
    }

    // Never report a movable side as stuck because the budget ran out
    let best = match best {
        Some(s) => s,
        None => {
            best_score = info.evaluate(&fallback.board);
            fallback
        }
    };
    debug!(mv = %best.mv, score = best_score, nodes = info.nodes, "search done");

    Ok(SearchResult {
        best: Some(best),
        score: best_score,
        depth: completed_depth(&info.limits, info.stopped),
        nodes: info.nodes,
        stopped: info.stopped,
    })
}

fn iterative_deepening(
    board: &Board,
    color: Color,
    config: &SearchConfig,
) -> Result<SearchResult, BoardError> {
    let start_time = Instant::now();
    let mut best_result = SearchResult {
        best: None,
        score: f64::NEG_INFINITY,
        depth: 0,
        nodes: 0,
        stopped: false,
    };
    let mut total_nodes = 0;

    // Search to increasing depths until the budget runs out
    for depth in 1..=MAX_PLY {
        let mut limits = config.limits;
        limits.max_depth = Some(depth);
        // The node budget covers all iterations together
        limits.nodes = config.limits.nodes.map(|n| n.saturating_sub(total_nodes));

        let mut info = SearchInfo::new(&SearchConfig::new(limits, config.evaluator), color, start_time);
        let result = alpha_beta_root(board, color, &mut info)?;
        total_nodes += result.nodes;

        // Only keep results from completed depths
        if result.stopped {
            if best_result.best.is_none() {
                best_result = result;
            }
            best_result.stopped = true;
            break;
        }

        let exhausted = !info.depth_cutoff;
        best_result = result;
        if exhausted || best_result.best.is_none() {
            break;
        }
    }

    best_result.nodes = total_nodes;
    if best_result.stopped {
        warn!(depth = best_result.depth, nodes = total_nodes, "iterative deepening stopped on its budget");
    }
    Ok(best_result)
}

/// Depth a root search finished, or 0 when its budget ran out midway.
fn completed_depth(limits: &SearchLimits, stopped: bool) -> u32 {
    if stopped {
        0
    } else {
        limits.max_depth.unwrap_or(0)
    }
}

/// Unpruned minimax over the same tree as `search`, with the same tie-break.
/// Explores every node; meant for checking the pruned search.
pub fn minimax(board: &Board, color: Color, config: &SearchConfig) -> Result<SearchResult, BoardError> {
    let mut info = SearchInfo::new(config, color, Instant::now());
    let mut scratch = board.clone();
    let successors = all_moves_for_color(&mut scratch, color)?;

    let mut best: Option<Successor> = None;
    let mut best_score = f64::NEG_INFINITY;
    for mut s in successors {
        let score = info.minimax(&mut s.board, color.opponent(), false, 1)?;
        if best.is_none() || score > best_score {
            best_score = score;
            best = Some(s);
        }
    }

    let score = if best.is_some() {
        best_score
    } else {
        info.evaluate(board)
    };
    Ok(SearchResult {
        best,
        score,
        depth: completed_depth(&config.limits, info.stopped),
        nodes: info.nodes,
        stopped: info.stopped,
    })
}

/// Alpha-beta search with root moves spread across threads.
///
/// Each root subtree is searched with a full window on its own board, then
/// scores are reduced in canonical move order so ties resolve exactly as in
/// `search`. A node budget applies to each subtree separately, and a subtree
/// cut short by its budget is left out of the reduction.
pub fn search_parallel(
    board: &Board,
    color: Color,
    config: &SearchConfig,
) -> Result<SearchResult, BoardError> {
    let start_time = Instant::now();
    let mut scratch = board.clone();
    let successors = all_moves_for_color(&mut scratch, color)?;

    if successors.is_empty() {
        let info = SearchInfo::new(config, color, start_time);
        return Ok(SearchResult {
            best: None,
            score: info.evaluate(board),
            depth: 0,
            nodes: 0,
            stopped: false,
        });
    }

    let scored = successors
        .par_iter()
        .map(|s| -> Result<(f64, u64, bool), BoardError> {
            let mut info = SearchInfo::new(config, color, start_time);
            let mut child = s.board.clone();
            let score = info.min_value(
                &mut child,
                color.opponent(),
                f64::NEG_INFINITY,
                f64::INFINITY,
                1,
            )?;
            Ok((score, info.nodes, info.stopped))
        })
        .collect::<Result<Vec<_>, BoardError>>()?;

    let mut best_index = None;
    let mut best_score = f64::NEG_INFINITY;
    let mut nodes = 0;
    let mut stopped = false;
    for (i, &(score, subtree_nodes, subtree_stopped)) in scored.iter().enumerate() {
        nodes += subtree_nodes;
        if subtree_stopped {
            stopped = true;
            continue;
        }
        if best_index.is_none() || score > best_score {
            best_index = Some(i);
            best_score = score;
        }
    }

    // Same fallback as the sequential search when no subtree finished
    let best_index = match best_index {
        Some(i) => i,
        None => {
            best_score = SearchInfo::new(config, color, start_time).evaluate(&successors[0].board);
            0
        }
    };
    let best = successors.into_iter().nth(best_index);
    if let Some(s) = &best {
        debug!(mv = %s.mv, score = best_score, nodes, "parallel search done");
    }
    if stopped {
        warn!(nodes, "parallel search stopped early on its budget");
    }
    Ok(SearchResult {
        best,
        score: best_score,
        depth: completed_depth(&config.limits, stopped),
        nodes,
        stopped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use checkers_core::{positions, Coord};

    #[test]
    fn test_opening_move_depth_one() {
        let board = Board::starting_position();
        let result = search_depth(&board, Color::Black, 1, Heuristic::Material).unwrap();

        let best = result.best.unwrap();
        assert_eq!(best.mv.legs(), 1);
        assert!(!best.mv.is_capture());
        assert_eq!(best.mv.from().row(), 2);
        assert_eq!(best.mv.to().row(), 3);
        assert_eq!(best.board.count(Color::Black), 12);
        assert_eq!(best.board.count(Color::White), 12);
        // Every opening move keeps material level, so the first one wins the tie
        assert_eq!(
            best.mv,
            Move::simple(Coord::new(2, 1).unwrap(), Coord::new(3, 0).unwrap())
        );
    }

    #[test]
    fn test_takes_the_double_jump() {
        let board = Board::from_diagram(positions::DOUBLE_JUMP).unwrap();
        let (mv, result) =
            apply_best_move(&board, Color::Black, Some(3), Heuristic::Material).unwrap();
        assert_eq!(mv.unwrap().legs(), 2);
        assert_eq!(result.unwrap().count(Color::White), 0);
    }

    #[test]
    fn test_no_moves_returns_none() {
        let board = Board::from_diagram(positions::DOUBLE_JUMP).unwrap();
        let mut cleared = board.clone();
        for &at in board.positions(Color::White) {
            cleared.remove(at).unwrap();
        }
        let (mv, result) =
            apply_best_move(&cleared, Color::White, Some(4), Heuristic::Composite).unwrap();
        assert!(mv.is_none());
        assert!(result.is_none());
    }

    #[test]
    fn test_depth_counts_plies() {
        let board = Board::starting_position();
        let one = search_depth(&board, Color::Black, 1, Heuristic::Material).unwrap();
        let two = search_depth(&board, Color::Black, 2, Heuristic::Material).unwrap();
        // One leaf per opening move
        assert_eq!(one.nodes, 7);
        assert!(two.nodes > one.nodes);
    }

    #[test]
    fn test_node_budget_stops_search() {
        let board = Board::starting_position();
        let config = SearchConfig::new(
            SearchLimits::depth(8).with_nodes(50),
            Evaluator::new(Heuristic::Material),
        );
        let result = search(&board, Color::Black, &config).unwrap();
        assert!(result.stopped);
        assert!(result.best.is_some());
        assert!(result.nodes <= 51);
        // No depth was finished
        assert_eq!(result.depth, 0);
    }

    #[test]
    fn test_budget_fallback_is_scored_statically() {
        let board = Board::starting_position();
        let evaluator = Evaluator::new(Heuristic::MaterialProximity);
        let config = SearchConfig::new(SearchLimits::depth(8).with_nodes(30), evaluator);
        let first = Move::simple(Coord::new(2, 1).unwrap(), Coord::new(3, 0).unwrap());

        let sequential = search(&board, Color::Black, &config).unwrap();
        let parallel = search_parallel(&board, Color::Black, &config).unwrap();
        for result in [&sequential, &parallel] {
            assert!(result.stopped);
            assert_eq!(result.depth, 0);
            assert_eq!(result.best_move(), Some(&first));
            let best = result.best.as_ref().unwrap();
            assert_eq!(result.score, evaluator.evaluate(&best.board, Color::Black));
            assert!(result.score.is_finite());
        }
    }

    #[test]
    fn test_unbudgeted_search_gets_default_budget() {
        let limits = SearchLimits::unbounded().budgeted();
        assert_eq!(limits.nodes, Some(UNBOUNDED_NODE_BUDGET));
        assert_eq!(SearchLimits::unbounded().with_nodes(10).budgeted().nodes, Some(10));
        assert_eq!(SearchLimits::depth(3).budgeted().nodes, None);
        assert_eq!(SearchLimits::move_time(5).budgeted().nodes, None);
    }

    #[test]
    fn test_iterative_deepening_under_node_budget() {
        let board = Board::starting_position();
        let config = SearchConfig::new(
            SearchLimits::unbounded().with_nodes(5_000),
            Evaluator::new(Heuristic::MaterialProximity),
        );
        let result = search(&board, Color::Black, &config).unwrap();
        assert!(result.best.is_some());
        assert!(result.depth >= 2);
        assert!(result.nodes <= 5_000 + 1);
    }
}
