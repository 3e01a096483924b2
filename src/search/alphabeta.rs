//! Alpha-beta search with iterative deepening and transposition table
//!
//! Negamax over one working copy of the board: every node applies a move,
//! recurses and undoes it, so the caller's board is never touched.
//!
//! # Features
//!
//! - Iterative deepening; the best move of the deepest finished depth wins
//! - Cooperative time cutoff polled every 256 nodes
//! - Transposition table, killer moves and history for ordering
//! - Early exit once a forced win or loss is proven
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use gomoku::board::{Board, Pos, Stone};
//! use gomoku::config::EngineConfig;
//! use gomoku::search::{SearchLimits, Searcher};
//!
//! let mut searcher = Searcher::new(&EngineConfig::default());
//! let limits = SearchLimits { time_budget: Duration::from_millis(100), max_depth: 3 };
//! let result = searcher.search(&Board::new(), Stone::Black, limits).unwrap();
//! assert_eq!(result.best_move, Some(Pos::new(9, 9)));
//! ```

use std::time::{Duration, Instant};

use crate::board::zobrist;
use crate::board::{Board, Move, Pos, Stone, TOTAL_CELLS};
use crate::config::{EngineConfig, MAX_SEARCH_DEPTH};
use crate::error::{GomokuError, Result};
use crate::eval::Evaluator;
use crate::rules::Rules;

use super::movegen::{MoveGenerator, OrderingHints, TACTICAL_SCORE};
use super::tt::{score_from_tt, score_to_tt, Bound, TranspositionTable, TtEntry, TtStats};
use super::{INF, MATE_BOUND, WIN_SCORE};

/// Poll the clock when `nodes & TIME_CHECK_MASK == 0`.
const TIME_CHECK_MASK: u64 = 255;

/// Maximum moves searched at the root.
const MAX_ROOT_MOVES: usize = 30;

const MAX_PLY: usize = MAX_SEARCH_DEPTH as usize + 1;

/// Static scores stay well inside the win range.
const EVAL_CAP: i32 = WIN_SCORE / 2;

/// Moves searched at an interior node. Fewer the deeper the remaining
/// subtree; more when the position has a forcing threat.
fn branch_limit(depth: u8, tactical: bool) -> usize {
    match (tactical, depth) {
        (true, 0..=2) => 12,
        (true, 3..=4) => 9,
        (true, 5..=6) => 7,
        (true, _) => 5,
        (false, 0..=2) => 9,
        (false, 3..=4) => 7,
        (false, 5..=6) => 5,
        (false, _) => 3,
    }
}

/// Time and depth bounds for one search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimits {
    pub time_budget: Duration,
    pub max_depth: u8,
}

/// How the search ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStatus {
    /// Every depth up to the limit finished.
    Completed,
    /// The budget ran out; the result is from the last finished depth.
    TimedOut,
    /// A forced win or loss was proven.
    Terminal,
}

/// Search statistics for diagnostics and tuning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub tt_probes: u64,
    /// Probes whose stored score settled the node
    pub tt_hits: u64,
    pub beta_cutoffs: u64,
    /// Beta cutoffs on the first move tried (measures move ordering quality)
    pub first_move_cutoffs: u64,
}

impl SearchStats {
    pub fn first_move_rate(&self) -> f64 {
        if self.beta_cutoffs == 0 {
            0.0
        } else {
            self.first_move_cutoffs as f64 / self.beta_cutoffs as f64 * 100.0
        }
    }

    pub fn tt_hit_rate(&self) -> f64 {
        if self.tt_probes == 0 {
            0.0
        } else {
            self.tt_hits as f64 / self.tt_probes as f64 * 100.0
        }
    }
}

/// Search result containing the best move found and associated statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub best_move: Option<Pos>,
    /// Score of the best move from the searching side's view
    pub score: i32,
    /// Deepest completed iteration
    pub depth: u8,
    pub nodes: u64,
    pub elapsed: Duration,
    pub status: SearchStatus,
    pub stats: SearchStats,
}

impl SearchResult {
    pub fn nodes_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.nodes as f64 / secs
        } else {
            0.0
        }
    }

    #[inline]
    pub fn is_win(&self) -> bool {
        self.score >= MATE_BOUND
    }

    #[inline]
    pub fn is_loss(&self) -> bool {
        self.score <= -MATE_BOUND
    }
}

/// Iterative-deepening negamax searcher. Owns the transposition table, which
/// persists across searches until [`Searcher::clear`].
pub struct Searcher {
    rules: Rules,
    evaluator: Evaluator,
    movegen: MoveGenerator,
    tt: TranspositionTable,
    killers: [[Option<Pos>; 2]; MAX_PLY],
    history: [[i32; TOTAL_CELLS]; 2],
    nodes: u64,
    stats: SearchStats,
    start: Instant,
    deadline: Option<Instant>,
}

impl Searcher {
    #[must_use]
    pub fn new(config: &EngineConfig) -> Self {
        let rules = Rules::new(config.rules);
        Self {
            rules,
            evaluator: Evaluator::new(config.weights, &config.rules),
            movegen: MoveGenerator::new(rules, config.neighborhood_radius),
            tt: TranspositionTable::new(config.tt_size_mb),
            killers: [[None; 2]; MAX_PLY],
            history: [[0; TOTAL_CELLS]; 2],
            nodes: 0,
            stats: SearchStats::default(),
            start: Instant::now(),
            deadline: None,
        }
    }

    /// Find the best move for `side`.
    ///
    /// Depth 1 always runs to completion, so a legal move comes back even with
    /// a zero budget. Fails with [`GomokuError::NoLegalMoves`] when `side` has
    /// nowhere to play.
    pub fn search(
        &mut self,
        board: &Board,
        side: Stone,
        limits: SearchLimits,
    ) -> Result<SearchResult> {
        if !side.is_player() {
            return Err(GomokuError::IllegalMove("no side to move"));
        }
        self.start = Instant::now();
        self.deadline = None;
        self.nodes = 0;
        self.stats = SearchStats::default();
        self.killers = [[None; 2]; MAX_PLY];
        for table in &mut self.history {
            table.iter_mut().for_each(|h| *h /= 2);
        }
        self.tt.new_search();

        let mut work = board.clone();
        let first = self
            .movegen
            .ordered(&work, side)
            .next()
            .ok_or(GomokuError::NoLegalMoves)?;

        let mut result = SearchResult {
            best_move: Some(first),
            score: 0,
            depth: 0,
            nodes: 0,
            elapsed: Duration::ZERO,
            status: SearchStatus::Completed,
            stats: SearchStats::default(),
        };

        let max_depth = limits.max_depth.clamp(1, MAX_SEARCH_DEPTH);
        for depth in 1..=max_depth {
            if depth >= 2 {
                if self.start.elapsed() >= limits.time_budget {
                    result.status = SearchStatus::TimedOut;
                    break;
                }
                self.deadline = Some(self.start + limits.time_budget);
            }

            match self.search_root(&mut work, side, depth) {
                Ok((mv, score)) => {
                    result.best_move = Some(mv);
                    result.score = score;
                    result.depth = depth;
                    log::debug!(
                        "depth {depth}: {mv} score {score} nodes {} in {:?}",
                        self.nodes,
                        self.start.elapsed()
                    );
                    if score.abs() >= MATE_BOUND {
                        result.status = SearchStatus::Terminal;
                        break;
                    }
                }
                Err(GomokuError::SearchTimeExceeded { elapsed_ms }) => {
                    log::debug!("depth {depth} abandoned after {elapsed_ms}ms");
                    result.status = SearchStatus::TimedOut;
                    break;
                }
                Err(e) => return Err(e),
            }
        }

        if work != *board {
            log::warn!("search left the working board out of sync with the root position");
            return Err(GomokuError::InvariantViolation(
                "working board differs from root after search".into(),
            ));
        }

        result.nodes = self.nodes;
        result.elapsed = self.start.elapsed();
        result.stats = self.stats;
        Ok(result)
    }

    /// Forget everything learned: transposition table, killers and history.
    pub fn clear(&mut self) {
        self.tt.clear();
        self.killers = [[None; 2]; MAX_PLY];
        self.history = [[0; TOTAL_CELLS]; 2];
    }

    #[must_use]
    pub fn tt_stats(&self) -> TtStats {
        self.tt.stats()
    }

    #[inline]
    fn key(board: &Board, side: Stone) -> u64 {
        board.signature() ^ zobrist::keys().side_to_move(side)
    }

    #[inline]
    fn check_time(&self) -> Result<()> {
        if self.nodes & TIME_CHECK_MASK == 0 {
            if let Some(deadline) = self.deadline {
                if Instant::now() >= deadline {
                    return Err(GomokuError::SearchTimeExceeded {
                        elapsed_ms: self.start.elapsed().as_millis() as u64,
                    });
                }
            }
        }
        Ok(())
    }

    /// Root search with a full window. Returns the best move and its score.
    fn search_root(&mut self, board: &mut Board, side: Stone, depth: u8) -> Result<(Pos, i32)> {
        let key = Self::key(board, side);
        self.stats.tt_probes += 1;
        let tt_move = self.tt.lookup(key).and_then(|e| e.best_move);
        let hints = OrderingHints {
            tt_move,
            ..OrderingHints::default()
        };
        let picker = self.movegen.picker(board, side, &hints);

        let mut alpha = -INF;
        let mut best: Option<(Pos, i32)> = None;
        for pos in picker.take(MAX_ROOT_MOVES) {
            let mv = Move::new(pos, side);
            let applied = self.rules.apply_unchecked(board, mv);
            let score = self
                .negamax(board, side.opponent(), depth - 1, 1, -INF, -alpha, mv)
                .map(|s| -s);
            self.rules.undo_move(board, mv, &applied)?;
            let score = score?;

            // Strict improvement keeps the earlier move on ties
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((pos, score));
            }
            alpha = alpha.max(score);
        }

        let (best_move, best_score) = best.ok_or(GomokuError::NoLegalMoves)?;
        self.tt.store(
            key,
            TtEntry::new(key, Some(best_move), score_to_tt(best_score, 0), depth, Bound::Exact),
        );
        Ok((best_move, best_score))
    }

    /// Negamax with alpha-beta pruning. `last` is the move that led here;
    /// the score is from `side`'s point of view.
    #[allow(clippy::too_many_arguments)]
    fn negamax(
        &mut self,
        board: &mut Board,
        side: Stone,
        depth: u8,
        ply: usize,
        mut alpha: i32,
        beta: i32,
        last: Move,
    ) -> Result<i32> {
        self.nodes += 1;
        self.check_time()?;

        if let Some(win) = self.rules.winner(board, last) {
            let score = WIN_SCORE - ply as i32;
            return Ok(if win.winner == side { score } else { -score });
        }
        if depth == 0 || ply + 1 >= MAX_PLY {
            return Ok(self.evaluator.evaluate(board, side).clamp(-EVAL_CAP, EVAL_CAP));
        }

        let key = Self::key(board, side);
        self.stats.tt_probes += 1;
        let mut tt_move = None;
        if let Some(entry) = self.tt.lookup(key) {
            let entry = TtEntry {
                score: score_from_tt(entry.score, ply),
                ..*entry
            };
            tt_move = entry.best_move;
            if let Some(score) = entry.cutoff(depth, alpha, beta) {
                self.stats.tt_hits += 1;
                log::trace!("tt cutoff at ply {ply}: {score}");
                return Ok(score);
            }
        }

        let side_idx = side.side_index().ok_or_else(|| {
            GomokuError::InvariantViolation("search reached a node with no side".into())
        })?;
        let hints = OrderingHints {
            tt_move,
            killers: self.killers[ply],
            history: Some(&self.history[side_idx]),
        };
        let picker = self.movegen.picker(board, side, &hints);
        if picker.is_empty() {
            return Ok(self.no_move_score(board, side));
        }
        let limit = branch_limit(depth, picker.top_score() >= TACTICAL_SCORE);

        let alpha_orig = alpha;
        let mut best_score = -INF;
        let mut best_move = None;
        for (i, pos) in picker.take(limit).enumerate() {
            let mv = Move::new(pos, side);
            let applied = self.rules.apply_unchecked(board, mv);
            let score = self
                .negamax(board, side.opponent(), depth - 1, ply + 1, -beta, -alpha, mv)
                .map(|s| -s);
            self.rules.undo_move(board, mv, &applied)?;
            let score = score?;

            if score > best_score {
                best_score = score;
                best_move = Some(pos);
            }
            alpha = alpha.max(score);
            if alpha >= beta {
                self.stats.beta_cutoffs += 1;
                if i == 0 {
                    self.stats.first_move_cutoffs += 1;
                }
                if applied.captures.is_empty() {
                    self.record_cutoff(side_idx, ply, pos, depth);
                }
                break;
            }
        }
        if best_move.is_none() {
            // Every candidate was a forbidden double-three
            return Ok(self.no_move_score(board, side));
        }

        let bound = if best_score <= alpha_orig {
            Bound::Upper
        } else if best_score >= beta {
            Bound::Lower
        } else {
            Bound::Exact
        };
        self.tt.store(
            key,
            TtEntry::new(key, best_move, score_to_tt(best_score, ply), depth, bound),
        );
        Ok(best_score)
    }

    /// Score of a node where `side` has no candidate to play.
    fn no_move_score(&self, board: &Board, side: Stone) -> i32 {
        if board.is_full() {
            0
        } else {
            self.evaluator.evaluate(board, side).clamp(-EVAL_CAP, EVAL_CAP)
        }
    }

    fn record_cutoff(&mut self, side_idx: usize, ply: usize, pos: Pos, depth: u8) {
        let killers = &mut self.killers[ply];
        if killers[0] != Some(pos) {
            killers[1] = killers[0];
            killers[0] = Some(pos);
        }
        let bonus = i32::from(depth) * i32::from(depth);
        let slot = &mut self.history[side_idx][pos.to_index()];
        *slot = slot.saturating_add(bonus);
    }
}
