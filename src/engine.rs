//! Engine facade for hosts
//!
//! The two requests a host makes are "propose a move for this side on this
//! board within this budget" and "validate and apply a human move". Neither
//! mutates the caller's board.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use gomoku::{Board, Engine, EngineConfig, Pos, Stone};
//!
//! let mut engine = Engine::new(EngineConfig::default()).unwrap();
//! let board = Board::new();
//!
//! let applied = engine.submit_human_move(&board, Stone::Black, 9, 9).unwrap();
//! let reply = engine
//!     .request_ai_move(&applied.board, Stone::White, Duration::from_millis(50), 3)
//!     .unwrap();
//! assert!(applied.board.is_empty(reply.mv.pos));
//! ```

use std::time::Duration;

use crate::board::{Board, CaptureRecord, Move, Pos, Stone};
use crate::config::EngineConfig;
use crate::error::{ConfigError, GomokuError, Result};
use crate::game::Game;
use crate::rules::{Rules, Win};
use crate::search::{SearchLimits, SearchStatus, Searcher, TtStats};

/// Move chosen by the AI.
#[derive(Debug, Clone, PartialEq)]
pub struct AiMove {
    pub mv: Move,
    pub score: i32,
    /// Deepest completed search depth
    pub depth: u8,
    pub nodes: u64,
    pub elapsed: Duration,
    pub status: SearchStatus,
    /// Set when playing `mv` ends the game.
    pub win_detected: Option<Win>,
}

/// A validated human move applied to a copy of the board.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedMove {
    pub board: Board,
    pub captures: CaptureRecord,
    pub win_detected: Option<Win>,
}

pub struct Engine {
    config: EngineConfig,
    rules: Rules,
    searcher: Searcher,
}

impl Engine {
    /// Validate `config` and build an engine from it.
    pub fn new(config: EngineConfig) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        let rules = Rules::new(config.rules);
        let searcher = Searcher::new(&config);
        Ok(Self {
            config,
            rules,
            searcher,
        })
    }

    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[inline]
    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    /// Fresh game with Black to move. Also drops everything the searcher
    /// cached from the previous game.
    pub fn new_game(&mut self) -> Game {
        self.searcher.clear();
        Game::new(self.rules)
    }

    /// Search for `side`'s move on `board`.
    ///
    /// Returns the best move of the deepest depth finished within
    /// `time_budget`; depth 1 always finishes.
    pub fn request_ai_move(
        &mut self,
        board: &Board,
        side: Stone,
        time_budget: Duration,
        max_depth: u8,
    ) -> Result<AiMove> {
        if board.is_full() {
            return Err(GomokuError::NoLegalMoves);
        }
        let limits = SearchLimits {
            time_budget,
            max_depth,
        };
        let result = self.searcher.search(board, side, limits)?;
        let pos = result.best_move.ok_or(GomokuError::NoLegalMoves)?;
        let mv = Move::new(pos, side);

        let mut after = board.clone();
        self.rules.apply_move(&mut after, mv)?;
        let win_detected = self.rules.winner(&after, mv);

        log::info!(
            "{side} plays {pos}: score {} depth {} ({:?}) {} nodes in {:?}, {:.0} nodes/s",
            result.score,
            result.depth,
            result.status,
            result.nodes,
            result.elapsed,
            result.nodes_per_second()
        );
        Ok(AiMove {
            mv,
            score: result.score,
            depth: result.depth,
            nodes: result.nodes,
            elapsed: result.elapsed,
            status: result.status,
            win_detected,
        })
    }

    /// Validate a human move and return the resulting board.
    ///
    /// Rejections leave nothing changed and carry the reason.
    pub fn submit_human_move(
        &self,
        board: &Board,
        side: Stone,
        row: i32,
        col: i32,
    ) -> Result<AppliedMove> {
        let pos = Pos::try_new(row, col)?;
        let mv = Move::new(pos, side);
        let mut next = board.clone();
        let result = self.rules.apply_move(&mut next, mv)?;
        let win_detected = self.rules.winner(&next, mv);
        if let Some(win) = win_detected {
            log::info!("{} wins by {:?}", win.winner, win.kind);
        }
        Ok(AppliedMove {
            board: next,
            captures: result.captures,
            win_detected,
        })
    }

    /// A move to show a human as a hint, searched with the shorter
    /// suggestion budget. Never applied.
    pub fn suggest_move(&mut self, board: &Board, side: Stone) -> Result<Move> {
        let budget = self.config.suggestion_budget();
        let depth = self.config.max_depth;
        Ok(self.request_ai_move(board, side, budget, depth)?.mv)
    }

    /// Let the AI play the side to move in `game` with the configured budget.
    pub fn play_turn(&mut self, game: &mut Game) -> Result<AiMove> {
        if game.is_over() {
            return Err(GomokuError::GameOver);
        }
        let budget = self.config.time_budget();
        let depth = self.config.max_depth;
        let ai = self.request_ai_move(game.board(), game.to_move(), budget, depth)?;
        game.play(ai.mv.pos)?;
        Ok(ai)
    }

    #[must_use]
    pub fn tt_stats(&self) -> TtStats {
        self.searcher.tt_stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> Engine {
        Engine::new(EngineConfig {
            tt_size_mb: 1,
            max_depth: 4,
            ..EngineConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = EngineConfig {
            board_size: 15,
            ..EngineConfig::default()
        };
        assert!(Engine::new(config).is_err());
    }

    #[test]
    fn test_human_move_rejections() {
        let e = engine();
        let mut board = Board::new();
        board.place_stone(Pos::new(9, 9), Stone::White);

        assert_eq!(
            e.submit_human_move(&board, Stone::Black, -1, 4),
            Err(GomokuError::OutOfBounds { row: -1, col: 4 })
        );
        assert_eq!(
            e.submit_human_move(&board, Stone::Black, 9, 9),
            Err(GomokuError::CellOccupied(Pos::new(9, 9)))
        );
        assert_eq!(
            e.submit_human_move(&board, Stone::Empty, 3, 3),
            Err(GomokuError::IllegalMove("no side to move"))
        );
    }

    #[test]
    fn test_human_move_applies_to_copy() {
        let e = engine();
        let board = Board::new();
        let applied = e.submit_human_move(&board, Stone::Black, 9, 9).unwrap();
        assert!(board.is_board_empty());
        assert_eq!(applied.board.at(Pos::new(9, 9)), Stone::Black);
        assert!(applied.captures.is_empty());
        assert_eq!(applied.win_detected, None);
    }

    #[test]
    fn test_ai_win_detected() {
        let mut e = engine();
        let mut board = Board::new();
        for c in 3..7 {
            board.place_stone(Pos::new(4, c), Stone::White);
        }
        board.place_stone(Pos::new(4, 2), Stone::Black);
        board.place_stone(Pos::new(10, 10), Stone::Black);

        let ai = e
            .request_ai_move(&board, Stone::White, Duration::from_secs(5), 3)
            .unwrap();
        assert_eq!(ai.mv, Move::new(Pos::new(4, 7), Stone::White));
        assert_eq!(ai.win_detected.map(|w| w.winner), Some(Stone::White));
    }

    #[test]
    fn test_suggest_does_not_apply() {
        let mut e = engine();
        let mut board = Board::new();
        board.place_stone(Pos::new(9, 9), Stone::Black);
        let before = board.clone();
        let hint = e.suggest_move(&board, Stone::White).unwrap();
        assert_eq!(hint.side, Stone::White);
        assert!(board.is_empty(hint.pos));
        assert_eq!(board, before);
    }

    #[test]
    fn test_play_turn_and_new_game() {
        let mut e = engine();
        let mut game = e.new_game();
        let first = e.play_turn(&mut game).unwrap();
        assert_eq!(first.mv, Move::new(Pos::new(9, 9), Stone::Black));
        assert_eq!(game.to_move(), Stone::White);
        assert!(e.tt_stats().stores > 0);

        let game = e.new_game();
        assert!(game.board().is_board_empty());
        assert_eq!(e.tt_stats().used, 0);
    }
}
