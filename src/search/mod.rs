//! Search module for the Gomoku AI
//!
//! Contains:
//! - Candidate generation and threat-based move ordering
//! - Transposition table for caching search results
//! - Negamax alpha-beta search with iterative deepening and a time budget

pub mod alphabeta;
pub mod movegen;
pub mod tt;

pub use alphabeta::{SearchLimits, SearchResult, SearchStats, SearchStatus, Searcher};
pub use movegen::{MoveGenerator, MovePicker, OrderingHints, ScoredMove};
pub use tt::{Bound, TranspositionTable, TtEntry, TtStats};

/// Score of a won position at the root. A win found `ply` plies deep scores
/// `WIN_SCORE - ply`.
pub const WIN_SCORE: i32 = 100_000_000;

/// Scores at or beyond this magnitude are proven wins or losses.
pub const MATE_BOUND: i32 = WIN_SCORE - 1000;

/// Window bound. Larger than any reachable score.
pub const INF: i32 = WIN_SCORE + 1;
