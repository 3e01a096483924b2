//! Gomoku rule and search engine with Ninuki-renju rules
//!
//! - Standard 19x19 board
//! - Five or more in a row wins, unless the opponent can break the line by
//!   capturing a pair out of it
//! - Pair capture: `X O O X` removes the `O O` pair; ten captured stones win
//! - A move creating two free threes is forbidden unless it captures
//!
//! # Architecture
//!
//! - [`board`]: bitboard position with incremental signature
//! - [`rules`]: captures, forbidden double-threes, win resolution
//! - [`eval`]: pattern and capture heuristic
//! - [`search`]: move ordering, transposition table, alpha-beta search
//! - [`game`] and [`engine`]: the surface a host talks to
//!
//! # Quick Start
//!
//! ```
//! use std::time::Duration;
//! use gomoku::{Engine, EngineConfig, Stone};
//!
//! let mut engine = Engine::new(EngineConfig::default()).unwrap();
//! let mut game = engine.new_game();
//! game.play_at(9, 9).unwrap();
//!
//! let reply = engine
//!     .request_ai_move(game.board(), Stone::White, Duration::from_millis(50), 4)
//!     .unwrap();
//! game.play(reply.mv.pos).unwrap();
//! assert_eq!(game.to_move(), Stone::Black);
//! ```

pub mod board;
pub mod config;
pub mod engine;
pub mod error;
pub mod eval;
pub mod game;
pub mod rules;
pub mod search;

// Re-export commonly used types for convenience
pub use board::{Board, Move, Pos, Stone, BOARD_SIZE};
pub use config::EngineConfig;
pub use engine::{AiMove, AppliedMove, Engine};
pub use error::{ConfigError, GomokuError, Result};
pub use game::Game;
pub use rules::{Rules, Win, WinKind};
