//! Engine configuration
//!
//! All tunables live in one explicit [`EngineConfig`] handed to
//! [`Engine::new`](crate::engine::Engine::new). Configs can be loaded from JSON;
//! missing fields fall back to the defaults.
//!
//! ```
//! use gomoku::config::EngineConfig;
//!
//! let config = EngineConfig::from_json_str(r#"{ "max_depth": 6, "time_budget_ms": 250 }"#).unwrap();
//! assert_eq!(config.max_depth, 6);
//! assert_eq!(config.rules.capture_win_stones, 10);
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::board::BOARD_SIZE;
use crate::error::ConfigError;
use crate::eval::PatternWeights;
use crate::rules::RuleConfig;

/// Deepest iterative-deepening iteration the searcher will attempt.
pub const MAX_SEARCH_DEPTH: u8 = 32;

/// Largest transposition table a config may ask for.
pub const MAX_TT_SIZE_MB: usize = 4096;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Side length of the board. Only 19 is supported.
    pub board_size: usize,
    /// Iterative deepening stops after this depth.
    pub max_depth: u8,
    /// Per-move thinking time for the AI.
    pub time_budget_ms: u64,
    /// Thinking time for move suggestions shown to a human.
    pub suggestion_time_ms: u64,
    /// Transposition table budget in megabytes.
    pub tt_size_mb: usize,
    /// Candidate moves are empty cells within this Chebyshev distance of a stone.
    pub neighborhood_radius: u8,
    pub rules: RuleConfig,
    pub weights: PatternWeights,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            board_size: BOARD_SIZE,
            max_depth: 10,
            time_budget_ms: 500,
            suggestion_time_ms: 200,
            tt_size_mb: 16,
            neighborhood_radius: 2,
            rules: RuleConfig::default(),
            weights: PatternWeights::default(),
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn time_budget(&self) -> Duration {
        Duration::from_millis(self.time_budget_ms)
    }

    pub fn suggestion_budget(&self) -> Duration {
        Duration::from_millis(self.suggestion_time_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.board_size != BOARD_SIZE {
            return Err(ConfigError::Invalid(format!(
                "board_size {} is not supported (only {BOARD_SIZE})",
                self.board_size
            )));
        }
        if self.max_depth == 0 || self.max_depth > MAX_SEARCH_DEPTH {
            return Err(ConfigError::Invalid(format!(
                "max_depth must be in 1..={MAX_SEARCH_DEPTH}, got {}",
                self.max_depth
            )));
        }
        if self.tt_size_mb == 0 || self.tt_size_mb > MAX_TT_SIZE_MB {
            return Err(ConfigError::Invalid(format!(
                "tt_size_mb must be in 1..={MAX_TT_SIZE_MB}, got {}",
                self.tt_size_mb
            )));
        }
        if self.neighborhood_radius == 0 || self.neighborhood_radius > 4 {
            return Err(ConfigError::Invalid(format!(
                "neighborhood_radius must be in 1..=4, got {}",
                self.neighborhood_radius
            )));
        }
        self.rules.validate()?;
        self.weights.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::EndgameCapture;

    #[test]
    fn test_default_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.time_budget(), Duration::from_millis(500));
        assert_eq!(config.max_depth, 10);
        assert_eq!(config.neighborhood_radius, 2);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = EngineConfig::from_json_str(
            r#"{ "time_budget_ms": 100, "rules": { "endgame_capture": "off" } }"#,
        )
        .unwrap();
        assert_eq!(config.time_budget_ms, 100);
        assert_eq!(config.rules.endgame_capture, EndgameCapture::Off);
        assert!(config.rules.enforce_double_three);
        assert_eq!(config.weights, PatternWeights::default());
    }

    #[test]
    fn test_json_round_trip() {
        let config = EngineConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(EngineConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_rejects_other_board_sizes() {
        let err = EngineConfig::from_json_str(r#"{ "board_size": 15 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_zero_depth() {
        let config = EngineConfig {
            max_depth: 0,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_oversized_table() {
        let err = EngineConfig::from_json_str(r#"{ "tt_size_mb": 1000000 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        let config = EngineConfig {
            tt_size_mb: MAX_TT_SIZE_MB,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_malformed_json() {
        let err = EngineConfig::from_json_str("{ max_depth: ").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = EngineConfig::load("/nonexistent/gomoku.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
