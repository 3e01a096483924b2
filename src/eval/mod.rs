//! Position evaluation

pub mod heuristic;
pub mod patterns;

pub use heuristic::{classify_run, count_patterns, Evaluator, PatternAnalysis, PatternCounts};
pub use patterns::{PatternKind, PatternWeights};
