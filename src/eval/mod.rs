//! Move evaluation
//!
//! Contains:
//! - Score tiers and tunable weights
//! - Candidate generation around existing stones
//! - Single-cell heuristic scoring

pub mod candidates;
pub mod heuristic;
pub mod patterns;

pub use candidates::generate;
pub use heuristic::{center_bonus, center_phase, score_move, ScoreContext};
pub use patterns::{PatternScore, ScoreWeights};
