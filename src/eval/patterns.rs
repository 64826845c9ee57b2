//! Pattern scores for move evaluation
//!
//! Scores are grouped in tiers. Each tier's smallest bonus must exceed the
//! sum of everything a lower tier can contribute, so a lower tier never
//! outranks a higher one.

use crate::error::ConfigError;
use crate::profile::{in_range, read};

/// Fixed sentinels and shape bonuses
pub struct PatternScore;

impl PatternScore {
    /// Mover completes a win
    pub const WIN: f64 = 1e12;
    /// Opponent would complete a win here
    pub const BLOCK_WIN: f64 = 1e11;

    // Own shapes. Semi-four includes open-four, so an open four collects both.
    pub const OPEN_FOUR: f64 = 5e10;
    pub const SEMI_FOUR: f64 = 2e10;
    pub const OPEN_THREE: f64 = 8e9;

    // Line-extension terms, per axis
    pub const LINE_LENGTH: f64 = 1e6;
    pub const LINE_OPEN_END: f64 = 2e5;

    /// Returned for occupied or off-board cells
    pub const INVALID: f64 = -1e15;
}

/// Tunable weights for the defensive and locality terms
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreWeights {
    pub block_open_four: f64,
    pub block_semi_four: f64,
    pub block_open_three: f64,
    /// Bonus for having a stone within the near radius
    pub neighbor: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            block_open_four: 6e9,
            block_semi_four: 3e9,
            block_open_three: 1e9,
            neighbor: 3e5,
        }
    }
}

impl ScoreWeights {
    /// Upper bound on what the extension, locality, center and jitter
    /// terms can add together.
    pub fn positional_ceiling(&self, center_scale: f64, jitter: f64) -> f64 {
        // Below tier 3 a run through the cell is at most 4 long
        4.0 * (4.0 * PatternScore::LINE_LENGTH + 2.0 * PatternScore::LINE_OPEN_END)
            + self.neighbor
            + center_scale
            + jitter
    }

    /// Check the tier ordering holds with these weights.
    pub fn is_tiered(&self, center_scale: f64, jitter: f64) -> bool {
        let positional = self.positional_ceiling(center_scale, jitter);
        let blocks = self.block_open_four + self.block_semi_four + self.block_open_three;
        let own = PatternScore::OPEN_FOUR + PatternScore::SEMI_FOUR + PatternScore::OPEN_THREE;

        self.block_open_three > positional
            && self.block_open_four >= self.block_semi_four
            && self.block_semi_four >= self.block_open_three
            && PatternScore::OPEN_THREE > self.block_open_three
            && PatternScore::OPEN_THREE + blocks + positional < PatternScore::SEMI_FOUR
            && PatternScore::OPEN_THREE + blocks + positional < PatternScore::OPEN_FOUR
            && own + blocks + positional < PatternScore::BLOCK_WIN
    }

    pub fn with_overrides<F>(mut self, lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        const MAX: f64 = 1e11;
        if let Some(v) = read(lookup, "OMOK_BLOCK_OPEN4_BONUS")? {
            self.block_open_four = in_range("OMOK_BLOCK_OPEN4_BONUS", v, 0.0, MAX)?;
        }
        if let Some(v) = read(lookup, "OMOK_BLOCK_SEMI4_BONUS")? {
            self.block_semi_four = in_range("OMOK_BLOCK_SEMI4_BONUS", v, 0.0, MAX)?;
        }
        if let Some(v) = read(lookup, "OMOK_BLOCK_OPEN3_BONUS")? {
            self.block_open_three = in_range("OMOK_BLOCK_OPEN3_BONUS", v, 0.0, MAX)?;
        }
        if let Some(v) = read(lookup, "OMOK_NEIGHBOR_BONUS")? {
            self.neighbor = in_range("OMOK_NEIGHBOR_BONUS", v, 0.0, MAX)?;
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::DifficultyProfile;

    #[test]
    fn test_pattern_score_hierarchy() {
        assert!(PatternScore::WIN > PatternScore::BLOCK_WIN);
        assert!(PatternScore::BLOCK_WIN > PatternScore::OPEN_FOUR);
        assert!(PatternScore::OPEN_FOUR > PatternScore::SEMI_FOUR);
        assert!(PatternScore::SEMI_FOUR > PatternScore::OPEN_THREE);
        assert!(PatternScore::LINE_LENGTH > PatternScore::LINE_OPEN_END);
    }

    #[test]
    fn test_default_weights_are_tiered_for_builtin_profiles() {
        for profile in [DifficultyProfile::beginner(), DifficultyProfile::advanced()] {
            assert!(
                profile.weights.is_tiered(profile.center_scale, profile.jitter),
                "{} weights break tier ordering",
                profile.difficulty
            );
        }
    }

    #[test]
    fn test_inverted_block_weights_not_tiered() {
        let weights = ScoreWeights {
            block_open_four: 7e9,
            block_semi_four: 6e9,
            block_open_three: 5e9,
            neighbor: 3e5,
        };
        assert!(!weights.is_tiered(260_000.0, 12_000.0));
    }

    #[test]
    fn test_weight_overrides() {
        let weights = ScoreWeights::default()
            .with_overrides(&|key: &str| (key == "OMOK_NEIGHBOR_BONUS").then(|| "1000".to_string()))
            .unwrap();
        assert_eq!(weights.neighbor, 1000.0);
        assert_eq!(weights.block_open_four, 6e9);
    }
}
