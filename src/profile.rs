//! Difficulty profiles
//!
//! A profile is an immutable bundle of tuning parameters handed down the
//! whole selection pipeline. Profiles are built once at startup (defaults
//! plus optional environment overrides) and never modified afterwards.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::eval::ScoreWeights;

/// Named difficulty tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Beginner,
    Advanced,
}

impl Difficulty {
    /// Lenient parse used for client input: anything not recognised as
    /// advanced is treated as beginner.
    pub fn parse(name: &str) -> Difficulty {
        match name.trim().to_lowercase().as_str() {
            "advanced" | "hard" | "pro" | "고급" => Difficulty::Advanced,
            _ => Difficulty::Beginner,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Advanced => "advanced",
        }
    }

    /// Environment variable prefix for this tier's overrides
    fn env_prefix(self) -> &'static str {
        match self {
            Difficulty::Beginner => "OMOK_BEGINNER_",
            Difficulty::Advanced => "OMOK_ADV_",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Difficulty {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Difficulty::parse(s))
    }
}

/// Tuning parameters for one difficulty tier
#[derive(Debug, Clone, PartialEq)]
pub struct DifficultyProfile {
    pub difficulty: Difficulty,
    /// Chance that a possible opponent open three is force-blocked
    pub block_open_three_prob: f64,
    /// Candidates kept for the final pick; 1 means argmax
    pub top_k: usize,
    /// Softmax temperature over the top-K scores, in raw score units.
    /// Scores differ by 1e5 and up, so values near 1 behave like argmax.
    pub temperature: f64,
    /// Weight of the advisory score when blending
    pub advisory_alpha: f64,
    /// Half-width of the uniform score jitter
    pub jitter: f64,
    /// Center-ranked cells added when the local pool is thin
    pub exploration_k: usize,
    pub center_scale: f64,
    /// Chebyshev radius for "near an existing stone"
    pub near_radius: usize,
    pub force_block_open_four: bool,
    pub force_block_semi_four: bool,
    /// Consult the advisory collaborator before the final pick
    pub uses_advisory: bool,
    pub weights: ScoreWeights,
}

impl DifficultyProfile {
    pub fn beginner() -> Self {
        Self {
            difficulty: Difficulty::Beginner,
            block_open_three_prob: 0.35,
            top_k: 4,
            temperature: 0.85,
            advisory_alpha: 0.7,
            jitter: 12_000.0,
            exploration_k: 45,
            center_scale: 260_000.0,
            near_radius: 2,
            force_block_open_four: true,
            force_block_semi_four: true,
            uses_advisory: true,
            weights: ScoreWeights::default(),
        }
    }

    pub fn advanced() -> Self {
        Self {
            difficulty: Difficulty::Advanced,
            block_open_three_prob: 1.0,
            top_k: 1,
            temperature: 0.0,
            advisory_alpha: 0.35,
            jitter: 1_500.0,
            exploration_k: 25,
            center_scale: 180_000.0,
            near_radius: 2,
            force_block_open_four: true,
            force_block_semi_four: true,
            uses_advisory: false,
            weights: ScoreWeights::default(),
        }
    }

    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Beginner => Self::beginner(),
            Difficulty::Advanced => Self::advanced(),
        }
    }

    /// Same profile without randomness: argmax pick, zero jitter, and
    /// open threes always blocked. Used for hints and tests.
    pub fn deterministic(mut self) -> Self {
        self.top_k = 1;
        self.temperature = 0.0;
        self.jitter = 0.0;
        self.block_open_three_prob = 1.0;
        self
    }

    /// Apply `<PREFIX>*` overrides from `lookup` (normally the environment).
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let prefix = self.difficulty.env_prefix();
        let key = |name: &str| format!("{prefix}{name}");

        if let Some(p) = read(&lookup, &key("BLOCK_OPEN3_PROB"))? {
            self.block_open_three_prob = in_range(&key("BLOCK_OPEN3_PROB"), p, 0.0, 1.0)?;
        }
        if let Some(k) = read(&lookup, &key("TOPK"))? {
            self.top_k = in_range(&key("TOPK"), k, 1, 64)?;
        }
        if let Some(t) = read(&lookup, &key("TEMP"))? {
            self.temperature = in_range(&key("TEMP"), t, 0.0, 1e12)?;
        }
        if let Some(a) = read(&lookup, &key("ALPHA"))? {
            self.advisory_alpha = in_range(&key("ALPHA"), a, 0.0, 1.0)?;
        }
        if let Some(j) = read(&lookup, &key("JITTER"))? {
            self.jitter = in_range(&key("JITTER"), j, 0.0, 1e9)?;
        }
        if let Some(k) = read(&lookup, &key("EXPLORATION_K"))? {
            self.exploration_k = in_range(&key("EXPLORATION_K"), k, 0, 625)?;
        }
        if let Some(c) = read(&lookup, &key("CENTER_SCALE"))? {
            self.center_scale = in_range(&key("CENTER_SCALE"), c, 0.0, 1e9)?;
        }
        if let Some(r) = read(&lookup, &key("NEAR_RADIUS"))? {
            self.near_radius = in_range(&key("NEAR_RADIUS"), r, 1, 5)?;
        }
        self.weights = self.weights.with_overrides(&lookup)?;
        if !self.weights.is_tiered(self.center_scale, self.jitter) {
            return Err(ConfigError::Untiered {
                difficulty: self.difficulty.to_string(),
            });
        }
        Ok(self)
    }
}

/// The profiles available to a running process
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileSet {
    beginner: DifficultyProfile,
    advanced: DifficultyProfile,
}

impl ProfileSet {
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            beginner: DifficultyProfile::beginner().with_overrides(&lookup)?,
            advanced: DifficultyProfile::advanced().with_overrides(&lookup)?,
        })
    }

    pub fn get(&self, difficulty: Difficulty) -> &DifficultyProfile {
        match difficulty {
            Difficulty::Beginner => &self.beginner,
            Difficulty::Advanced => &self.advanced,
        }
    }
}

impl Default for ProfileSet {
    fn default() -> Self {
        Self {
            beginner: DifficultyProfile::beginner(),
            advanced: DifficultyProfile::advanced(),
        }
    }
}

pub(crate) fn read<T, F>(lookup: &F, key: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw.trim().parse().map(Some).map_err(|_| ConfigError::Parse {
            key: key.to_string(),
            value: raw,
        }),
    }
}

pub(crate) fn in_range<T>(key: &str, value: T, min: T, max: T) -> Result<T, ConfigError>
where
    T: PartialOrd + fmt::Display,
{
    // Written so that NaN fails both comparisons and is rejected
    if !(value >= min && value <= max) {
        return Err(ConfigError::Range {
            key: key.to_string(),
            value: value.to_string(),
            min: min.to_string(),
            max: max.to_string(),
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_difficulty_parse_normalises() {
        assert_eq!(Difficulty::parse("hard"), Difficulty::Advanced);
        assert_eq!(Difficulty::parse(" Advanced "), Difficulty::Advanced);
        assert_eq!(Difficulty::parse("고급"), Difficulty::Advanced);
        assert_eq!(Difficulty::parse("easy"), Difficulty::Beginner);
        assert_eq!(Difficulty::parse(""), Difficulty::Beginner);
        assert_eq!("whatever".parse::<Difficulty>().unwrap(), Difficulty::Beginner);
    }

    #[test]
    fn test_default_profiles() {
        let adv = DifficultyProfile::advanced();
        assert_eq!(adv.top_k, 1);
        assert!(!adv.uses_advisory);
        let beg = DifficultyProfile::beginner();
        assert!(beg.top_k > 1);
        assert!(beg.uses_advisory);
        assert!(beg.block_open_three_prob < 1.0);
    }

    #[test]
    fn test_overrides_apply_to_matching_tier_only() {
        let set = ProfileSet::from_lookup(lookup(&[
            ("OMOK_BEGINNER_TOPK", "6"),
            ("OMOK_ADV_JITTER", "0"),
        ]))
        .unwrap();
        assert_eq!(set.get(Difficulty::Beginner).top_k, 6);
        assert_eq!(set.get(Difficulty::Beginner).jitter, 12_000.0);
        assert_eq!(set.get(Difficulty::Advanced).jitter, 0.0);
        assert_eq!(set.get(Difficulty::Advanced).top_k, 1);
    }

    #[test]
    fn test_override_errors() {
        let bad = DifficultyProfile::beginner()
            .with_overrides(lookup(&[("OMOK_BEGINNER_ALPHA", "lots")]));
        assert!(matches!(bad, Err(ConfigError::Parse { .. })));

        let out = DifficultyProfile::beginner()
            .with_overrides(lookup(&[("OMOK_BEGINNER_BLOCK_OPEN3_PROB", "1.5")]));
        assert!(matches!(out, Err(ConfigError::Range { .. })));
    }

    #[test]
    fn test_non_finite_values_rejected() {
        for raw in ["NaN", "inf", "-inf"] {
            let res = DifficultyProfile::beginner()
                .with_overrides(lookup(&[("OMOK_BEGINNER_BLOCK_OPEN3_PROB", raw)]));
            assert!(matches!(res, Err(ConfigError::Range { .. })), "{raw} accepted");
        }
        assert!(in_range("K", f64::NAN, 0.0, 1.0).is_err());
        assert!(in_range("K", f64::INFINITY, 0.0, 1e12).is_err());
        assert_eq!(in_range("K", 1.0, 0.0, 1.0), Ok(1.0));
    }

    #[test]
    fn test_weight_override_breaking_tiers_rejected() {
        let err = ProfileSet::from_lookup(lookup(&[("OMOK_BLOCK_OPEN4_BONUS", "9e10")])).unwrap_err();
        assert!(matches!(err, ConfigError::Untiered { .. }));

        // Jitter large enough to swamp the open-three block is refused too
        let err = ProfileSet::from_lookup(lookup(&[("OMOK_ADV_JITTER", "1e9")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Untiered {
                difficulty: "advanced".to_string()
            }
        );

        assert!(ProfileSet::from_lookup(lookup(&[("OMOK_BLOCK_OPEN4_BONUS", "7e9")])).is_ok());
    }

    #[test]
    fn test_deterministic() {
        let p = DifficultyProfile::beginner().deterministic();
        assert_eq!(p.top_k, 1);
        assert_eq!(p.jitter, 0.0);
        assert_eq!(p.block_open_three_prob, 1.0);
    }
}
