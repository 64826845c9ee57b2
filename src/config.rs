//! Process configuration from the environment
//!
//! Read once at startup. A `.env` file in the working directory is loaded
//! first; real environment variables take precedence over it.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::advisory::{HttpAdvisor, DEFAULT_HISTORY_WINDOW, DEFAULT_MAX_CANDIDATES};
use crate::board::{DEFAULT_BOARD_SIZE, MAX_BOARD_SIZE, MIN_BOARD_SIZE};
use crate::engine::MoveSelector;
use crate::error::ConfigError;
use crate::profile::{in_range, read, ProfileSet};

const DEFAULT_TIMEOUT_SECS: f64 = 20.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub board_size: usize,
    /// Advisory endpoint; `None` disables advisory blending
    pub advisory_url: Option<String>,
    pub advisory_timeout: Duration,
    /// Trailing moves sent with each advisory request
    pub history_window: usize,
    /// Advisory candidates kept per response
    pub max_advisory: usize,
    pub profiles: ProfileSet,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            board_size: DEFAULT_BOARD_SIZE,
            advisory_url: None,
            advisory_timeout: Duration::from_secs_f64(DEFAULT_TIMEOUT_SECS),
            history_window: DEFAULT_HISTORY_WINDOW,
            max_advisory: DEFAULT_MAX_CANDIDATES,
            profiles: ProfileSet::default(),
        }
    }
}

impl Config {
    /// Load `.env` (if any) and read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            info!(path = %path.display(), "loaded .env");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(n) = read(&lookup, "OMOK_BOARD_SIZE")? {
            config.board_size = in_range("OMOK_BOARD_SIZE", n, MIN_BOARD_SIZE, MAX_BOARD_SIZE)?;
        }
        config.advisory_url = lookup("OMOK_LLM_URL")
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());
        if let Some(secs) = read(&lookup, "OMOK_LLM_TIMEOUT_SEC")? {
            let secs = in_range("OMOK_LLM_TIMEOUT_SEC", secs, 0.1, 600.0)?;
            config.advisory_timeout = Duration::from_secs_f64(secs);
        }
        if let Some(w) = read(&lookup, "OMOK_HISTORY_MAX")? {
            config.history_window = in_range("OMOK_HISTORY_MAX", w, 0, 625)?;
        }
        if let Some(m) = read(&lookup, "OMOK_LLM_N_CANDS")? {
            config.max_advisory = in_range("OMOK_LLM_N_CANDS", m, 1, 32)?;
        }
        config.profiles = ProfileSet::from_lookup(&lookup)?;

        Ok(config)
    }

    /// Build the move selector, attaching an HTTP advisor when configured.
    ///
    /// A client that cannot be constructed disables advisory use rather than
    /// failing startup.
    pub fn selector(&self) -> MoveSelector {
        let selector = MoveSelector::new().with_limits(self.history_window, self.max_advisory);
        let Some(url) = &self.advisory_url else {
            info!("no advisory endpoint configured, local scoring only");
            return selector;
        };
        match HttpAdvisor::new(url.clone(), self.advisory_timeout) {
            Ok(advisor) => {
                info!(%url, timeout = ?self.advisory_timeout, "advisory endpoint configured");
                selector.with_advisor(Arc::new(advisor))
            }
            Err(e) => {
                warn!(error = %e, "advisory client unavailable, local scoring only");
                selector
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::Difficulty;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(|_| None).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.board_size, 15);
        assert_eq!(config.history_window, 16);
        assert_eq!(config.max_advisory, 3);
        assert_eq!(config.advisory_timeout, Duration::from_secs(20));
        assert!(!config.selector().has_advisor());
    }

    #[test]
    fn test_values_read() {
        let config = Config::from_lookup(lookup(&[
            ("OMOK_BOARD_SIZE", "19"),
            ("OMOK_LLM_URL", " http://localhost:8001/move "),
            ("OMOK_LLM_TIMEOUT_SEC", "2.5"),
            ("OMOK_HISTORY_MAX", "8"),
            ("OMOK_LLM_N_CANDS", "5"),
            ("OMOK_ADV_TOPK", "2"),
        ]))
        .unwrap();
        assert_eq!(config.board_size, 19);
        assert_eq!(config.advisory_url.as_deref(), Some("http://localhost:8001/move"));
        assert_eq!(config.advisory_timeout, Duration::from_millis(2500));
        assert_eq!(config.history_window, 8);
        assert_eq!(config.max_advisory, 5);
        assert_eq!(config.profiles.get(Difficulty::Advanced).top_k, 2);
        assert!(config.selector().has_advisor());
    }

    #[test]
    fn test_blank_url_disables_advisory() {
        let config = Config::from_lookup(lookup(&[("OMOK_LLM_URL", "  ")])).unwrap();
        assert_eq!(config.advisory_url, None);
    }

    #[test]
    fn test_board_size_bounds() {
        let err = Config::from_lookup(lookup(&[("OMOK_BOARD_SIZE", "4")])).unwrap_err();
        assert!(matches!(err, ConfigError::Range { .. }));
        let err = Config::from_lookup(lookup(&[("OMOK_BOARD_SIZE", "big")])).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_non_finite_timeout_is_an_error() {
        for raw in ["NaN", "inf"] {
            let err = Config::from_lookup(lookup(&[("OMOK_LLM_TIMEOUT_SEC", raw)])).unwrap_err();
            assert!(matches!(err, ConfigError::Range { .. }), "{raw} accepted");
        }
    }
}
