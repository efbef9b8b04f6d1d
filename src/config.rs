//! Runtime configuration read from the environment.

use std::env;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use log::LevelFilter;

use crate::types::{HOLD_REPEAT_MS, TICK_MS};

/// Key-release timeout for terminals that never report releases.
pub const DEFAULT_KEY_RELEASE_MS: u32 = 150;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Piece generator seed.
    pub seed: u64,
    /// Frame period of the main loop.
    pub frame_ms: u32,
    /// Auto-repeat period for held movement keys.
    pub repeat_ms: u32,
    pub key_release_ms: u32,
    /// Log file; logging is off when unset.
    pub log_path: Option<String>,
    pub log_level: LevelFilter,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            seed: clock_seed(),
            frame_ms: TICK_MS,
            repeat_ms: HOLD_REPEAT_MS,
            key_release_ms: DEFAULT_KEY_RELEASE_MS,
            log_path: None,
            log_level: LevelFilter::Info,
        }
    }
}

impl AppConfig {
    /// Create from `TETTRIS_*` environment variables.
    ///
    /// Unset or unparsable values fall back to the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let seed = parsed(&lookup, "TETTRIS_SEED").unwrap_or(defaults.seed);
        let frame_ms = parsed(&lookup, "TETTRIS_FRAME_MS")
            .filter(|&ms: &u32| ms > 0)
            .unwrap_or(defaults.frame_ms);
        let repeat_ms = parsed(&lookup, "TETTRIS_REPEAT_MS")
            .filter(|&ms: &u32| ms > 0)
            .unwrap_or(defaults.repeat_ms);
        let key_release_ms =
            parsed(&lookup, "TETTRIS_KEY_RELEASE_MS").unwrap_or(defaults.key_release_ms);

        let log_path = lookup("TETTRIS_LOG_PATH")
            .map(|s| s.trim().to_string())
            .and_then(|s| if s.is_empty() { None } else { Some(s) });

        let log_level = lookup("TETTRIS_LOG_LEVEL")
            .and_then(|s| LevelFilter::from_str(s.trim()).ok())
            .unwrap_or(defaults.log_level);

        Self {
            seed,
            frame_ms,
            repeat_ms,
            key_release_ms,
            log_path,
            log_level,
        }
    }
}

fn parsed<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key).and_then(|s| s.trim().parse().ok())
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let cfg = config(&[]);
        assert_eq!(cfg.frame_ms, 16);
        assert_eq!(cfg.repeat_ms, 150);
        assert_eq!(cfg.key_release_ms, 150);
        assert_eq!(cfg.log_path, None);
        assert_eq!(cfg.log_level, LevelFilter::Info);
    }

    #[test]
    fn reads_every_variable() {
        let cfg = config(&[
            ("TETTRIS_SEED", "42"),
            ("TETTRIS_FRAME_MS", "33"),
            ("TETTRIS_REPEAT_MS", "100"),
            ("TETTRIS_KEY_RELEASE_MS", "0"),
            ("TETTRIS_LOG_PATH", " /tmp/tettris.log "),
            ("TETTRIS_LOG_LEVEL", "debug"),
        ]);
        assert_eq!(cfg.seed, 42);
        assert_eq!(cfg.frame_ms, 33);
        assert_eq!(cfg.repeat_ms, 100);
        assert_eq!(cfg.key_release_ms, 0);
        assert_eq!(cfg.log_path.as_deref(), Some("/tmp/tettris.log"));
        assert_eq!(cfg.log_level, LevelFilter::Debug);
    }

    #[test]
    fn bad_values_fall_back() {
        let cfg = config(&[
            ("TETTRIS_FRAME_MS", "0"),
            ("TETTRIS_REPEAT_MS", "fast"),
            ("TETTRIS_LOG_PATH", "   "),
            ("TETTRIS_LOG_LEVEL", "loud"),
        ]);
        assert_eq!(cfg.frame_ms, 16);
        assert_eq!(cfg.repeat_ms, 150);
        assert_eq!(cfg.log_path, None);
        assert_eq!(cfg.log_level, LevelFilter::Info);
    }
}
