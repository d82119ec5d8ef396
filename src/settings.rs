//! Runner settings read from the environment.

use std::time::{SystemTime, UNIX_EPOCH};

use sumstack_types::GameMode;

/// How the terminal runner is started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    /// Seed for the tile/target generator.
    pub seed: u32,
    /// Start this mode immediately instead of showing the menu.
    pub mode: Option<GameMode>,
    /// Write logs to this file. No subscriber is installed without it.
    pub log_path: Option<String>,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            seed: clock_seed(),
            mode: None,
            log_path: None,
        }
    }
}

impl RunSettings {
    /// Create from environment variables.
    ///
    /// - `SUMSTACK_SEED`: u32 seed (default: derived from the clock)
    /// - `SUMSTACK_MODE`: `classic` or `time`
    /// - `SUMSTACK_LOG_PATH`: log file path
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`RunSettings::from_env`] with a custom variable lookup.
    /// Malformed values fall back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let seed = lookup("SUMSTACK_SEED")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or_else(clock_seed);

        let mode = lookup("SUMSTACK_MODE").and_then(|s| GameMode::from_str(s.trim()));

        let log_path = lookup("SUMSTACK_LOG_PATH")
            .map(|s| s.trim().to_string())
            .and_then(|s| if s.is_empty() { None } else { Some(s) });

        Self {
            seed,
            mode,
            log_path,
        }
    }
}

/// Seed from the wall clock. Never zero.
fn clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| (d.as_secs() as u32) ^ d.subsec_nanos())
        .unwrap_or(1)
        .max(1)
}
