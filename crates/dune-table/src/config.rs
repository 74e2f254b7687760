//! Configuration for table state: where data lives and how long drafts last.

use std::path::PathBuf;

use chrono::TimeDelta;

/// File name of the per-channel Momentum/Threat pools.
pub const MOMENTUM_FILE: &str = "momentum_pools.json";
/// File name of the character roster.
pub const CHARACTERS_FILE: &str = "characters.json";
/// File name of the NPC roster.
pub const NPCS_FILE: &str = "npcs.json";

/// Configuration for the table stores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableConfig {
    /// Directory holding every data file.
    pub data_dir: PathBuf,
    /// Log filter used when `RUST_LOG` is not set.
    pub log_level: String,
    /// Hours of inactivity before a creation session expires.
    pub creation_ttl_hours: u32,
    /// RNG seed for reproducible rolls; OS entropy when absent.
    pub seed: Option<u64>,
    /// Characters one user may own in one guild.
    pub max_characters_per_user: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            log_level: "warn".to_string(),
            creation_ttl_hours: 24,
            seed: None,
            max_characters_per_user: 3,
        }
    }
}

impl TableConfig {
    /// Build a config from the process environment.
    ///
    /// Reads `DATA_DIR`, `LOG_LEVEL`, `CREATION_TTL_HOURS`, `DUNE_SEED` and
    /// `MAX_CHARACTERS_PER_USER`. Unset variables keep their defaults;
    /// unparsable ones are logged and ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup.
    ///
    /// Numeric limits go through the same clamps as the builder methods.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self {
            log_level: Self::log_level_from(&lookup),
            ..Self::default()
        };
        if let Some(dir) = lookup("DATA_DIR").filter(|d| !d.trim().is_empty()) {
            cfg = cfg.with_data_dir(dir);
        }
        if let Some(hours) = parse_var(&lookup, "CREATION_TTL_HOURS") {
            cfg = cfg.with_creation_ttl_hours(hours);
        }
        if let Some(seed) = parse_var(&lookup, "DUNE_SEED") {
            cfg = cfg.with_seed(seed);
        }
        if let Some(max) = parse_var(&lookup, "MAX_CHARACTERS_PER_USER") {
            cfg = cfg.with_max_characters(max);
        }
        cfg
    }

    /// The log filter from `LOG_LEVEL` alone, for setting up logging before
    /// the rest of the config is read.
    pub fn log_level_from(lookup: impl Fn(&str) -> Option<String>) -> String {
        lookup("LOG_LEVEL")
            .filter(|l| !l.trim().is_empty())
            .unwrap_or_else(|| Self::default().log_level)
    }

    /// Set the data directory.
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the creation session lifetime in hours (at least 1).
    pub fn with_creation_ttl_hours(mut self, hours: u32) -> Self {
        self.creation_ttl_hours = hours.max(1);
        self
    }

    /// Set the per-user character limit (at least 1).
    pub fn with_max_characters(mut self, max: usize) -> Self {
        self.max_characters_per_user = max.max(1);
        self
    }

    /// Creation session lifetime.
    pub fn creation_ttl(&self) -> TimeDelta {
        TimeDelta::hours(i64::from(self.creation_ttl_hours))
    }

    /// Path of the Momentum/Threat pool file.
    pub fn momentum_path(&self) -> PathBuf {
        self.data_dir.join(MOMENTUM_FILE)
    }

    /// Path of the character roster file.
    pub fn characters_path(&self) -> PathBuf {
        self.data_dir.join(CHARACTERS_FILE)
    }

    /// Path of the NPC roster file.
    pub fn npcs_path(&self) -> PathBuf {
        self.data_dir.join(NPCS_FILE)
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key, value = %raw, "ignoring unparsable environment variable");
            None
        }
    }
}
