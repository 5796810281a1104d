//! TOML-based application configuration.
//!
//! Stores:
//! - Reminder defaults (lead time, per-event cap)
//! - Nudge delivery settings (callable endpoint, timeout)
//! - Local cache settings
//!
//! Configuration is stored at `~/.config/couplet/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Returns `~/.config/couplet[-dev]/` based on COUPLET_ENV.
///
/// Set COUPLET_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("COUPLET_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("couplet-dev")
    } else {
        base_dir.join("couplet")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Reminder scheduling configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemindersConfig {
    /// Lead time of the synthesized reminder when an event has none.
    #[serde(default = "default_lead_minutes")]
    pub default_lead_minutes: i64,
    /// Cap on alarm registrations per event.
    #[serde(default = "default_max_per_event")]
    pub max_per_event: usize,
}

/// Nudge delivery configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NudgeConfig {
    /// URL of the server-side callable push endpoint.
    #[serde(default)]
    pub endpoint: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Local cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Filename of the partner-link cache inside the data directory.
    #[serde(default = "default_cache_filename")]
    pub filename: String,
}

fn default_lead_minutes() -> i64 {
    15
}
fn default_max_per_event() -> usize {
    8
}
fn default_timeout_secs() -> u64 {
    10
}
fn default_cache_filename() -> String {
    "partner_cache.db".into()
}

impl Default for RemindersConfig {
    fn default() -> Self {
        Self {
            default_lead_minutes: default_lead_minutes(),
            max_per_event: default_max_per_event(),
        }
    }
}

impl Default for NudgeConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            filename: default_cache_filename(),
        }
    }
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/couplet/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub reminders: RemindersConfig,
    #[serde(default)]
    pub nudge: NudgeConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

impl Config {
    fn path() -> Result<PathBuf, std::io::Error> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or return default (writing it out on first run).
    ///
    /// # Errors
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content)?;
                Ok(cfg)
            }
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    /// Returns an error if the config cannot be serialized or written.
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(Self::path()?, content)?;
        Ok(())
    }

    /// Load from disk, returning default on error. Never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }
}
