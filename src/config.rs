// Bot configuration - identity and file locations
// Loaded from a JSON file; anything omitted falls back to the defaults

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// The bot's own author identity; items it authored are never answered.
    #[serde(default = "default_bot_username")]
    pub bot_username: String,

    /// Directory holding the six reference CSV tables.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// SQLite ledger of already-answered item ids.
    #[serde(default = "default_ledger_path")]
    pub ledger_path: PathBuf,

    /// Single-instance lock file.
    #[serde(default = "default_pid_path")]
    pub pid_path: PathBuf,

    /// Backoff after a transient stream error, in seconds.
    #[serde(default = "default_retry_initial_secs")]
    pub retry_initial_secs: u64,

    #[serde(default = "default_retry_max_secs")]
    pub retry_max_secs: u64,
}

fn default_bot_username() -> String {
    "afsc-annotator".to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_ledger_path() -> PathBuf {
    PathBuf::from("annotator.db")
}

fn default_pid_path() -> PathBuf {
    PathBuf::from("afsc-annotator.pid")
}

fn default_retry_initial_secs() -> u64 {
    5
}

fn default_retry_max_secs() -> u64 {
    60
}

impl Default for BotConfig {
    fn default() -> Self {
        BotConfig {
            bot_username: default_bot_username(),
            data_dir: default_data_dir(),
            ledger_path: default_ledger_path(),
            pid_path: default_pid_path(),
            retry_initial_secs: default_retry_initial_secs(),
            retry_max_secs: default_retry_max_secs(),
        }
    }
}

impl BotConfig {
    /// Load configuration from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        let config: BotConfig =
            serde_json::from_str(&content).context("Failed to parse config JSON")?;

        Ok(config)
    }
}

// ============================================================================
// TESTS
// ============================================================================
