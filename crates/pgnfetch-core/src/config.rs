use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::retry::RetryPolicy;

/// Browser-like client identity; the catalog host rejects bare library agents.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Retry policy parameters (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per record (including the first).
    pub max_attempts: u32,
    /// Base delay in seconds for exponential backoff (e.g. 0.25 = 250ms).
    pub base_delay_secs: f64,
    /// Maximum backoff delay in seconds.
    pub max_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_secs: 0.25,
            max_delay_secs: 30,
        }
    }
}

impl RetryConfig {
    pub fn to_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts.max(1),
            base_delay: Duration::from_secs_f64(self.base_delay_secs.max(0.0)),
            max_delay: Duration::from_secs(self.max_delay_secs),
        }
    }
}

/// Global configuration loaded from `~/.config/pgnfetch/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Page holding the issue table.
    pub index_url: String,
    /// Directory of persisted catalog records (`twic_NNNN.json`).
    pub records_dir: PathBuf,
    /// Directory downloaded archives are written to.
    pub destination_dir: PathBuf,
    /// Number of worker threads (fetches in flight at once).
    pub concurrency: usize,
    /// Connect and whole-transfer timeout per request, in seconds.
    pub timeout_secs: u64,
    /// Pause the dispatcher after every N completions (0 disables pausing).
    pub pause_every: usize,
    /// Length of the cadence pause in seconds.
    pub pause_secs: f64,
    /// Value sent in the `User-Agent` header.
    pub user_agent: String,
    /// Optional retry policy; if missing, each record gets a single attempt.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            index_url: "https://theweekinchess.com/twic".to_string(),
            records_dir: PathBuf::from("twic_data"),
            destination_dir: PathBuf::from("twic_pgns"),
            concurrency: 5,
            timeout_secs: 30,
            pause_every: 10,
            pause_secs: 1.0,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            retry: None,
        }
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    pub fn pause(&self) -> Duration {
        Duration::from_secs_f64(self.pause_secs.max(0.0))
    }

    /// Retry policy for a record fetch; a single attempt when `[retry]` is absent.
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
            .as_ref()
            .map(RetryConfig::to_policy)
            .unwrap_or_else(RetryPolicy::single_attempt)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("pgnfetch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<FetchConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = FetchConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: FetchConfig = toml::from_str(&data)?;
    Ok(cfg)
}
