use serde::Deserialize;
use std::time::Duration;

use crate::connection::Backoff;

/// Complete client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FleetsyncConfig {
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub backoff: BackoffConfig,
}

/// Feed endpoint configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    /// Base URL of the hosting HTTP service. The feed lives on the same
    /// host and port, scheme-upgraded to ws/wss.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Feed endpoint path
    #[serde(default = "default_ws_path")]
    pub ws_path: String,

    /// Advisory snapshot-request endpoint path
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: String,
}

fn default_base_url() -> String {
    std::env::var("FEED_BASE_URL").unwrap_or_else(|_| "http://localhost:8000".to_string())
}

fn default_ws_path() -> String {
    "/ws".to_string()
}

fn default_snapshot_path() -> String {
    "/api/assets".to_string()
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            ws_path: default_ws_path(),
            snapshot_path: default_snapshot_path(),
        }
    }
}

/// Reconnect backoff configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BackoffConfig {
    /// Delay before the first reconnect attempt (seconds)
    #[serde(default = "default_floor_secs")]
    pub floor_secs: u64,

    /// Maximum delay between reconnect attempts (seconds)
    #[serde(default = "default_ceiling_secs")]
    pub ceiling_secs: u64,
}

fn default_floor_secs() -> u64 {
    1
}

fn default_ceiling_secs() -> u64 {
    10
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            floor_secs: default_floor_secs(),
            ceiling_secs: default_ceiling_secs(),
        }
    }
}

impl BackoffConfig {
    pub fn to_backoff(&self) -> Backoff {
        Backoff::new(
            Duration::from_secs(self.floor_secs),
            Duration::from_secs(self.ceiling_secs),
        )
    }
}

impl Default for FleetsyncConfig {
    fn default() -> Self {
        Self {
            feed: FeedConfig::default(),
            backoff: BackoffConfig::default(),
        }
    }
}

/// Load configuration from TOML file
pub fn load_config(path: &str) -> Result<FleetsyncConfig, Box<dyn std::error::Error>> {
    let contents = std::fs::read_to_string(path)?;
    let config: FleetsyncConfig = toml::from_str(&contents)?;
    Ok(config)
}
