//! Configuration loading for the support client
//!
//! Supports loading the client configuration from (in order of priority):
//! 1. Compile-time embedded settings (for production builds)
//! 2. JSON file (~/.config/shopdesk/client.json)
//! 3. Runtime environment variables (fallback)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Client config filename in the shopdesk config directory
const CLIENT_FILE: &str = "client.json";

/// Cadence parameters for the adaptive poller
///
/// All intervals are in milliseconds. Use [`PollConfig::validate`] before
/// handing a config to a poller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollConfig {
    /// Fastest cadence, used right after activity
    pub min_interval_ms: u64,
    /// Slowest cadence, also used while polling is gated off
    pub max_interval_ms: u64,
    /// How much the interval grows on each backoff
    pub backoff_step_ms: u64,
    /// Consecutive unchanged polls before each backoff step
    pub idle_threshold: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            min_interval_ms: 2_000,
            max_interval_ms: 30_000,
            backoff_step_ms: 2_000,
            idle_threshold: 3,
        }
    }
}

/// A poll config that breaks the cadence invariants
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PollConfigError {
    #[error("minimum poll interval must be greater than zero")]
    ZeroMinInterval,
    #[error("minimum poll interval ({min_ms}ms) exceeds maximum ({max_ms}ms)")]
    MinAboveMax { min_ms: u64, max_ms: u64 },
    #[error("backoff step must be greater than zero")]
    ZeroBackoffStep,
    #[error("idle threshold must be at least 1")]
    ZeroIdleThreshold,
}

impl PollConfig {
    /// Check 0 < min <= max, step > 0 and threshold >= 1
    pub fn validate(&self) -> Result<(), PollConfigError> {
        if self.min_interval_ms == 0 {
            return Err(PollConfigError::ZeroMinInterval);
        }
        if self.min_interval_ms > self.max_interval_ms {
            return Err(PollConfigError::MinAboveMax {
                min_ms: self.min_interval_ms,
                max_ms: self.max_interval_ms,
            });
        }
        if self.backoff_step_ms == 0 {
            return Err(PollConfigError::ZeroBackoffStep);
        }
        if self.idle_threshold == 0 {
            return Err(PollConfigError::ZeroIdleThreshold);
        }
        Ok(())
    }

    pub fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms)
    }

    pub fn max_interval(&self) -> Duration {
        Duration::from_millis(self.max_interval_ms)
    }

    pub fn backoff_step(&self) -> Duration {
        Duration::from_millis(self.backoff_step_ms)
    }
}

/// Everything the client needs to talk to the shop backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Endpoint accepting `{action, user, ...}` POST requests
    pub api_url: String,
    /// Identifier of the signed-in user
    pub user: String,
    /// Poller cadence
    #[serde(default)]
    pub poll: PollConfig,
}

impl ClientConfig {
    /// Load the config using the following priority:
    /// 1. Compile-time embedded settings (production builds)
    /// 2. JSON file (~/.config/shopdesk/client.json)
    /// 3. Runtime environment variables
    pub fn load() -> Result<Self> {
        let config = if let Some(config) = Self::from_compile_time() {
            config
        } else if config::config_exists(CLIENT_FILE) {
            config::load_json(CLIENT_FILE)?
        } else {
            Self::from_env()?
        };
        config.validate()?;
        Ok(config)
    }

    /// Load settings embedded at compile time via environment variables.
    /// Build with: SHOPDESK_API_URL=xxx SHOPDESK_USER=yyy cargo build --release
    pub fn from_compile_time() -> Option<Self> {
        let api_url = option_env!("SHOPDESK_API_URL")?;
        let user = option_env!("SHOPDESK_USER")?;

        if api_url.is_empty() || user.is_empty() {
            return None;
        }

        Some(Self {
            api_url: api_url.to_string(),
            user: user.to_string(),
            poll: PollConfig::default(),
        })
    }

    /// Load the config from a specific JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let config: Self = config::load_json_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse the config from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).context("Failed to parse client config JSON")?;
        config.validate()?;
        Ok(config)
    }

    /// Load the config from environment variables
    pub fn from_env() -> Result<Self> {
        let api_url = std::env::var("SHOPDESK_API_URL")
            .context("SHOPDESK_API_URL environment variable not set")?;
        let user =
            std::env::var("SHOPDESK_USER").context("SHOPDESK_USER environment variable not set")?;

        Ok(Self {
            api_url,
            user,
            poll: PollConfig::default(),
        })
    }

    /// Check the endpoint URL, user and poll cadence
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.api_url)
            .with_context(|| format!("Invalid API URL: {}", self.api_url))?;
        if self.user.trim().is_empty() {
            anyhow::bail!("User identifier must not be empty");
        }
        self.poll.validate()?;
        Ok(())
    }

    /// Get the default config file path (~/.config/shopdesk/client.json)
    pub fn default_config_path() -> Option<PathBuf> {
        config::config_path(CLIENT_FILE)
    }
}
