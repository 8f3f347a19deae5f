//! Configuration schema.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{ConfigError, ConfigResult};

/// Main configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Remote API configuration.
    #[serde(default)]
    pub github: GithubConfig,

    /// Timeouts and retries.
    #[serde(default)]
    pub network: NetworkConfig,

    /// Output files.
    #[serde(default)]
    pub output: OutputConfig,

    /// Export styling.
    #[serde(default)]
    pub export: ExportConfig,
}

impl Config {
    /// Checks values that deserialize fine but cannot be used.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first offending value.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.github.api_url.trim().is_empty() {
            return Err(ConfigError::Invalid("github.api_url must not be empty".into()));
        }
        if !(1..=100).contains(&self.github.per_page) {
            return Err(ConfigError::Invalid(format!(
                "github.per_page must be between 1 and 100, got {}",
                self.github.per_page
            )));
        }
        if self.network.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "network.request_timeout_secs must be at least 1".into(),
            ));
        }
        if self.network.initial_backoff_ms > self.network.max_backoff_ms {
            return Err(ConfigError::Invalid(
                "network.initial_backoff_ms must not exceed network.max_backoff_ms".into(),
            ));
        }
        if !self.output.csv && !self.output.graphml {
            return Err(ConfigError::Invalid(
                "at least one of output.csv and output.graphml must be enabled".into(),
            ));
        }
        Ok(())
    }
}

/// Remote API configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GithubConfig {
    /// API base URL.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Page size for fork and branch listings.
    #[serde(default = "default_per_page")]
    pub per_page: u32,

    /// User agent override.
    pub user_agent: Option<String>,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            per_page: default_per_page(),
            user_agent: None,
        }
    }
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_per_page() -> u32 {
    100
}

/// Timeouts and retries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Retries after the first attempt of a transient failure.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Delay before the first retry, in milliseconds.
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    /// Upper bound for a single retry delay, in milliseconds.
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,

    /// Overall deadline for one repository in seconds, `0` for none.
    #[serde(default)]
    pub run_deadline_secs: u64,
}

impl NetworkConfig {
    /// Per-request timeout.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Delay before the first retry.
    #[must_use]
    pub fn initial_backoff(&self) -> Duration {
        Duration::from_millis(self.initial_backoff_ms)
    }

    /// Upper bound for a single retry delay.
    #[must_use]
    pub fn max_backoff(&self) -> Duration {
        Duration::from_millis(self.max_backoff_ms)
    }

    /// Overall deadline, `None` when disabled.
    #[must_use]
    pub fn run_deadline(&self) -> Option<Duration> {
        (self.run_deadline_secs > 0).then(|| Duration::from_secs(self.run_deadline_secs))
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout_secs(),
            max_retries: default_max_retries(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
            run_deadline_secs: 0,
        }
    }
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

fn default_initial_backoff_ms() -> u64 {
    500
}

fn default_max_backoff_ms() -> u64 {
    8000
}

/// Output files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving exports and checkpoints.
    #[serde(default = "default_results_dir")]
    pub results_dir: PathBuf,

    /// Write the CSV table.
    #[serde(default = "default_true")]
    pub csv: bool,

    /// Write the GraphML document.
    #[serde(default = "default_true")]
    pub graphml: bool,

    /// Save a checkpoint after each seed.
    #[serde(default = "default_true")]
    pub checkpoint: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            results_dir: default_results_dir(),
            csv: true,
            graphml: true,
            checkpoint: true,
        }
    }
}

fn default_results_dir() -> PathBuf {
    PathBuf::from("Results")
}

fn default_true() -> bool {
    true
}

/// Export styling.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Seed for the color palettes; random colors when unset.
    pub palette_seed: Option<u64>,
}
