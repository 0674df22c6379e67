//! Configuration management for chatterm
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{ChattermError, Result};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure for chatterm
///
/// Holds the backend connection settings, composer limits, local
/// storage locations, and the static profile data shown in the
/// profile panel.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Backend API configuration
    #[serde(default)]
    pub api: ApiConfig,

    /// Composer (message input) configuration
    #[serde(default)]
    pub composer: ComposerConfig,

    /// Client-local storage locations
    #[serde(default)]
    pub storage: StorageConfig,

    /// Profile and billing data for the profile panel
    #[serde(default)]
    pub profile: ProfileConfig,
}

/// Backend API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Backend origin; the client appends `/api` to it
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Fixed timeout applied to every request (seconds)
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_base_url() -> String {
    "http://localhost:8001".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

/// Composer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComposerConfig {
    /// Largest file that may be staged as an attachment (bytes)
    #[serde(default = "default_max_attachment_bytes")]
    pub max_attachment_bytes: u64,

    /// Maximum number of staged attachments
    #[serde(default = "default_max_attachments")]
    pub max_attachments: usize,
}

fn default_max_attachment_bytes() -> u64 {
    10 * 1024 * 1024 // 10 MB
}

fn default_max_attachments() -> usize {
    10
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            max_attachment_bytes: default_max_attachment_bytes(),
            max_attachments: default_max_attachments(),
        }
    }
}

/// Client-local storage configuration
///
/// Unset paths fall back to the platform config/data directories.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Preferences file (JSON)
    #[serde(default)]
    pub preferences_path: Option<PathBuf>,

    /// Composer line history file
    #[serde(default)]
    pub history_path: Option<PathBuf>,
}

/// Static profile and billing data
///
/// Authentication and billing are handled elsewhere; these values are
/// displayed as-is by the profile panel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileConfig {
    #[serde(default = "default_profile_name")]
    pub name: String,

    #[serde(default = "default_profile_email")]
    pub email: String,

    #[serde(default = "default_join_date")]
    pub join_date: String,

    #[serde(default = "default_plan")]
    pub plan: String,

    #[serde(default)]
    pub tokens_used: u64,

    #[serde(default = "default_tokens_limit")]
    pub tokens_limit: u64,

    #[serde(default)]
    pub requests_today: u64,

    #[serde(default = "default_requests_limit")]
    pub requests_limit: u64,

    #[serde(default = "default_amount")]
    pub billing_amount: String,

    #[serde(default = "default_not_applicable")]
    pub next_billing: String,

    #[serde(default = "default_payment_method")]
    pub payment_method: String,
}

fn default_profile_name() -> String {
    "User".to_string()
}

fn default_profile_email() -> String {
    "user@example.com".to_string()
}

fn default_join_date() -> String {
    "January 2025".to_string()
}

fn default_plan() -> String {
    "Free Plan".to_string()
}

fn default_tokens_limit() -> u64 {
    10_000
}

fn default_requests_limit() -> u64 {
    100
}

fn default_amount() -> String {
    "$0.00".to_string()
}

fn default_not_applicable() -> String {
    "N/A".to_string()
}

fn default_payment_method() -> String {
    "None".to_string()
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            name: default_profile_name(),
            email: default_profile_email(),
            join_date: default_join_date(),
            plan: default_plan(),
            tokens_used: 0,
            tokens_limit: default_tokens_limit(),
            requests_today: 0,
            requests_limit: default_requests_limit(),
            billing_amount: default_amount(),
            next_billing: default_not_applicable(),
            payment_method: default_payment_method(),
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(ChattermError::Io)
            .with_context(|| format!("Failed to read config file {}", path))?;
        let config = serde_yaml::from_str(&contents)
            .map_err(ChattermError::Yaml)
            .with_context(|| format!("Failed to parse config file {}", path))?;
        Ok(config)
    }

    fn apply_env_vars(&mut self) {
        if let Ok(base_url) = std::env::var("CHATTERM_API_URL") {
            tracing::debug!(base_url = %base_url, "Env override: CHATTERM_API_URL");
            self.api.base_url = base_url;
        }

        if let Ok(timeout) = std::env::var("CHATTERM_TIMEOUT_SECONDS") {
            if let Ok(value) = timeout.parse() {
                self.api.timeout_seconds = value;
            } else {
                tracing::warn!("Invalid CHATTERM_TIMEOUT_SECONDS: {}", timeout);
            }
        }

        if let Ok(path) = std::env::var("CHATTERM_PREFERENCES") {
            self.storage.preferences_path = Some(PathBuf::from(path));
        }

        if let Ok(path) = std::env::var("CHATTERM_HISTORY") {
            self.storage.history_path = Some(PathBuf::from(path));
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(api_url) = &cli.api_url {
            tracing::debug!("CLI override for API URL: {}", api_url);
            self.api.base_url = api_url.clone();
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if the base URL is empty or malformed, the timeout
    /// is zero, or an attachment limit is zero
    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(ChattermError::Config("api.base_url cannot be empty".to_string()).into());
        }

        if let Err(e) = url::Url::parse(&self.api.base_url) {
            return Err(ChattermError::Config(format!(
                "api.base_url is not a valid URL ({}): {}",
                self.api.base_url, e
            ))
            .into());
        }

        if self.api.timeout_seconds == 0 {
            return Err(ChattermError::Config(
                "api.timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        if self.composer.max_attachment_bytes == 0 {
            return Err(ChattermError::Config(
                "composer.max_attachment_bytes must be greater than 0".to_string(),
            )
            .into());
        }

        if self.composer.max_attachments == 0 {
            return Err(ChattermError::Config(
                "composer.max_attachments must be greater than 0".to_string(),
            )
            .into());
        }

        Ok(())
    }
}
