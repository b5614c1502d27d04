//! Configuration management for Artdesk
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{ArtdeskError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Backend used when none is configured.
pub const DEFAULT_API_URL: &str = "https://hopeful-desire-21262e95c7.strapiapp.com/api";

/// Main configuration structure for Artdesk
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Backend connection settings
    #[serde(default)]
    pub api: ApiConfig,
    /// Where the bearer token is persisted
    #[serde(default)]
    pub storage: StorageConfig,
    /// Notification settings
    #[serde(default)]
    pub notifications: NotificationConfig,
}

/// Backend connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the REST API, including any path prefix such as `/api`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout (seconds)
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_base_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Parsed base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ArtdeskError::Config`] if `base_url` is not a valid URL.
    pub fn url(&self) -> Result<url::Url> {
        url::Url::parse(&self.base_url).map_err(|e| {
            ArtdeskError::Config(format!("Invalid api.base_url '{}': {}", self.base_url, e)).into()
        })
    }
}

/// Token persistence backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TokenBackend {
    /// OS native credential store
    #[default]
    Keyring,
    /// JSON file in the data directory (or `storage.path`)
    File,
    /// Process memory only; nothing survives a restart
    Memory,
}

impl std::str::FromStr for TokenBackend {
    type Err = ArtdeskError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "keyring" => Ok(Self::Keyring),
            "file" => Ok(Self::File),
            "memory" => Ok(Self::Memory),
            other => Err(ArtdeskError::Config(format!(
                "Invalid token backend: {}. Must be one of: keyring, file, memory",
                other
            ))),
        }
    }
}

/// Token persistence configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: TokenBackend,

    /// Key the token is stored under
    #[serde(default = "default_token_key")]
    pub key: String,

    /// Session file for the `file` backend; defaults to the data directory
    #[serde(default)]
    pub path: Option<PathBuf>,
}

fn default_token_key() -> String {
    crate::storage::DEFAULT_TOKEN_KEY.to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: TokenBackend::default(),
            key: default_token_key(),
            path: None,
        }
    }
}

/// Notification configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Print notifications at all
    #[serde(default = "default_notifications_enabled")]
    pub enabled: bool,

    /// Display duration (milliseconds)
    #[serde(default = "default_duration_ms")]
    pub duration_ms: u64,
}

fn default_notifications_enabled() -> bool {
    true
}

fn default_duration_ms() -> u64 {
    3000
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enabled: default_notifications_enabled(),
            duration_ms: default_duration_ms(),
        }
    }
}

impl NotificationConfig {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
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
    /// # Returns
    ///
    /// Returns the loaded and merged configuration
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::debug!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ArtdeskError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| ArtdeskError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(api_url) = std::env::var("ARTDESK_API_URL") {
            self.api.base_url = api_url;
        }

        if let Ok(timeout) = std::env::var("ARTDESK_TIMEOUT_SECONDS") {
            if let Ok(value) = timeout.parse() {
                self.api.timeout_seconds = value;
            } else {
                tracing::warn!("Invalid ARTDESK_TIMEOUT_SECONDS: {}", timeout);
            }
        }

        if let Ok(backend) = std::env::var("ARTDESK_TOKEN_BACKEND") {
            match backend.parse() {
                Ok(value) => self.storage.backend = value,
                Err(e) => tracing::warn!("Ignoring ARTDESK_TOKEN_BACKEND: {}", e),
            }
        }

        if let Ok(token_file) = std::env::var("ARTDESK_TOKEN_FILE") {
            tracing::debug!(token_file = %token_file, "Env override: ARTDESK_TOKEN_FILE");
            self.storage.path = Some(PathBuf::from(token_file));
        }

        if let Ok(duration) = std::env::var("ARTDESK_NOTIFY_DURATION_MS") {
            if let Ok(value) = duration.parse() {
                self.notifications.duration_ms = value;
            } else {
                tracing::warn!("Invalid ARTDESK_NOTIFY_DURATION_MS: {}", duration);
            }
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(api_url) = &cli.api_url {
            self.api.base_url = api_url.clone();
        }
        if let Some(backend) = cli.token_backend {
            self.storage.backend = backend;
        }
        if cli.quiet {
            self.notifications.enabled = false;
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if any validation check fails
    pub fn validate(&self) -> Result<()> {
        let url = self.api.url()?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ArtdeskError::Config(format!(
                "api.base_url must use http or https, got: {}",
                url.scheme()
            ))
            .into());
        }

        if self.api.timeout_seconds == 0 {
            return Err(ArtdeskError::Config(
                "api.timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        if self.api.timeout_seconds > 600 {
            return Err(ArtdeskError::Config(
                "api.timeout_seconds must be less than or equal to 600".to_string(),
            )
            .into());
        }

        if self.storage.key.trim().is_empty() {
            return Err(
                ArtdeskError::Config("storage.key cannot be empty".to_string()).into(),
            );
        }

        if self.notifications.duration_ms == 0 {
            return Err(ArtdeskError::Config(
                "notifications.duration_ms must be greater than 0".to_string(),
            )
            .into());
        }

        Ok(())
    }
}
