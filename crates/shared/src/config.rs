//! Configuration management for the AniList client.
//!
//! This module handles loading and parsing configuration from TOML files,
//! with sensible defaults for all settings.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Public AniList GraphQL endpoint
pub const DEFAULT_ENDPOINT: &str = "https://graphql.anilist.co";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,

    /// AniList client settings
    #[serde(default)]
    pub anilist: AnilistConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log directory path
    pub log_dir: String,

    /// Default log level (trace, debug, info, warn, error)
    pub default_level: String,

    /// Enable console output
    pub console: bool,

    /// Enable file output
    pub file: bool,

    /// Enable JSON formatting for file logs
    pub json_format: bool,
}

/// AniList client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnilistConfig {
    /// GraphQL endpoint URL
    pub endpoint: String,

    /// OAuth access token, sent as a bearer token when present
    pub token: Option<String>,

    /// In-memory cache size in megabytes (0 or less disables caching)
    pub memory_cache_size_mb: i64,

    /// Cache entry lifetime in milliseconds
    pub cache_expire_ms: u64,

    /// Request timeout in seconds
    pub timeout_seconds: u64,

    /// User agent sent with every request
    pub user_agent: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: "logs".to_string(),
            default_level: "info".to_string(),
            console: true,
            file: false,
            json_format: false,
        }
    }
}

impl Default for AnilistConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            token: None,
            memory_cache_size_mb: 10,
            cache_expire_ms: 30_000,
            timeout_seconds: 30,
            user_agent: None,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// If the file doesn't exist, returns the default configuration.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content = toml::to_string_pretty(self)
            .context("Failed to serialize configuration")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        tracing::info!(
            path = %path.display(),
            "Configuration saved successfully"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.anilist.endpoint, "https://graphql.anilist.co");
        assert_eq!(config.anilist.memory_cache_size_mb, 10);
        assert_eq!(config.anilist.cache_expire_ms, 30_000);
        assert!(config.anilist.token.is_none());
        assert!(config.logging.console);
    }

    #[test]
    fn test_save_and_load_config() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("config.toml");

        let mut original_config = Config::default();
        original_config.anilist.token = Some("secret".to_string());
        original_config.anilist.memory_cache_size_mb = 0;
        original_config.save(&config_path)?;

        assert!(config_path.exists());

        let loaded_config = Config::from_file(&config_path)?;
        assert_eq!(loaded_config.anilist.endpoint, original_config.anilist.endpoint);
        assert_eq!(loaded_config.anilist.token.as_deref(), Some("secret"));
        assert_eq!(loaded_config.anilist.memory_cache_size_mb, 0);

        Ok(())
    }

    #[test]
    fn test_partial_config_fills_defaults() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(&config_path, "[anilist]\ntoken = \"abc\"\n")?;

        let config = Config::from_file(&config_path)?;
        assert_eq!(config.anilist.token.as_deref(), Some("abc"));
        assert_eq!(config.anilist.memory_cache_size_mb, 10);
        assert_eq!(config.logging.default_level, "info");

        Ok(())
    }

    #[test]
    fn test_load_nonexistent_config() {
        let config = Config::from_file("nonexistent.toml").unwrap();
        assert_eq!(config.anilist.timeout_seconds, 30);
    }
}
