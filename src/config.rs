//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::backend::BackendConfig;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendSection,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend connection configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BackendSection {
    #[serde(default = "default_backend_url")]
    pub url: String,

    /// Unset keeps the HTTP client's default
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_backend_url() -> String {
    "http://localhost:8000".to_string()
}

impl Default for BackendSection {
    fn default() -> Self {
        Self {
            url: default_backend_url(),
            request_timeout_secs: None,
        }
    }
}

impl BackendSection {
    pub fn client_config(&self) -> BackendConfig {
        BackendConfig {
            base_url: self.url.clone(),
            request_timeout_secs: self.request_timeout_secs,
        }
    }
}

/// Session file configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionConfig {
    /// Session file; defaults to the local data directory
    pub path: Option<String>,
}

impl SessionConfig {
    pub fn resolved_path(&self) -> PathBuf {
        self.path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(default_session_path)
    }
}

fn default_session_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|p| p.join("credalysis").join("session.toml"))
        .unwrap_or_else(|| PathBuf::from("./credalysis_session.toml"))
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("credalysis").join("config.toml")),
            Some(PathBuf::from("/etc/credalysis/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply `CREDALYSIS_*` overrides looked up through `var`
    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        // Backend overrides
        if let Some(url) = var("CREDALYSIS_BACKEND_URL") {
            self.backend.url = url;
        }
        if let Some(timeout) = var("CREDALYSIS_REQUEST_TIMEOUT_SECS") {
            match timeout.parse() {
                Ok(secs) => self.backend.request_timeout_secs = Some(secs),
                Err(_) => tracing::warn!(%timeout, "Ignoring invalid request timeout"),
            }
        }

        // Session overrides
        if let Some(path) = var("CREDALYSIS_SESSION_FILE") {
            self.session.path = Some(path);
        }

        // Logging overrides
        if let Some(level) = var("CREDALYSIS_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("CREDALYSIS_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Credalysis Configuration
#
# Environment variables override these settings:
# - CREDALYSIS_BACKEND_URL
# - CREDALYSIS_REQUEST_TIMEOUT_SECS
# - CREDALYSIS_SESSION_FILE
# - CREDALYSIS_LOG_LEVEL
# - CREDALYSIS_LOG_FORMAT

[backend]
# Base URL of the Credalysis backend
url = "http://localhost:8000"

# Request timeout in seconds (unset: no client-side timeout)
# request_timeout_secs = 30

[session]
# Where `credalysis login` stores the signed-in identity
# path = "~/.local/share/credalysis/session.toml"

[logging]
# Log level: trace, debug, info, warn, error
level = "warn"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
