//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::api::ClientConfig;
use crate::diagnostics::DEFAULT_CONTEXT;
use crate::interview::FailedTurnPolicy;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub automation: AutomationConfig,

    #[serde(default)]
    pub interview: InterviewConfig,

    #[serde(default)]
    pub remote_log: RemoteLogConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,

    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    #[serde(default = "default_retry_base_delay")]
    pub retry_base_delay_ms: u64,

    /// Log in automatically when both are set
    pub username: Option<String>,
    pub password: Option<String>,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_request_timeout() -> u64 {
    30_000
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_base_delay() -> u64 {
    250
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_ms: default_request_timeout(),
            max_retries: default_max_retries(),
            retry_base_delay_ms: default_retry_base_delay(),
            username: None,
            password: None,
        }
    }
}

impl ApiConfig {
    pub fn to_client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.base_url.clone(),
            request_timeout_ms: self.request_timeout_ms,
            max_retries: self.max_retries,
            retry_base_delay_ms: self.retry_base_delay_ms,
        }
    }

    /// Username and password, if both are configured
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) if !user.is_empty() => Some((user.as_str(), pass.as_str())),
            _ => None,
        }
    }
}

/// Automation settings location and schedule check interval
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutomationConfig {
    #[serde(default = "default_settings_path")]
    pub settings_path: String,

    #[serde(default = "default_tick_interval")]
    pub tick_interval_secs: u64,
}

fn default_settings_path() -> String {
    dirs::data_local_dir()
        .map(|p| {
            p.join("jobbot")
                .join("automation_settings.json")
                .to_string_lossy()
                .to_string()
        })
        .unwrap_or_else(|| "./automation_settings.json".to_string())
}

fn default_tick_interval() -> u64 {
    30
}

impl Default for AutomationConfig {
    fn default() -> Self {
        Self {
            settings_path: default_settings_path(),
            tick_interval_secs: default_tick_interval(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InterviewConfig {
    #[serde(default)]
    pub failed_turn: FailedTurnPolicy,
}

/// Mirroring of diagnostic events to the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteLogConfig {
    #[serde(default = "default_remote_log_enabled")]
    pub enabled: bool,

    #[serde(default = "default_remote_log_context")]
    pub context: String,
}

fn default_remote_log_enabled() -> bool {
    true
}

fn default_remote_log_context() -> String {
    DEFAULT_CONTEXT.to_string()
}

impl Default for RemoteLogConfig {
    fn default() -> Self {
        Self {
            enabled: default_remote_log_enabled(),
            context: default_remote_log_context(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,

    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
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
        for path in Self::search_paths() {
            if path.exists() {
                match Self::load_with_env(&path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Explicit path if given (errors are fatal), else the default search
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::load_with_env(path),
            None => Ok(Self::load_default()),
        }
    }

    fn search_paths() -> Vec<PathBuf> {
        [
            dirs::config_dir().map(|p| p.join("jobbot").join("config.toml")),
            Some(PathBuf::from("/etc/jobbot/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("JOBBOT_API_URL") {
            self.api.base_url = url;
        }
        if let Some(username) = lookup("JOBBOT_USERNAME") {
            self.api.username = Some(username);
        }
        if let Some(password) = lookup("JOBBOT_PASSWORD") {
            self.api.password = Some(password);
        }
        if let Some(path) = lookup("JOBBOT_SETTINGS_PATH") {
            self.automation.settings_path = path;
        }
        if let Some(level) = lookup("JOBBOT_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("JOBBOT_LOG_FORMAT") {
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
    r#"# JobBot Configuration
#
# Environment variables override these settings:
# - JOBBOT_API_URL
# - JOBBOT_USERNAME
# - JOBBOT_PASSWORD
# - JOBBOT_SETTINGS_PATH
# - JOBBOT_LOG_LEVEL
# - JOBBOT_LOG_FORMAT

[api]
# Backend origin; every request goes to <base_url>/api/...
base_url = "http://localhost:8000"

# Per-request timeout (ms)
request_timeout_ms = 30000

# Attempts per request, including the first
max_retries = 3

# Backoff between attempts is attempt^2 * this (ms)
retry_base_delay_ms = 250

# Session login, used when both are set
# username = "me"
# password = "secret"

[automation]
# Where the automation panel's settings are saved
# (default: <data dir>/jobbot/automation_settings.json)
# settings_path = "/home/me/.local/share/jobbot/automation_settings.json"

# How often the daily schedule is checked (seconds)
tick_interval_secs = 30

[interview]
# What happens to your message when a chat turn fails: "keep" or "retract"
failed_turn = "keep"

[remote_log]
# Mirror diagnostic events to the backend's debug log
enabled = true
context = "FRONTEND"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty or json
format = "pretty"

# Optional log file path
# file = "/var/log/jobbot/jobbot.log"
"#
    .to_string()
}
