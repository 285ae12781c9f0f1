//! Automation Settings
//!
//! The only client-local persisted state: one JSON object with camelCase
//! keys and no version field.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::api::ApplyAllRequest;

const TIME_FORMAT: &str = "%H:%M";

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid settings file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid daily time '{0}', expected HH:MM")]
    InvalidTime(String),

    #[error("maxApps must be at least 1")]
    InvalidLimit,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct AutomationSettings {
    pub is_active: bool,
    /// Local time of the daily run, "HH:MM"
    pub daily_time: String,
    pub max_apps: u32,
    pub auto_approve: bool,
}

impl Default for AutomationSettings {
    fn default() -> Self {
        Self {
            is_active: false,
            daily_time: "09:00".to_string(),
            max_apps: 10,
            auto_approve: false,
        }
    }
}

impl AutomationSettings {
    /// Parsed daily run time
    pub fn run_time(&self) -> Result<NaiveTime, SettingsError> {
        NaiveTime::parse_from_str(self.daily_time.trim(), TIME_FORMAT)
            .map_err(|_| SettingsError::InvalidTime(self.daily_time.clone()))
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        self.run_time()?;
        if self.max_apps == 0 {
            return Err(SettingsError::InvalidLimit);
        }
        Ok(())
    }

    /// Bulk-apply body for a run with these settings
    pub fn to_request(&self) -> ApplyAllRequest {
        ApplyAllRequest {
            limit: Some(self.max_apps),
            auto_approve: Some(self.auto_approve),
            resume_id: None,
        }
    }
}

/// File-backed settings location
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read saved settings
    ///
    /// A missing file yields defaults. So does an unreadable or corrupt
    /// one, with a warning.
    pub fn load(&self) -> AutomationSettings {
        match self.try_load() {
            Ok(Some(settings)) => settings,
            Ok(None) => AutomationSettings::default(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Ignoring unreadable automation settings");
                AutomationSettings::default()
            }
        }
    }

    /// Read saved settings, surfacing errors
    pub fn try_load(&self) -> Result<Option<AutomationSettings>, SettingsError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    /// Validate and write the settings
    pub fn save(&self, settings: &AutomationSettings) -> Result<(), SettingsError> {
        settings.validate()?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(settings)?;
        std::fs::write(&self.path, content)?;
        tracing::info!(path = %self.path.display(), "Automation settings saved");
        Ok(())
    }
}
