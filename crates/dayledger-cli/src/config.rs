//! Application configuration.
//!
//! All settings live in a single `config.toml` file at
//! `~/.config/dayledger/config.toml` by default:
//!
//! ```toml
//! [server]
//! bind = "127.0.0.1:8000"
//! timeout = 30
//! max_connections = 64
//!
//! [provider]
//! kind = "json"
//! path = "calendar.json"
//!
//! [work]
//! start_time = "09:00:00"
//! end_time = "18:00:00"
//! weekdays = [0, 1, 2, 3, 4]
//!
//! [[rules]]
//! title = "Break Time"
//! start_time = "12:00:00"
//! end_time = "13:00:00"
//! weekdays = [0, 1, 2, 3, 4]
//!
//! [projects]
//! "Design review" = "Atlas"
//! ```
//!
//! Any `[[rules]]` entry replaces the built-in rule list entirely.

use std::path::{Path, PathBuf};

use dayledger_core::{ProjectMapping, Rule, ScheduleConfig, WorkCalendar};
use dayledger_providers::ProviderSettings;
use dayledger_server::ServerConfig;
use serde::{Deserialize, Serialize};

use crate::error::{ClientError, ClientResult};

/// Configuration for every dayledger command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP server settings.
    pub server: ServerConfig,

    /// Calendar provider settings.
    pub provider: ProviderSettings,

    /// Workday window.
    pub work: WorkCalendar,

    /// Recurring blocks.
    pub rules: Vec<Rule>,

    /// Subject to project name.
    pub projects: ProjectMapping,
}

impl Default for AppConfig {
    fn default() -> Self {
        let schedule = ScheduleConfig::default();
        Self {
            server: ServerConfig::default(),
            provider: ProviderSettings::default(),
            work: schedule.work,
            rules: schedule.rules,
            projects: schedule.projects,
        }
    }
}

impl AppConfig {
    /// Loads configuration from the default path, falling back to defaults
    /// if the file does not exist.
    pub fn load() -> ClientResult<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Loads and validates configuration from a specific path.
    pub fn load_from(path: &Path) -> ClientResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ClientError::Config(format!("failed to read config {}: {}", path.display(), e))
        })?;
        let config = Self::parse(&content)?;
        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Parses and validates TOML text.
    pub fn parse(content: &str) -> ClientResult<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ClientError::Config(format!("failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the settings that would otherwise fail at startup.
    pub fn validate(&self) -> ClientResult<()> {
        if self.server.max_connections == 0 {
            return Err(ClientError::Config(
                "server.max_connections must be at least 1".into(),
            ));
        }
        if self.server.connection_timeout.is_zero() {
            return Err(ClientError::Config("server.timeout must be at least 1".into()));
        }
        self.schedule_config().validate()?;
        Ok(())
    }

    /// Returns the schedule part of the configuration.
    pub fn schedule_config(&self) -> ScheduleConfig {
        ScheduleConfig::empty()
            .with_work(self.work.clone())
            .with_rules(self.rules.clone())
            .with_projects(self.projects.clone())
    }

    /// Serializes the configuration as TOML.
    pub fn to_toml(&self) -> ClientResult<String> {
        toml::to_string_pretty(self)
            .map_err(|e| ClientError::Config(format!("failed to serialize config: {}", e)))
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    /// Returns the default configuration directory.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("dayledger")
    }
}
