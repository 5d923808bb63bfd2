//! Provider selection from configuration.

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::json_file::JsonFileProvider;
use crate::provider::CalendarProvider;
#[cfg(not(feature = "ics"))]
use crate::{error::ProviderError, provider::ErrorProvider};

/// Which backend reads the calendar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// JSON array of appointments.
    #[default]
    Json,
    /// iCalendar file (requires the `ics` feature).
    Ics,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Ics => "ics",
        }
    }
}

/// The `[provider]` section of the configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    pub kind: ProviderKind,
    /// Calendar file; relative paths resolve against the working directory.
    pub path: PathBuf,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            kind: ProviderKind::Json,
            path: PathBuf::from("calendar.json"),
        }
    }
}

impl ProviderSettings {
    pub fn new(kind: ProviderKind, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            path: path.into(),
        }
    }

    /// Builds the configured provider.
    ///
    /// A kind compiled out of this build yields an [`ErrorProvider`], so the
    /// failure surfaces on the first request rather than at startup.
    pub fn build(&self) -> Arc<dyn CalendarProvider> {
        match self.kind {
            ProviderKind::Json => Arc::new(JsonFileProvider::new(&self.path)),
            #[cfg(feature = "ics")]
            ProviderKind::Ics => Arc::new(crate::ics::IcsFileProvider::new(&self.path)),
            #[cfg(not(feature = "ics"))]
            ProviderKind::Ics => {
                tracing::warn!("ICS provider requested but the `ics` feature is disabled");
                Arc::new(ErrorProvider::new(
                    self.kind.as_str(),
                    ProviderError::configuration("this build does not include ICS support"),
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_json_file() {
        let settings = ProviderSettings::default();
        assert_eq!(settings.kind, ProviderKind::Json);
        assert_eq!(settings.path, PathBuf::from("calendar.json"));
        assert_eq!(settings.build().name(), "json");
    }

    #[test]
    fn deserialize_kind() {
        let settings: ProviderSettings =
            serde_json::from_str(r#"{"kind": "ics", "path": "/tmp/work.ics"}"#).unwrap();
        assert_eq!(settings.kind, ProviderKind::Ics);
        assert_eq!(settings.path, PathBuf::from("/tmp/work.ics"));
    }

    #[cfg(feature = "ics")]
    #[test]
    fn builds_ics_provider() {
        let settings = ProviderSettings::new(ProviderKind::Ics, "work.ics");
        assert_eq!(settings.build().name(), "ics");
    }
}
