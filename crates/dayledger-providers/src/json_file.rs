//! Provider backed by a JSON export on disk.
//!
//! The file holds an array of [`RawAppointment`] objects. It is re-read on
//! every fetch, so edits show up without restarting the server.

use std::path::{Path, PathBuf};

use dayledger_core::DateRange;
use tracing::debug;

use crate::error::{ProviderError, ProviderResult};
use crate::normalize::in_range;
use crate::provider::{BoxFuture, CalendarProvider};
use crate::raw_event::RawAppointment;

/// Reads appointments from a JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileProvider {
    path: PathBuf,
}

impl JsonFileProvider {
    pub const NAME: &'static str = "json";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> ProviderResult<Vec<RawAppointment>> {
        let what = self.path.display().to_string();
        let data = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| ProviderError::from_io(e, &what).with_provider(Self::NAME))?;

        serde_json::from_str(&data).map_err(|e| {
            ProviderError::invalid_response(format!("malformed calendar file {}: {}", what, e))
                .with_provider(Self::NAME)
                .with_source(e)
        })
    }
}

impl CalendarProvider for JsonFileProvider {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn fetch_appointments(
        &self,
        range: DateRange,
    ) -> BoxFuture<'_, ProviderResult<Vec<RawAppointment>>> {
        Box::pin(async move {
            let all = self.load().await?;
            let total = all.len();
            let appts: Vec<_> = all.into_iter().filter(|a| in_range(a, range)).collect();

            debug!(
                path = %self.path.display(),
                range = %range,
                total,
                matched = appts.len(),
                "Loaded appointments from JSON file"
            );

            Ok(appts)
        })
    }
}
