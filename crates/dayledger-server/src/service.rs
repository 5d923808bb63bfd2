//! Schedule building against a calendar provider.

use std::sync::Arc;

use chrono::NaiveDate;
use dayledger_core::{
    DateRange, ScheduleAssembler, ScheduleConfig, ScheduleError, ScheduleEvent, ScheduleResult,
};
use dayledger_providers::{CalendarProvider, normalize_appointments};
use tracing::{debug, error};

/// Builds schedules by combining provider data with the configured rules.
///
/// Holds only read-only state, so one instance serves every request.
pub struct ScheduleService {
    assembler: ScheduleAssembler,
    provider: Arc<dyn CalendarProvider>,
}

impl ScheduleService {
    /// Validates `config` and creates the service.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::InvalidConfig`] if the configuration is invalid.
    pub fn new(config: ScheduleConfig, provider: Arc<dyn CalendarProvider>) -> ScheduleResult<Self> {
        Ok(Self {
            assembler: ScheduleAssembler::new(config)?,
            provider,
        })
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn config(&self) -> &ScheduleConfig {
        self.assembler.config()
    }

    /// Builds the schedule for `[from, to]`.
    ///
    /// The range is checked before the provider is touched. A provider
    /// failure aborts the whole request.
    pub async fn build_schedule(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> ScheduleResult<Vec<ScheduleEvent>> {
        let range = DateRange::new(from, to)?;
        self.build_range(range).await
    }

    /// Builds the schedule for an already validated range.
    pub async fn build_range(&self, range: DateRange) -> ScheduleResult<Vec<ScheduleEvent>> {
        let snapshot = self.provider.fetch_snapshot(range).await.map_err(|e| {
            error!(provider = %self.provider.name(), range = %range, error = %e, "Provider fetch failed");
            ScheduleError::provider_unavailable(e)
        })?;

        debug!(
            provider = %self.provider.name(),
            range = %range,
            holidays = snapshot.holidays.len(),
            appointments = snapshot.appointments.len(),
            "Fetched provider snapshot"
        );

        let events = normalize_appointments(&snapshot.appointments, self.assembler.projects());
        Ok(self.assembler.assemble(range, &snapshot.holidays, events))
    }
}
