//! CalendarProvider trait definition.
//!
//! A provider only has to list the occurrences in a date range; holiday
//! extraction and cancellation filtering are derived from that single fetch
//! so every backend classifies appointments the same way.

use std::future::Future;
use std::pin::Pin;

use dayledger_core::{DateRange, HolidaySet};

use crate::error::{ProviderError, ProviderResult};
use crate::normalize::{collect_holidays, in_range, is_canceled, is_holiday};
use crate::raw_event::RawAppointment;

/// A boxed future for async trait methods.
///
/// Keeps [`CalendarProvider`] object-safe so it can live behind
/// `Arc<dyn CalendarProvider>`.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Everything the schedule needs from one provider fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderSnapshot {
    /// Dates flagged as holidays.
    pub holidays: HolidaySet,
    /// Occurrences that are neither holidays nor canceled, in fetch order.
    pub appointments: Vec<RawAppointment>,
}

impl ProviderSnapshot {
    /// Splits raw occurrences into holidays and schedulable appointments.
    pub fn from_appointments(appointments: Vec<RawAppointment>, range: DateRange) -> Self {
        let holidays = collect_holidays(&appointments, range);
        let appointments = appointments
            .into_iter()
            .filter(|a| !is_holiday(a) && !is_canceled(a))
            .collect();
        Self {
            holidays,
            appointments,
        }
    }
}

/// A source of calendar occurrences.
///
/// # Example Implementation
///
/// ```ignore
/// struct FixedProvider(Vec<RawAppointment>);
///
/// impl CalendarProvider for FixedProvider {
///     fn name(&self) -> &str { "fixed" }
///
///     fn fetch_appointments(&self, range: DateRange) -> BoxFuture<'_, ProviderResult<Vec<RawAppointment>>> {
///         let appts = self.0.iter().filter(|a| in_range(a, range)).cloned().collect();
///         Box::pin(async move { Ok(appts) })
///     }
/// }
/// ```
pub trait CalendarProvider: Send + Sync {
    /// Short name used in logs and errors (e.g. "json", "ics").
    fn name(&self) -> &str;

    /// Lists every occurrence within `range`, holidays and canceled ones
    /// included.
    ///
    /// # Errors
    ///
    /// Must fail, rather than return an empty list, when the source cannot
    /// be read.
    fn fetch_appointments(
        &self,
        range: DateRange,
    ) -> BoxFuture<'_, ProviderResult<Vec<RawAppointment>>>;

    /// Returns the holiday dates within `range`.
    fn fetch_holidays(&self, range: DateRange) -> BoxFuture<'_, ProviderResult<HolidaySet>> {
        Box::pin(async move {
            let appts = self.fetch_appointments(range).await?;
            Ok(collect_holidays(&appts, range))
        })
    }

    /// Returns occurrences within `range` that are neither holidays nor
    /// canceled.
    fn fetch_events(
        &self,
        range: DateRange,
    ) -> BoxFuture<'_, ProviderResult<Vec<RawAppointment>>> {
        Box::pin(async move {
            let appts = self.fetch_appointments(range).await?;
            Ok(appts
                .into_iter()
                .filter(|a| !is_holiday(a) && !is_canceled(a))
                .collect())
        })
    }

    /// Fetches holidays and events with a single read of the source.
    fn fetch_snapshot(&self, range: DateRange) -> BoxFuture<'_, ProviderResult<ProviderSnapshot>> {
        Box::pin(async move {
            let appts = self.fetch_appointments(range).await?;
            Ok(ProviderSnapshot::from_appointments(appts, range))
        })
    }
}

/// A provider serving a fixed list of occurrences.
#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
    appointments: Vec<RawAppointment>,
}

impl StaticProvider {
    pub fn new(appointments: Vec<RawAppointment>) -> Self {
        Self { appointments }
    }
}

impl CalendarProvider for StaticProvider {
    fn name(&self) -> &str {
        "static"
    }

    fn fetch_appointments(
        &self,
        range: DateRange,
    ) -> BoxFuture<'_, ProviderResult<Vec<RawAppointment>>> {
        let appts = self
            .appointments
            .iter()
            .filter(|a| in_range(a, range))
            .cloned()
            .collect();
        Box::pin(async move { Ok(appts) })
    }
}

/// A provider that always fails.
///
/// Stands in for a provider that could not be built, and for tests.
#[derive(Debug)]
pub struct ErrorProvider {
    name: String,
    error: ProviderError,
}

impl ErrorProvider {
    pub fn new(name: impl Into<String>, error: ProviderError) -> Self {
        Self {
            name: name.into(),
            error,
        }
    }
}

impl CalendarProvider for ErrorProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch_appointments(
        &self,
        _range: DateRange,
    ) -> BoxFuture<'_, ProviderResult<Vec<RawAppointment>>> {
        let error = self.error.duplicate().with_provider(&self.name);
        Box::pin(async move { Err(error) })
    }
}
