//! Raw appointment type from calendar providers.
//!
//! [`RawAppointment`] mirrors what a groupware calendar exposes for one
//! occurrence: naive local start/end, an all-day flag, a busy status and
//! attendee lists as `;`-delimited text. Normalization turns it into a
//! [`ScheduleEvent`](dayledger_core::ScheduleEvent) or a holiday date.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// How an occurrence shows on the owner's free/busy view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BusyStatus {
    Free,
    Tentative,
    #[default]
    Busy,
    OutOfOffice,
    WorkingElsewhere,
}

/// One calendar occurrence as delivered by a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawAppointment {
    /// Provider identifier, if any.
    #[serde(default)]
    pub id: String,
    pub subject: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    #[serde(default)]
    pub all_day: bool,
    #[serde(default)]
    pub busy_status: BusyStatus,
    /// Provider status text such as `confirmed` or `cancelled`.
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub organizer: String,
    /// `;`-delimited display names.
    #[serde(default)]
    pub required_attendees: String,
    /// `;`-delimited display names.
    #[serde(default)]
    pub optional_attendees: String,
}

impl RawAppointment {
    /// Creates a busy, timed appointment with no attendees.
    pub fn new(subject: impl Into<String>, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            id: String::new(),
            subject: subject.into(),
            start,
            end,
            all_day: false,
            busy_status: BusyStatus::Busy,
            status: None,
            organizer: String::new(),
            required_attendees: String::new(),
            optional_attendees: String::new(),
        }
    }

    /// Creates an all-day appointment marked free, the shape of a holiday.
    pub fn all_day_free(subject: impl Into<String>, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self::new(subject, start, end)
            .with_all_day(true)
            .with_busy_status(BusyStatus::Free)
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_all_day(mut self, all_day: bool) -> Self {
        self.all_day = all_day;
        self
    }

    pub fn with_busy_status(mut self, status: BusyStatus) -> Self {
        self.busy_status = status;
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_organizer(mut self, organizer: impl Into<String>) -> Self {
        self.organizer = organizer.into();
        self
    }

    pub fn with_required_attendees(mut self, attendees: impl Into<String>) -> Self {
        self.required_attendees = attendees.into();
        self
    }

    pub fn with_optional_attendees(mut self, attendees: impl Into<String>) -> Self {
        self.optional_attendees = attendees.into();
        self
    }
}
