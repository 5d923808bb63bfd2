//! CalendarProvider trait and implementations.
//!
//! This crate is the boundary between dayledger and calendar data:
//!
//! - [`CalendarProvider`] - the trait every backend implements
//! - [`RawAppointment`] - one occurrence as the backend reports it
//! - [`normalize`] - holiday detection, cancellation filtering and
//!   conversion to [`ScheduleEvent`](dayledger_core::ScheduleEvent)
//! - [`ProviderError`] - failures while reading a calendar
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐   ┌──────────────────┐
//! │  calendar.json   │   │   calendar.ics   │
//! └────────┬─────────┘   └────────┬─────────┘
//!          ▼                      ▼
//! ┌──────────────────┐   ┌──────────────────┐
//! │ JsonFileProvider │   │ IcsFileProvider  │
//! └────────┬─────────┘   └────────┬─────────┘
//!          └──── CalendarProvider ┘
//!                     │ fetch_snapshot()
//!                     ▼
//!        ┌────────────────────────────┐
//!        │ HolidaySet + appointments  │
//!        └─────────────┬──────────────┘
//!                      ▼ normalize_appointments()
//!              ┌───────────────┐
//!              │ ScheduleEvent │
//!              └───────────────┘
//! ```

pub mod config;
pub mod error;
#[cfg(feature = "ics")]
pub mod ics;
pub mod json_file;
pub mod normalize;
pub mod provider;
pub mod raw_event;

pub use config::{ProviderKind, ProviderSettings};
pub use error::{ProviderError, ProviderErrorCode, ProviderResult};
#[cfg(feature = "ics")]
pub use ics::{IcsFileProvider, parse_ics_content};
pub use json_file::JsonFileProvider;
pub use normalize::{
    collect_holidays, in_range, is_canceled, is_holiday, normalize_appointment,
    normalize_appointments, parse_attendees,
};
pub use provider::{BoxFuture, CalendarProvider, ErrorProvider, ProviderSnapshot, StaticProvider};
pub use raw_event::{BusyStatus, RawAppointment};
