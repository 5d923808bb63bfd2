//! Core of dayledger: the schedule model and the reconciliation pipeline.
//!
//! The pipeline turns provider appointments into a complete daily schedule:
//! recurring [`Rule`]s are expanded into events, merged with the provider's
//! events into a start-sorted timeline, and every uncovered minute of each
//! working day is filled with a placeholder. [`ScheduleAssembler`] runs the
//! whole thing for a [`DateRange`].

pub mod calendar;
pub mod error;
pub mod event;
pub mod format;
pub mod gaps;
pub mod holidays;
pub mod project;
pub mod rules;
pub mod schedule;
pub mod time;
pub mod timeline;
pub mod tracing;

pub use calendar::WorkCalendar;
pub use error::{ScheduleError, ScheduleResult};
pub use event::{EventOrigin, PLACEHOLDER_ORGANIZER, RULE_ORGANIZER, ScheduleEvent};
pub use format::{OutputFormat, TableOptions, render_json, render_table};
pub use gaps::fill_workday_gaps;
pub use holidays::HolidaySet;
pub use project::ProjectMapping;
pub use rules::{Rule, generate_rule_events};
pub use schedule::{ScheduleAssembler, ScheduleConfig};
pub use time::{DateRange, WeekdaySet, WorkWindow, parse_date};
pub use timeline::merge_timeline;
pub use self::tracing::{LogFormat, TracingConfig, TracingError, init_tracing};
