//! Recurring rule-based pseudo-events.
//!
//! A [`Rule`] is a title plus a time-of-day span that recurs on a set of
//! weekdays. [`generate_rule_events`] expands a rule list into concrete
//! dated events over a request range, skipping holidays.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ScheduleError, ScheduleResult};
use crate::event::ScheduleEvent;
use crate::holidays::HolidaySet;
use crate::project::ProjectMapping;
use crate::time::{DateRange, WeekdaySet, combine};

/// A recurring title/time/weekday template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// Title given to every generated event.
    pub title: String,
    /// Time of day the event starts.
    pub start_time: NaiveTime,
    /// Time of day the event ends.
    pub end_time: NaiveTime,
    /// Weekdays the rule applies to (Monday = 0).
    pub weekdays: WeekdaySet,
}

impl Rule {
    /// Creates a new rule.
    pub fn new(
        title: impl Into<String>,
        start_time: NaiveTime,
        end_time: NaiveTime,
        weekdays: WeekdaySet,
    ) -> Self {
        Self {
            title: title.into(),
            start_time,
            end_time,
            weekdays,
        }
    }

    /// Checks that the rule starts before it ends.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::InvalidConfig`] otherwise.
    pub fn validate(&self) -> ScheduleResult<()> {
        if self.start_time >= self.end_time {
            return Err(ScheduleError::invalid_config(format!(
                "rule '{}' must start before it ends ({} >= {})",
                self.title, self.start_time, self.end_time
            )));
        }
        Ok(())
    }
}

/// Expands rules into dated events for every non-holiday date in `range`.
///
/// Dates are visited once in ascending order; all rules are evaluated per
/// date in list order. Overlapping rules are emitted as-is.
pub fn generate_rule_events(
    rules: &[Rule],
    range: DateRange,
    holidays: &HolidaySet,
    projects: &ProjectMapping,
) -> Vec<ScheduleEvent> {
    let mut events = Vec::new();

    for date in range.days() {
        if holidays.contains(date) {
            continue;
        }

        for rule in rules {
            if !rule.weekdays.contains_date(date) {
                continue;
            }

            events.push(ScheduleEvent::from_rule(
                &rule.title,
                projects.resolve(&rule.title),
                combine(date, rule.start_time),
                combine(date, rule.end_time),
            ));
        }
    }

    debug!(
        range = %range,
        rule_count = rules.len(),
        event_count = events.len(),
        "Generated rule events"
    );

    events
}
