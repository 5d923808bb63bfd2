//! Placeholder generation for unscheduled workday time.
//!
//! For each working day the filler sweeps that day's events left to right
//! while holding a cursor, the high-water mark of workday time already
//! accounted for. Any stretch the cursor has to jump over becomes a
//! placeholder, as does whatever remains between the cursor and the end of
//! the workday.
//!
//! The cursor never retreats, so overlapping and nested source events are
//! absorbed without producing spurious placeholders.

use chrono::NaiveDate;
use tracing::trace;

use crate::calendar::WorkCalendar;
use crate::event::ScheduleEvent;
use crate::holidays::HolidaySet;
use crate::time::{DateRange, WorkWindow};

/// Computes placeholders for every working day in `range`.
///
/// `timeline` must already be sorted by start; events are taken in their
/// existing order and never re-sorted. Days off the work calendar and
/// holidays are skipped entirely.
pub fn fill_workday_gaps(
    timeline: &[ScheduleEvent],
    range: DateRange,
    holidays: &HolidaySet,
    calendar: &WorkCalendar,
) -> Vec<ScheduleEvent> {
    let mut placeholders = Vec::new();

    for date in range.days() {
        if !calendar.is_working_day(date, holidays) {
            continue;
        }

        let window = calendar.window(date);
        let day_events: Vec<_> = events_starting_on(timeline, date).collect();
        let before = placeholders.len();
        fill_day(day_events.iter().copied(), window, &mut placeholders);

        trace!(
            date = %date,
            events = day_events.len(),
            placeholders = placeholders.len() - before,
            "Filled workday gaps"
        );
    }

    placeholders
}

/// Runs the cursor sweep for one day, appending placeholders to `out`.
pub fn fill_day<'a>(
    events: impl IntoIterator<Item = &'a ScheduleEvent>,
    window: WorkWindow,
    out: &mut Vec<ScheduleEvent>,
) {
    let mut cursor = window.start;

    for event in events {
        let (effective_start, effective_end) = window.clip(event.start, event.end);

        if effective_end <= cursor || effective_start >= window.end {
            continue;
        }

        if effective_start > cursor {
            out.push(ScheduleEvent::placeholder(cursor, effective_start));
        }

        cursor = cursor.max(effective_end);
    }

    if cursor < window.end {
        out.push(ScheduleEvent::placeholder(cursor, window.end));
    }
}

fn events_starting_on(
    timeline: &[ScheduleEvent],
    date: NaiveDate,
) -> impl Iterator<Item = &ScheduleEvent> {
    timeline.iter().filter(move |e| e.start.date() == date)
}
