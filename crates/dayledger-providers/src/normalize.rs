//! RawAppointment classification and conversion.
//!
//! A provider's occurrences split three ways:
//! 1. All-day occurrences marked free are holidays and feed the [`HolidaySet`]
//! 2. Canceled occurrences are dropped
//! 3. Everything else becomes a [`ScheduleEvent`]

use chrono::NaiveTime;
use dayledger_core::{DateRange, HolidaySet, ProjectMapping, ScheduleEvent};

use crate::raw_event::{BusyStatus, RawAppointment};

/// Subject prefix the groupware server puts on canceled meetings.
pub const CANCELED_PREFIX: &str = "Canceled: ";

/// Separator between names in attendee text.
pub const ATTENDEE_SEPARATOR: char = ';';

/// Returns true for all-day occurrences shown as free.
pub fn is_holiday(appt: &RawAppointment) -> bool {
    appt.all_day && appt.busy_status == BusyStatus::Free
}

/// Returns true for canceled occurrences.
pub fn is_canceled(appt: &RawAppointment) -> bool {
    if appt.subject.starts_with(CANCELED_PREFIX) {
        return true;
    }
    appt.status.as_deref().is_some_and(|status| {
        status.eq_ignore_ascii_case("cancelled") || status.eq_ignore_ascii_case("canceled")
    })
}

/// Splits `;`-delimited attendee text into trimmed, non-empty names.
pub fn parse_attendees(text: &str) -> Vec<String> {
    text.split(ATTENDEE_SEPARATOR)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(String::from)
        .collect()
}

/// Returns true if the occurrence lies within `range`.
///
/// It must start no earlier than midnight of the first date and end no
/// later than midnight after the last date.
pub fn in_range(appt: &RawAppointment, range: DateRange) -> bool {
    appt.start >= range.start_datetime() && appt.end <= range.end_datetime_exclusive()
}

/// Converts an occurrence to a schedule event, resolving its project.
pub fn normalize_appointment(appt: &RawAppointment, projects: &ProjectMapping) -> ScheduleEvent {
    ScheduleEvent::new(&appt.subject, appt.start, appt.end, &appt.organizer)
        .with_project(projects.resolve(&appt.subject))
        .with_required_attendees(parse_attendees(&appt.required_attendees))
        .with_optional_attendees(parse_attendees(&appt.optional_attendees))
}

/// Normalizes every occurrence that is neither a holiday nor canceled.
///
/// Input order is preserved.
pub fn normalize_appointments(
    appts: &[RawAppointment],
    projects: &ProjectMapping,
) -> Vec<ScheduleEvent> {
    appts
        .iter()
        .filter(|a| !is_holiday(a) && !is_canceled(a))
        .map(|a| normalize_appointment(a, projects))
        .collect()
}

/// Collects the dates covered by holiday occurrences within `range`.
///
/// An all-day occurrence covers its start date and every following date
/// before its (exclusive) end.
pub fn collect_holidays(appts: &[RawAppointment], range: DateRange) -> HolidaySet {
    let mut holidays = HolidaySet::new();

    for appt in appts.iter().filter(|a| is_holiday(a)) {
        let first = appt.start.date();
        let last_exclusive = if appt.end.time() == NaiveTime::MIN {
            appt.end.date()
        } else {
            appt.end.date().succ_opt().unwrap_or(appt.end.date())
        };

        holidays.insert(first);
        holidays.extend(
            first
                .iter_days()
                .skip(1)
                .take_while(|d| *d < last_exclusive)
                .filter(|d| range.contains(*d)),
        );
    }

    holidays
}
