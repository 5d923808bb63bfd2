//! Provider backed by an iCalendar (`.ics`) file.
//!
//! Each `VEVENT` becomes one [`RawAppointment`]. Recurring masters are taken
//! as a single occurrence; exports that should show every instance must
//! already be expanded.

use std::path::{Path, PathBuf};

use chrono::{Duration, Local, NaiveDateTime, NaiveTime};
use dayledger_core::DateRange;
use icalendar::{
    Calendar, CalendarComponent, CalendarDateTime, Component, DatePerhapsTime, Event, EventLike,
    Property,
};
use tracing::{debug, warn};

use crate::error::{ProviderError, ProviderResult};
use crate::normalize::{ATTENDEE_SEPARATOR, in_range};
use crate::provider::{BoxFuture, CalendarProvider};
use crate::raw_event::{BusyStatus, RawAppointment};

/// Parses ICS text into appointments, in file order.
///
/// # Errors
///
/// Returns [`ProviderError::invalid_response`] if the text is not iCalendar.
pub fn parse_ics_content(ics: &str) -> ProviderResult<Vec<RawAppointment>> {
    if !has_calendar_component(ics) {
        return Err(ProviderError::invalid_response(
            "failed to parse ICS: no BEGIN:VCALENDAR component",
        ));
    }

    let calendar = ics
        .parse::<Calendar>()
        .map_err(|e| ProviderError::invalid_response(format!("failed to parse ICS: {}", e)))?;

    Ok(calendar
        .iter()
        .filter_map(|component| match component {
            CalendarComponent::Event(event) => parse_event(event),
            _ => None,
        })
        .collect())
}

// The parser accepts arbitrary text as an empty calendar.
fn has_calendar_component(ics: &str) -> bool {
    ics.lines()
        .any(|line| line.trim().eq_ignore_ascii_case("BEGIN:VCALENDAR"))
}

fn parse_event(event: &Event) -> Option<RawAppointment> {
    let Some(start) = event.get_start() else {
        warn!(uid = ?event.get_uid(), "Skipping VEVENT without DTSTART");
        return None;
    };
    let all_day = matches!(start, DatePerhapsTime::Date(_));
    let start = to_naive(start);
    let end = match event.get_end() {
        Some(end) => to_naive(end),
        None if all_day => start + Duration::days(1),
        None => start,
    };

    let mut appt = RawAppointment::new(event.get_summary().unwrap_or_default(), start, end)
        .with_all_day(all_day)
        .with_busy_status(busy_status(event))
        .with_required_attendees(attendee_names(event, false))
        .with_optional_attendees(attendee_names(event, true));

    if let Some(uid) = event.get_uid() {
        appt = appt.with_id(uid);
    }
    if let Some(status) = event.get_status() {
        appt = appt.with_status(format!("{:?}", status));
    }
    if let Some(organizer) = event.properties().get("ORGANIZER") {
        appt = appt.with_organizer(display_name(organizer));
    }

    debug!(
        uid = %appt.id,
        subject = %appt.subject,
        start = %appt.start,
        all_day,
        "Parsed appointment from ICS"
    );

    Some(appt)
}

/// Converts an ICS date or date-time to naive local time.
///
/// Named time zones are not resolved; their wall-clock time is kept.
fn to_naive(dt: DatePerhapsTime) -> NaiveDateTime {
    match dt {
        DatePerhapsTime::Date(date) => date.and_time(NaiveTime::MIN),
        DatePerhapsTime::DateTime(CalendarDateTime::Utc(utc)) => {
            utc.with_timezone(&Local).naive_local()
        }
        DatePerhapsTime::DateTime(CalendarDateTime::Floating(naive)) => naive,
        DatePerhapsTime::DateTime(CalendarDateTime::WithTimezone { date_time, .. }) => date_time,
    }
}

fn busy_status(event: &Event) -> BusyStatus {
    if let Some(status) = event.property_value("X-MICROSOFT-CDO-BUSYSTATUS") {
        match status.trim().to_ascii_uppercase().as_str() {
            "FREE" => return BusyStatus::Free,
            "TENTATIVE" => return BusyStatus::Tentative,
            "OOF" => return BusyStatus::OutOfOffice,
            "WORKINGELSEWHERE" => return BusyStatus::WorkingElsewhere,
            "BUSY" => return BusyStatus::Busy,
            _ => {}
        }
    }

    match event.property_value("TRANSP") {
        Some(transp) if transp.trim().eq_ignore_ascii_case("TRANSPARENT") => BusyStatus::Free,
        _ => BusyStatus::Busy,
    }
}

/// Returns the CN parameter, or the address without its `mailto:` scheme.
fn display_name(property: &Property) -> String {
    if let Some(cn) = property.params().get("CN") {
        let cn = cn.value().trim_matches('"').trim();
        if !cn.is_empty() {
            return cn.to_string();
        }
    }
    let value = property.value().trim();
    match value.get(..7) {
        Some(scheme) if scheme.eq_ignore_ascii_case("mailto:") => value[7..].to_string(),
        _ => value.to_string(),
    }
}

fn is_optional(property: &Property) -> bool {
    property
        .params()
        .get("ROLE")
        .is_some_and(|role| role.value().eq_ignore_ascii_case("OPT-PARTICIPANT"))
}

/// Joins the names of required or optional attendees as delimited text.
fn attendee_names(event: &Event, optional: bool) -> String {
    let multi = event.multi_properties().get("ATTENDEE").into_iter().flatten();
    let single = event.properties().get("ATTENDEE").into_iter();

    multi
        .chain(single)
        .filter(|p| is_optional(p) == optional)
        .map(display_name)
        .collect::<Vec<_>>()
        .join(&format!("{} ", ATTENDEE_SEPARATOR))
}

/// Reads appointments from an `.ics` file.
#[derive(Debug, Clone)]
pub struct IcsFileProvider {
    path: PathBuf,
}

impl IcsFileProvider {
    pub const NAME: &'static str = "ics";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CalendarProvider for IcsFileProvider {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn fetch_appointments(
        &self,
        range: DateRange,
    ) -> BoxFuture<'_, ProviderResult<Vec<RawAppointment>>> {
        Box::pin(async move {
            let what = self.path.display().to_string();
            let data = tokio::fs::read_to_string(&self.path)
                .await
                .map_err(|e| ProviderError::from_io(e, &what).with_provider(Self::NAME))?;

            let all = parse_ics_content(&data).map_err(|e| e.with_provider(Self::NAME))?;
            let total = all.len();
            let appts: Vec<_> = all.into_iter().filter(|a| in_range(a, range)).collect();

            debug!(
                path = %what,
                range = %range,
                total,
                matched = appts.len(),
                "Loaded appointments from ICS file"
            );

            Ok(appts)
        })
    }
}
