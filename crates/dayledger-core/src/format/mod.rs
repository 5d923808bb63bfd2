//! Output formatting for assembled schedules.
//!
//! Two renderings are provided:
//! - **JSON**: the wire shape served by `GET /calendar`, an array of events
//!   indented by four spaces.
//! - **Table**: a per-day terminal listing used by `dayledger schedule`.

use std::borrow::Cow;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::event::{EventOrigin, ScheduleEvent};

/// Indentation used for the JSON wire output.
const JSON_INDENT: &[u8] = b"    ";

/// Label printed in place of a placeholder's empty subject.
const PLACEHOLDER_LABEL: &str = "(unscheduled)";

/// How a schedule is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Human-readable per-day listing.
    #[default]
    Table,
    /// The JSON event array.
    Json,
}

/// Options for the table rendering.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableOptions {
    /// Truncate subjects longer than this many characters.
    pub max_subject_length: Option<usize>,
    /// List required attendees under each provider event.
    pub show_attendees: bool,
}

/// Per-day totals shown under each day of the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DaySummary {
    pub date: NaiveDate,
    /// Provider and rule events starting that day.
    pub events: usize,
    /// Placeholders starting that day.
    pub placeholders: usize,
    /// Total placeholder time in minutes.
    pub free_minutes: i64,
}

/// Serializes events as the JSON wire array.
///
/// # Errors
///
/// Only fails if serialization itself fails, which the event shape does
/// not allow in practice.
pub fn render_json(events: &[ScheduleEvent]) -> serde_json::Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(JSON_INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    events.serialize(&mut serializer)?;
    // serde_json only ever writes valid UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Groups a start-sorted schedule into per-day totals.
pub fn summarize_days(events: &[ScheduleEvent]) -> Vec<DaySummary> {
    let mut summaries: Vec<DaySummary> = Vec::new();

    for event in events {
        let date = event.start_date();
        if summaries.last().map(|s| s.date) != Some(date) {
            summaries.push(DaySummary {
                date,
                events: 0,
                placeholders: 0,
                free_minutes: 0,
            });
        }
        let Some(summary) = summaries.last_mut() else {
            continue;
        };

        if event.is_placeholder() {
            summary.placeholders += 1;
            summary.free_minutes += event.duration_minutes();
        } else {
            summary.events += 1;
        }
    }

    summaries
}

/// Renders a start-sorted schedule as a per-day table.
pub fn render_table(events: &[ScheduleEvent], options: &TableOptions) -> String {
    if events.is_empty() {
        return "No events in range\n".to_string();
    }

    let summaries = summarize_days(events);
    let mut out = String::new();
    let mut rest = events;

    for (i, summary) in summaries.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&format!("{} {}\n", summary.date.format("%a"), summary.date));

        let count = summary.events + summary.placeholders;
        let (day, tail) = rest.split_at(count.min(rest.len()));
        rest = tail;

        for event in day {
            out.push_str(&format!(
                "  {}-{}  {}\n",
                event.start.format("%H:%M"),
                format_end(event.start, event.end),
                event_label(event, options)
            ));
            if options.show_attendees && !event.required_attendees.is_empty() {
                out.push_str(&format!(
                    "               with {}\n",
                    event.required_attendees.join(", ")
                ));
            }
        }

        out.push_str(&format!("  free: {}\n", format_minutes(summary.free_minutes)));
    }

    out
}

fn format_end(start: NaiveDateTime, end: NaiveDateTime) -> String {
    if end.date() == start.date() {
        end.format("%H:%M").to_string()
    } else {
        end.format("%Y-%m-%d %H:%M").to_string()
    }
}

fn event_label(event: &ScheduleEvent, options: &TableOptions) -> String {
    let mut label = match event.origin() {
        EventOrigin::Placeholder => return PLACEHOLDER_LABEL.to_string(),
        _ => match options.max_subject_length {
            Some(max) => ellipsis(&event.subject, max).into_owned(),
            None => event.subject.clone(),
        },
    };

    if !event.project.is_empty() {
        label.push_str(&format!(" [{}]", event.project));
    }

    match event.origin() {
        EventOrigin::Rule => label.push_str(" (rule)"),
        EventOrigin::Provider if !event.organizer.is_empty() => {
            label.push_str(&format!(" ({})", event.organizer));
        }
        _ => {}
    }

    label
}

/// Formats a minute count as `XhYY`.
pub fn format_minutes(minutes: i64) -> String {
    format!("{}h{:02}", minutes / 60, minutes % 60)
}

/// Truncates a string with an ellipsis if it exceeds `max_len` characters.
pub fn ellipsis(s: &str, max_len: usize) -> Cow<'_, str> {
    if max_len == 0 {
        return Cow::Borrowed("");
    }
    if s.chars().count() <= max_len {
        return Cow::Borrowed(s);
    }

    let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
    Cow::Owned(format!("{}...", truncated))
}
