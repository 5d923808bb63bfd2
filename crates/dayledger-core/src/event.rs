//! Event types for the derived schedule.
//!
//! This module provides [`ScheduleEvent`], the unit flowing through the
//! whole pipeline, and [`EventOrigin`] which classifies an event by the
//! sentinel value in its organizer field.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Organizer sentinel for events generated from a rule.
pub const RULE_ORGANIZER: &str = "System Rule";

/// Organizer sentinel for gap-fill placeholder events.
pub const PLACEHOLDER_ORGANIZER: &str = "Placeholder";

/// Serde adapter writing naive timestamps as `YYYY-MM-DDTHH:MM:SS`.
///
/// Sub-second precision is dropped on output; input accepts any ISO-8601
/// naive timestamp chrono can parse.
mod naive_iso {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

    pub fn serialize<S>(dt: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&dt.format(FORMAT))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<NaiveDateTime>().map_err(serde::de::Error::custom)
    }
}

/// Where an event came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventOrigin {
    /// Fetched from the calendar provider.
    Provider,
    /// Generated from a recurring rule.
    Rule,
    /// Synthesized to cover unscheduled workday time.
    Placeholder,
}

/// A single entry of the derived schedule.
///
/// Provider appointments, rule-generated events and placeholders all share
/// this shape; the organizer field distinguishes synthetic events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEvent {
    /// The event title; empty for placeholders.
    pub subject: String,
    /// Project label resolved from the subject; empty if unmapped.
    pub project: String,
    /// When the event starts.
    #[serde(with = "naive_iso")]
    pub start: NaiveDateTime,
    /// When the event ends.
    #[serde(with = "naive_iso")]
    pub end: NaiveDateTime,
    /// The organizer, or a sentinel for synthetic events.
    pub organizer: String,
    /// Required attendees, in provider order.
    #[serde(default)]
    pub required_attendees: Vec<String>,
    /// Optional attendees, in provider order.
    #[serde(default)]
    pub optional_attendees: Vec<String>,
}

impl ScheduleEvent {
    /// Creates a new event with the required fields and no attendees.
    pub fn new(
        subject: impl Into<String>,
        start: NaiveDateTime,
        end: NaiveDateTime,
        organizer: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            project: String::new(),
            start,
            end,
            organizer: organizer.into(),
            required_attendees: Vec::new(),
            optional_attendees: Vec::new(),
        }
    }

    /// Creates a placeholder covering `[start, end)`.
    pub fn placeholder(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self::new("", start, end, PLACEHOLDER_ORGANIZER)
    }

    /// Creates a rule-generated event.
    pub fn from_rule(
        title: impl Into<String>,
        project: impl Into<String>,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Self {
        Self::new(title, start, end, RULE_ORGANIZER).with_project(project)
    }

    /// Classifies the event by its organizer sentinel.
    pub fn origin(&self) -> EventOrigin {
        match self.organizer.as_str() {
            RULE_ORGANIZER => EventOrigin::Rule,
            PLACEHOLDER_ORGANIZER if self.subject.is_empty() => EventOrigin::Placeholder,
            _ => EventOrigin::Provider,
        }
    }

    /// Returns true if this is a gap-fill placeholder.
    pub fn is_placeholder(&self) -> bool {
        self.origin() == EventOrigin::Placeholder
    }

    /// Returns the date the event starts on.
    pub fn start_date(&self) -> NaiveDate {
        self.start.date()
    }

    /// Returns the duration of the event in minutes.
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Builder method to set the project.
    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.project = project.into();
        self
    }

    /// Builder method to set required attendees.
    pub fn with_required_attendees(mut self, attendees: Vec<String>) -> Self {
        self.required_attendees = attendees;
        self
    }

    /// Builder method to set optional attendees.
    pub fn with_optional_attendees(mut self, attendees: Vec<String>) -> Self {
        self.optional_attendees = attendees;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 3)
            .unwrap()
            .and_time(NaiveTime::from_hms_opt(h, m, 0).unwrap())
    }

    #[test]
    fn placeholder_fields() {
        let event = ScheduleEvent::placeholder(at(11, 0), at(18, 0));
        assert_eq!(event.subject, "");
        assert_eq!(event.project, "");
        assert_eq!(event.organizer, "Placeholder");
        assert!(event.required_attendees.is_empty());
        assert!(event.optional_attendees.is_empty());
        assert_eq!(event.origin(), EventOrigin::Placeholder);
        assert_eq!(event.duration_minutes(), 420);
    }

    #[test]
    fn rule_event_fields() {
        let event = ScheduleEvent::from_rule("Break Time", "Internal", at(12, 0), at(13, 0));
        assert_eq!(event.subject, "Break Time");
        assert_eq!(event.project, "Internal");
        assert_eq!(event.organizer, "System Rule");
        assert_eq!(event.origin(), EventOrigin::Rule);
        assert!(!event.is_placeholder());
    }

    #[test]
    fn provider_event_named_placeholder_is_not_a_placeholder() {
        let event = ScheduleEvent::new("Sync", at(10, 0), at(11, 0), "Placeholder");
        assert_eq!(event.origin(), EventOrigin::Provider);
    }

    #[test]
    fn builder_pattern() {
        let event = ScheduleEvent::new("Design review", at(10, 0), at(11, 0), "Ana Lopez")
            .with_project("Atlas")
            .with_required_attendees(vec!["Ana Lopez".into(), "Sam Reed".into()])
            .with_optional_attendees(vec!["Kim Ng".into()]);

        assert_eq!(event.project, "Atlas");
        assert_eq!(event.required_attendees.len(), 2);
        assert_eq!(event.optional_attendees, vec!["Kim Ng".to_string()]);
        assert_eq!(event.start_date(), NaiveDate::from_ymd_opt(2024, 6, 3).unwrap());
    }

    #[test]
    fn serializes_naive_iso_timestamps() {
        let event = ScheduleEvent::placeholder(at(9, 0), at(18, 0));
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["start"], "2024-06-03T09:00:00");
        assert_eq!(json["end"], "2024-06-03T18:00:00");
        assert_eq!(json["required_attendees"], serde_json::json!([]));
    }

    #[test]
    fn serde_roundtrip() {
        let event = ScheduleEvent::new("Standup", at(9, 30), at(9, 45), "Sam Reed")
            .with_required_attendees(vec!["Sam Reed".into()]);
        let json = serde_json::to_string(&event).unwrap();
        let parsed: ScheduleEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, parsed);
    }

    #[test]
    fn deserialize_defaults_attendees() {
        let json = r#"{
            "subject": "Standup",
            "project": "",
            "start": "2024-06-03T09:30:00",
            "end": "2024-06-03T09:45:00",
            "organizer": "Sam Reed"
        }"#;
        let parsed: ScheduleEvent = serde_json::from_str(json).unwrap();
        assert!(parsed.required_attendees.is_empty());
        assert_eq!(parsed.start, at(9, 30));
    }
}
