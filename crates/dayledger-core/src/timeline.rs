//! Timeline merging.

use crate::event::ScheduleEvent;

/// Concatenates provider and rule events and sorts them by start.
///
/// The sort is stable: events sharing a start keep their input order, with
/// provider events ahead of rule events.
pub fn merge_timeline(
    provider_events: Vec<ScheduleEvent>,
    rule_events: Vec<ScheduleEvent>,
) -> Vec<ScheduleEvent> {
    let mut merged = provider_events;
    merged.extend(rule_events);
    sort_by_start(&mut merged);
    merged
}

/// Stable sort by start timestamp.
pub fn sort_by_start(events: &mut [ScheduleEvent]) {
    events.sort_by_key(|e| e.start);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 3)
            .unwrap()
            .and_time(NaiveTime::from_hms_opt(h, m, 0).unwrap())
    }

    fn meeting(subject: &str, start: NaiveDateTime, end: NaiveDateTime) -> ScheduleEvent {
        ScheduleEvent::new(subject, start, end, "Ana Lopez")
    }

    #[test]
    fn sorts_by_start() {
        let provider = vec![
            meeting("Late", at(15, 0), at(16, 0)),
            meeting("Early", at(10, 0), at(11, 0)),
        ];
        let rules = vec![ScheduleEvent::from_rule("Break Time", "", at(12, 0), at(13, 0))];

        let merged = merge_timeline(provider, rules);
        let subjects: Vec<_> = merged.iter().map(|e| e.subject.as_str()).collect();
        assert_eq!(subjects, vec!["Early", "Break Time", "Late"]);
    }

    #[test]
    fn ties_keep_provider_before_rule() {
        let provider = vec![
            meeting("First", at(9, 0), at(9, 30)),
            meeting("Second", at(9, 0), at(10, 0)),
        ];
        let rules = vec![ScheduleEvent::from_rule(
            "Personal administrative work",
            "",
            at(9, 0),
            at(10, 0),
        )];

        let merged = merge_timeline(provider, rules);
        let subjects: Vec<_> = merged.iter().map(|e| e.subject.as_str()).collect();
        assert_eq!(
            subjects,
            vec!["First", "Second", "Personal administrative work"]
        );
    }

    #[test]
    fn zero_duration_events_survive() {
        let provider = vec![
            meeting("Marker", at(10, 0), at(10, 0)),
            meeting("Call", at(9, 0), at(10, 0)),
        ];
        let merged = merge_timeline(provider, Vec::new());
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[1].subject, "Marker");
    }

    #[test]
    fn empty_inputs() {
        assert!(merge_timeline(Vec::new(), Vec::new()).is_empty());
    }
}
