//! Time types for schedule computation.
//!
//! All timestamps handled here are zone-naive local times. This module
//! provides [`DateRange`] for inclusive request ranges, [`WeekdaySet`] for
//! rule and work-calendar weekday membership, and [`WorkWindow`] for the
//! half-open workday interval of a single date.

use std::fmt;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{ScheduleError, ScheduleResult};

/// Date format accepted at the request boundary.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Returns the weekday index of a date, Monday = 0 through Sunday = 6.
pub fn weekday_index(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_monday() as u8
}

/// Combines a date and a time-of-day into a naive timestamp.
pub fn combine(date: NaiveDate, time: NaiveTime) -> NaiveDateTime {
    date.and_time(time)
}

/// An inclusive range of calendar dates `[from, to]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    /// First date of the range (inclusive).
    pub from: NaiveDate,
    /// Last date of the range (inclusive).
    pub to: NaiveDate,
}

impl DateRange {
    /// Creates a new date range.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::InvalidDateRange`] if `from` is after `to`.
    pub fn new(from: NaiveDate, to: NaiveDate) -> ScheduleResult<Self> {
        if from > to {
            return Err(ScheduleError::invalid_date_range(format!(
                "from date {} is after to date {}",
                from, to
            )));
        }
        Ok(Self { from, to })
    }

    /// Creates a range covering a single date.
    pub fn single(date: NaiveDate) -> Self {
        Self {
            from: date,
            to: date,
        }
    }

    /// Parses a range from two `YYYY-MM-DD` strings.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::InvalidDateRange`] if either date is malformed
    /// or the dates are out of order.
    pub fn parse(from: &str, to: &str) -> ScheduleResult<Self> {
        let from = parse_date(from)?;
        let to = parse_date(to)?;
        Self::new(from, to)
    }

    /// Iterates every date in the range once, in ascending order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        let to = self.to;
        self.from.iter_days().take_while(move |d| *d <= to)
    }

    /// Returns the number of dates in the range.
    pub fn num_days(&self) -> i64 {
        (self.to - self.from).num_days() + 1
    }

    /// Checks if a date falls within the range.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }

    /// Midnight at the start of the first date.
    pub fn start_datetime(&self) -> NaiveDateTime {
        self.from.and_time(NaiveTime::MIN)
    }

    /// Midnight following the last date (exclusive bound).
    pub fn end_datetime_exclusive(&self) -> NaiveDateTime {
        self.to
            .succ_opt()
            .map(|d| d.and_time(NaiveTime::MIN))
            .unwrap_or(NaiveDateTime::MAX)
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.from, self.to)
    }
}

/// Parses a `YYYY-MM-DD` date.
///
/// # Errors
///
/// Returns [`ScheduleError::InvalidDateRange`] if the input is malformed.
pub fn parse_date(s: &str) -> ScheduleResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|e| ScheduleError::invalid_date_range(format!("invalid date '{}': {}", s, e)))
}

/// A set of weekday indices (Monday = 0 through Sunday = 6).
///
/// Serialized as a sorted array of indices.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct WeekdaySet(u8);

impl WeekdaySet {
    /// The empty set.
    pub const EMPTY: Self = Self(0);

    /// Monday through Friday.
    pub const WORKWEEK: Self = Self(0b0001_1111);

    /// Every day of the week.
    pub const ALL: Self = Self(0b0111_1111);

    /// Builds a set from weekday indices.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::InvalidConfig`] for an index outside 0–6.
    pub fn from_indices(indices: impl IntoIterator<Item = u8>) -> ScheduleResult<Self> {
        let mut bits = 0u8;
        for index in indices {
            if index > 6 {
                return Err(ScheduleError::invalid_config(format!(
                    "weekday index {} is outside 0-6",
                    index
                )));
            }
            bits |= 1 << index;
        }
        Ok(Self(bits))
    }

    /// Builds a set from a single weekday.
    pub fn single(weekday: Weekday) -> Self {
        Self(1 << weekday.num_days_from_monday())
    }

    /// Returns true if the weekday is a member.
    pub fn contains(&self, weekday: Weekday) -> bool {
        self.contains_index(weekday.num_days_from_monday() as u8)
    }

    /// Returns true if the weekday index is a member.
    pub fn contains_index(&self, index: u8) -> bool {
        index < 7 && self.0 & (1 << index) != 0
    }

    /// Returns true if the weekday of `date` is a member.
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.contains_index(weekday_index(date))
    }

    /// Returns true if no weekday is a member.
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Iterates member indices in ascending order.
    pub fn indices(&self) -> impl Iterator<Item = u8> + use<> {
        let bits = self.0;
        (0..7u8).filter(move |i| bits & (1 << i) != 0)
    }
}

impl fmt::Debug for WeekdaySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.indices()).finish()
    }
}

impl TryFrom<Vec<u8>> for WeekdaySet {
    type Error = ScheduleError;

    fn try_from(indices: Vec<u8>) -> Result<Self, Self::Error> {
        Self::from_indices(indices)
    }
}

impl From<WeekdaySet> for Vec<u8> {
    fn from(set: WeekdaySet) -> Self {
        set.indices().collect()
    }
}

/// The workday window of a single date.
///
/// Represents a half-open interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkWindow {
    /// Start of the window (inclusive).
    pub start: NaiveDateTime,
    /// End of the window (exclusive).
    pub end: NaiveDateTime,
}

impl WorkWindow {
    /// Creates the window `[date + start_time, date + end_time)`.
    pub fn for_date(date: NaiveDate, start_time: NaiveTime, end_time: NaiveTime) -> Self {
        Self {
            start: combine(date, start_time),
            end: combine(date, end_time),
        }
    }

    /// Clips an interval to the window.
    ///
    /// The result may be empty or inverted when the interval lies outside
    /// the window; callers compare it against their own cursor.
    pub fn clip(&self, start: NaiveDateTime, end: NaiveDateTime) -> (NaiveDateTime, NaiveDateTime) {
        (start.max(self.start), end.min(self.end))
    }

    /// Checks if a timestamp falls within the window.
    pub fn contains(&self, dt: NaiveDateTime) -> bool {
        self.start <= dt && dt < self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    mod date_range {
        use super::*;

        #[test]
        fn days_are_inclusive_and_ascending() {
            let range = DateRange::new(date(2024, 6, 3), date(2024, 6, 5)).unwrap();
            let days: Vec<_> = range.days().collect();
            assert_eq!(days, vec![date(2024, 6, 3), date(2024, 6, 4), date(2024, 6, 5)]);
            assert_eq!(range.num_days(), 3);
        }

        #[test]
        fn single_day() {
            let range = DateRange::single(date(2024, 6, 3));
            assert_eq!(range.days().count(), 1);
            assert!(range.contains(date(2024, 6, 3)));
            assert!(!range.contains(date(2024, 6, 4)));
        }

        #[test]
        fn rejects_inverted_range() {
            let result = DateRange::new(date(2024, 6, 5), date(2024, 6, 3));
            assert!(matches!(result, Err(ScheduleError::InvalidDateRange { .. })));
        }

        #[test]
        fn parse_valid() {
            let range = DateRange::parse("2024-06-03", " 2024-06-07 ").unwrap();
            assert_eq!(range.from, date(2024, 6, 3));
            assert_eq!(range.to, date(2024, 6, 7));
        }

        #[test]
        fn parse_malformed() {
            let err = DateRange::parse("2024-13-01", "2024-06-07").unwrap_err();
            assert!(matches!(err, ScheduleError::InvalidDateRange { .. }));
            assert!(err.to_string().contains("2024-13-01"));

            assert!(DateRange::parse("yesterday", "2024-06-07").is_err());
        }

        #[test]
        fn datetime_bounds() {
            let range = DateRange::new(date(2024, 6, 3), date(2024, 6, 4)).unwrap();
            assert_eq!(range.start_datetime(), date(2024, 6, 3).and_time(NaiveTime::MIN));
            assert_eq!(
                range.end_datetime_exclusive(),
                date(2024, 6, 5).and_time(NaiveTime::MIN)
            );
        }

        #[test]
        fn display() {
            let range = DateRange::new(date(2024, 6, 3), date(2024, 6, 4)).unwrap();
            assert_eq!(range.to_string(), "2024-06-03..=2024-06-04");
        }
    }

    mod weekday_set {
        use super::*;

        #[test]
        fn monday_is_zero() {
            // 2024-06-03 is a Monday, 2024-06-08 a Saturday
            assert_eq!(weekday_index(date(2024, 6, 3)), 0);
            assert_eq!(weekday_index(date(2024, 6, 8)), 5);
            assert_eq!(weekday_index(date(2024, 6, 9)), 6);
        }

        #[test]
        fn membership() {
            let set = WeekdaySet::from_indices([0, 4]).unwrap();
            assert!(set.contains(Weekday::Mon));
            assert!(set.contains(Weekday::Fri));
            assert!(!set.contains(Weekday::Tue));
            assert!(set.contains_date(date(2024, 6, 3)));
            assert!(!set.contains_date(date(2024, 6, 4)));
            assert!(!set.contains_index(7));
        }

        #[test]
        fn presets() {
            assert_eq!(WeekdaySet::WORKWEEK.indices().collect::<Vec<_>>(), vec![0, 1, 2, 3, 4]);
            assert_eq!(WeekdaySet::ALL.indices().count(), 7);
            assert!(WeekdaySet::EMPTY.is_empty());
            assert_eq!(WeekdaySet::single(Weekday::Sun).indices().collect::<Vec<_>>(), vec![6]);
        }

        #[test]
        fn rejects_out_of_range_index() {
            let result = WeekdaySet::from_indices([0, 7]);
            assert!(matches!(result, Err(ScheduleError::InvalidConfig { .. })));
        }

        #[test]
        fn serde_as_sorted_indices() {
            let set = WeekdaySet::from_indices([4, 0, 2, 0]).unwrap();
            let json = serde_json::to_string(&set).unwrap();
            assert_eq!(json, "[0,2,4]");

            let parsed: WeekdaySet = serde_json::from_str("[4,2,0]").unwrap();
            assert_eq!(parsed, set);

            assert!(serde_json::from_str::<WeekdaySet>("[9]").is_err());
        }

        #[test]
        fn debug_lists_indices() {
            let set = WeekdaySet::from_indices([1, 3]).unwrap();
            assert_eq!(format!("{:?}", set), "{1, 3}");
        }
    }

    mod work_window {
        use super::*;

        #[test]
        fn for_date_and_contains() {
            let window = WorkWindow::for_date(date(2024, 6, 3), time(9, 0), time(18, 0));
            assert!(window.contains(combine(date(2024, 6, 3), time(9, 0))));
            assert!(window.contains(combine(date(2024, 6, 3), time(17, 59))));
            assert!(!window.contains(combine(date(2024, 6, 3), time(18, 0))));
            assert!(!window.contains(combine(date(2024, 6, 3), time(8, 59))));
        }

        #[test]
        fn clip_to_window() {
            let d = date(2024, 6, 3);
            let window = WorkWindow::for_date(d, time(9, 0), time(18, 0));

            let (start, end) = window.clip(combine(d, time(8, 0)), combine(d, time(9, 30)));
            assert_eq!(start, combine(d, time(9, 0)));
            assert_eq!(end, combine(d, time(9, 30)));

            let (start, end) = window.clip(combine(d, time(17, 0)), combine(d, time(19, 0)));
            assert_eq!(start, combine(d, time(17, 0)));
            assert_eq!(end, combine(d, time(18, 0)));

            // Fully before the window: inverted result
            let (start, end) = window.clip(combine(d, time(7, 0)), combine(d, time(8, 0)));
            assert!(end < start);
        }
    }
}
