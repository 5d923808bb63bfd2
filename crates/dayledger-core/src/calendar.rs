//! Work calendar: the daily workday window and working weekdays.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{ScheduleError, ScheduleResult};
use crate::holidays::HolidaySet;
use crate::time::{WeekdaySet, WorkWindow};

/// Process-wide definition of working time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkCalendar {
    /// Time of day the workday starts.
    pub start_time: NaiveTime,
    /// Time of day the workday ends.
    pub end_time: NaiveTime,
    /// Working weekdays (Monday = 0).
    pub weekdays: WeekdaySet,
}

impl Default for WorkCalendar {
    fn default() -> Self {
        Self {
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN),
            end_time: NaiveTime::from_hms_opt(18, 0, 0).unwrap_or(NaiveTime::MIN),
            weekdays: WeekdaySet::WORKWEEK,
        }
    }
}

impl WorkCalendar {
    /// Creates a work calendar.
    pub fn new(start_time: NaiveTime, end_time: NaiveTime, weekdays: WeekdaySet) -> Self {
        Self {
            start_time,
            end_time,
            weekdays,
        }
    }

    /// Checks that the workday starts before it ends.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::InvalidConfig`] otherwise.
    pub fn validate(&self) -> ScheduleResult<()> {
        if self.start_time >= self.end_time {
            return Err(ScheduleError::invalid_config(format!(
                "workday must start before it ends ({} >= {})",
                self.start_time, self.end_time
            )));
        }
        Ok(())
    }

    /// Returns true if `date` is a working weekday and not a holiday.
    pub fn is_working_day(&self, date: NaiveDate, holidays: &HolidaySet) -> bool {
        self.weekdays.contains_date(date) && !holidays.contains(date)
    }

    /// Returns the workday window on `date`.
    pub fn window(&self, date: NaiveDate) -> WorkWindow {
        WorkWindow::for_date(date, self.start_time, self.end_time)
    }

    /// Returns the length of a workday in minutes.
    pub fn workday_minutes(&self) -> i64 {
        (self.end_time - self.start_time).num_minutes()
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

    #[test]
    fn default_is_nine_to_six_weekdays() {
        let calendar = WorkCalendar::default();
        assert_eq!(calendar.start_time, time(9, 0));
        assert_eq!(calendar.end_time, time(18, 0));
        assert_eq!(calendar.weekdays, WeekdaySet::WORKWEEK);
        assert_eq!(calendar.workday_minutes(), 540);
        assert!(calendar.validate().is_ok());
    }

    #[test]
    fn working_day_checks_weekday_and_holidays() {
        let calendar = WorkCalendar::default();
        let holidays: HolidaySet = [date(2024, 6, 4)].into_iter().collect();

        assert!(calendar.is_working_day(date(2024, 6, 3), &holidays));
        assert!(!calendar.is_working_day(date(2024, 6, 4), &holidays));
        assert!(!calendar.is_working_day(date(2024, 6, 8), &holidays));
    }

    #[test]
    fn window_for_date() {
        let calendar = WorkCalendar::default();
        let window = calendar.window(date(2024, 6, 3));
        assert_eq!(window.start, date(2024, 6, 3).and_time(time(9, 0)));
        assert_eq!(window.end, date(2024, 6, 3).and_time(time(18, 0)));
    }

    #[test]
    fn validate_rejects_inverted_window() {
        let calendar = WorkCalendar::new(time(18, 0), time(9, 0), WeekdaySet::WORKWEEK);
        assert!(matches!(
            calendar.validate(),
            Err(ScheduleError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn partial_deserialize_keeps_defaults() {
        let calendar: WorkCalendar = serde_json::from_str(r#"{"end_time": "17:00:00"}"#).unwrap();
        assert_eq!(calendar.start_time, time(9, 0));
        assert_eq!(calendar.end_time, time(17, 0));
    }
}
