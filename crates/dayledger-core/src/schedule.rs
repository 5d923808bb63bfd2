//! Schedule configuration and assembly.
//!
//! [`ScheduleConfig`] bundles the static inputs of the pipeline: the work
//! calendar, the rule table and the project mapping. [`ScheduleAssembler`]
//! owns a validated config and turns a date range, a holiday set and the
//! provider's events into the final ordered schedule.

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calendar::WorkCalendar;
use crate::error::ScheduleResult;
use crate::event::ScheduleEvent;
use crate::gaps::fill_workday_gaps;
use crate::holidays::HolidaySet;
use crate::project::ProjectMapping;
use crate::rules::{Rule, generate_rule_events};
use crate::time::{DateRange, WeekdaySet};
use crate::timeline::{merge_timeline, sort_by_start};

/// Static configuration of the schedule pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Workday window and working weekdays.
    pub work: WorkCalendar,
    /// Recurring rules, evaluated in order.
    pub rules: Vec<Rule>,
    /// Title to project lookup.
    pub projects: ProjectMapping,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            work: WorkCalendar::default(),
            rules: default_rules(),
            projects: ProjectMapping::new(),
        }
    }
}

fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN)
}

/// The built-in rule table.
pub fn default_rules() -> Vec<Rule> {
    vec![
        Rule::new("Break Time", hm(12, 0), hm(13, 0), WeekdaySet::WORKWEEK),
        Rule::new(
            "Personal administrative work",
            hm(9, 0),
            hm(10, 0),
            WeekdaySet::single(Weekday::Mon),
        ),
        Rule::new(
            "Replicon timesheets, personal administrative work",
            hm(17, 0),
            hm(18, 0),
            WeekdaySet::single(Weekday::Fri),
        ),
    ]
}

impl ScheduleConfig {
    /// Creates a config with no rules, no projects and the default calendar.
    pub fn empty() -> Self {
        Self {
            work: WorkCalendar::default(),
            rules: Vec::new(),
            projects: ProjectMapping::new(),
        }
    }

    /// Builder method to set the work calendar.
    pub fn with_work(mut self, work: WorkCalendar) -> Self {
        self.work = work;
        self
    }

    /// Builder method to replace the rule table.
    pub fn with_rules(mut self, rules: Vec<Rule>) -> Self {
        self.rules = rules;
        self
    }

    /// Builder method to set the project mapping.
    pub fn with_projects(mut self, projects: ProjectMapping) -> Self {
        self.projects = projects;
        self
    }

    /// Validates the work calendar and every rule.
    ///
    /// # Errors
    ///
    /// Returns the first [`ScheduleError::InvalidConfig`](crate::ScheduleError::InvalidConfig)
    /// encountered.
    pub fn validate(&self) -> ScheduleResult<()> {
        self.work.validate()?;
        for rule in &self.rules {
            rule.validate()?;
        }
        Ok(())
    }
}

/// Builds the final schedule from provider data.
///
/// Holds no per-request state; a single instance can be shared across
/// concurrent requests.
#[derive(Debug, Clone)]
pub struct ScheduleAssembler {
    config: ScheduleConfig,
}

impl ScheduleAssembler {
    /// Creates an assembler from a validated config.
    ///
    /// # Errors
    ///
    /// Returns an error if the config fails [`ScheduleConfig::validate`].
    pub fn new(config: ScheduleConfig) -> ScheduleResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Returns the config in use.
    pub fn config(&self) -> &ScheduleConfig {
        &self.config
    }

    /// Returns the project mapping, for normalizing provider events.
    pub fn projects(&self) -> &ProjectMapping {
        &self.config.projects
    }

    /// Produces the ordered schedule for `range`.
    ///
    /// Provider events, rule events and placeholders are merged and sorted
    /// by start; ties keep provider events first, then rule events, then
    /// placeholders.
    pub fn assemble(
        &self,
        range: DateRange,
        holidays: &HolidaySet,
        provider_events: Vec<ScheduleEvent>,
    ) -> Vec<ScheduleEvent> {
        let provider_count = provider_events.len();
        let rule_events =
            generate_rule_events(&self.config.rules, range, holidays, &self.config.projects);
        let rule_count = rule_events.len();

        let mut timeline = merge_timeline(provider_events, rule_events);
        let placeholders = fill_workday_gaps(&timeline, range, holidays, &self.config.work);
        let placeholder_count = placeholders.len();

        timeline.extend(placeholders);
        sort_by_start(&mut timeline);

        debug!(
            range = %range,
            holidays = holidays.len(),
            provider_events = provider_count,
            rule_events = rule_count,
            placeholders = placeholder_count,
            "Assembled schedule"
        );

        timeline
    }
}
