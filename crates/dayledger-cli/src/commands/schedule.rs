//! Schedule command: builds the ledger once and prints it.

use chrono::{Local, NaiveDate};
use dayledger_core::{OutputFormat, ScheduleEvent, TableOptions, render_json, render_table};
use dayledger_server::ScheduleService;

use crate::cli::ScheduleArgs;
use crate::config::AppConfig;
use crate::error::{ClientError, ClientResult};

/// Resolves the requested range: `from` defaults to `today`, `to` to `from`.
pub fn resolve_dates(args: &ScheduleArgs, today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let from = args.from.unwrap_or(today);
    let to = args.to.unwrap_or(from);
    (from, to)
}

/// Builds the schedule with the configured provider.
pub async fn build(args: &ScheduleArgs, config: &AppConfig) -> ClientResult<Vec<ScheduleEvent>> {
    let service = ScheduleService::new(config.schedule_config(), config.provider.build())?;
    let (from, to) = resolve_dates(args, Local::now().date_naive());
    Ok(service.build_schedule(from, to).await?)
}

/// Renders events in the requested format.
pub fn render(events: &[ScheduleEvent], args: &ScheduleArgs) -> ClientResult<String> {
    let format = if args.json {
        OutputFormat::Json
    } else {
        OutputFormat::Table
    };

    match format {
        OutputFormat::Json => render_json(events).map_err(|e| ClientError::Render(e.to_string())),
        OutputFormat::Table => {
            let options = TableOptions {
                max_subject_length: args.max_subject_length,
                show_attendees: args.attendees,
            };
            Ok(render_table(events, &options))
        }
    }
}

/// Builds and prints the schedule.
pub async fn run(args: &ScheduleArgs, config: &AppConfig) -> ClientResult<()> {
    let events = build(args, config).await?;
    let output = render(&events, args)?;
    if output.ends_with('\n') {
        print!("{}", output);
    } else {
        println!("{}", output);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dayledger_providers::{ProviderKind, ProviderSettings};

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    fn args(from: u32, to: u32) -> ScheduleArgs {
        ScheduleArgs {
            from: Some(date(from)),
            to: Some(date(to)),
            ..Default::default()
        }
    }

    fn config_with_calendar(dir: &tempfile::TempDir, contents: &str) -> AppConfig {
        let path = dir.path().join("calendar.json");
        std::fs::write(&path, contents).unwrap();
        AppConfig {
            provider: ProviderSettings::new(ProviderKind::Json, path),
            ..Default::default()
        }
    }

    #[test]
    fn date_defaults() {
        let today = date(5);
        assert_eq!(
            resolve_dates(&ScheduleArgs::default(), today),
            (today, today)
        );

        let from_only = ScheduleArgs {
            from: Some(date(3)),
            ..Default::default()
        };
        assert_eq!(resolve_dates(&from_only, today), (date(3), date(3)));
        assert_eq!(resolve_dates(&args(3, 7), today), (date(3), date(7)));
    }

    #[tokio::test]
    async fn builds_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_with_calendar(
            &dir,
            r#"[{"subject": "Design review", "start": "2024-06-03T10:00:00", "end": "2024-06-03T11:00:00"}]"#,
        );

        let events = build(&args(3, 3), &config).await.unwrap();
        let subjects: Vec<_> = events.iter().map(|e| e.subject.as_str()).collect();
        assert_eq!(
            subjects,
            vec![
                "Personal administrative work",
                "Design review",
                "",
                "Break Time",
                ""
            ]
        );
    }

    #[tokio::test]
    async fn inverted_range_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_with_calendar(&dir, "[]");

        let err = build(&args(7, 3), &config).await.unwrap_err();
        assert!(matches!(err, ClientError::Schedule(_)));
    }

    #[tokio::test]
    async fn missing_calendar_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            provider: ProviderSettings::new(ProviderKind::Json, dir.path().join("none.json")),
            ..Default::default()
        };

        let err = build(&args(3, 3), &config).await.unwrap_err();
        assert!(err.to_string().starts_with("calendar provider unavailable"));
    }

    #[tokio::test]
    async fn renders_table_and_json() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_with_calendar(&dir, "[]");
        let events = build(&args(3, 3), &config).await.unwrap();

        let table = render(&events, &args(3, 3)).unwrap();
        assert!(table.starts_with("Mon 2024-06-03\n"));
        assert!(table.contains("Break Time"));

        let json_args = ScheduleArgs {
            json: true,
            ..args(3, 3)
        };
        let json = render(&events, &json_args).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), events.len());
    }
}
