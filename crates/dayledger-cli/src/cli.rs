//! Command-line interface definition.

use std::net::SocketAddr;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

/// dayledger - a complete, gap-free ledger of your working days
#[derive(Debug, Parser)]
#[command(name = "dayledger")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, global = true, env = "DAYLEDGER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v', global = true)]
    pub debug: bool,

    /// Defaults to `schedule` for today
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP server in the foreground
    Serve {
        /// Address to listen on (overrides [server] bind)
        #[arg(long, env = "DAYLEDGER_BIND")]
        bind: Option<SocketAddr>,
    },

    /// Build the schedule once and print it
    Schedule(ScheduleArgs),

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Options for the `schedule` command.
#[derive(Debug, Clone, Default, Args)]
pub struct ScheduleArgs {
    /// First date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Last date (YYYY-MM-DD), defaults to --from
    #[arg(long)]
    pub to: Option<NaiveDate>,

    /// Print the JSON array served by `/calendar`
    #[arg(long)]
    pub json: bool,

    /// Maximum subject length in the table (truncated with ellipsis)
    #[arg(long)]
    pub max_subject_length: Option<usize>,

    /// List attendees under each meeting
    #[arg(long)]
    pub attendees: bool,
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Dump current configuration
    Dump,

    /// Validate configuration
    Validate,

    /// Show configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn schedule_dates() {
        let cli = Cli::parse_from([
            "dayledger",
            "schedule",
            "--from",
            "2024-06-03",
            "--to",
            "2024-06-07",
            "--json",
        ]);
        let Some(Command::Schedule(args)) = cli.command else {
            panic!("expected schedule command");
        };
        assert_eq!(args.from, NaiveDate::from_ymd_opt(2024, 6, 3));
        assert_eq!(args.to, NaiveDate::from_ymd_opt(2024, 6, 7));
        assert!(args.json);
    }

    #[test]
    fn rejects_bad_date() {
        let result = Cli::try_parse_from(["dayledger", "schedule", "--from", "06/03/2024"]);
        assert!(result.is_err());
    }

    #[test]
    fn serve_bind_and_global_flags() {
        let cli = Cli::parse_from([
            "dayledger",
            "serve",
            "--bind",
            "0.0.0.0:9000",
            "--config",
            "/tmp/dayledger.toml",
            "-v",
        ]);
        assert!(cli.debug);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/dayledger.toml")));
        let Some(Command::Serve { bind }) = cli.command else {
            panic!("expected serve command");
        };
        assert_eq!(bind.map(|b| b.port()), Some(9000));
    }

    #[test]
    fn no_command() {
        let cli = Cli::parse_from(["dayledger"]);
        assert!(cli.command.is_none());
    }
}
