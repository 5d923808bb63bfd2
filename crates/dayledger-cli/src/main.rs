//! dayledger CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use tracing::Level;

use dayledger_cli::cli::{Cli, Command, ConfigAction, ScheduleArgs};
use dayledger_cli::commands;
use dayledger_cli::config::AppConfig;
use dayledger_cli::error::ClientResult;
use dayledger_core::{TracingConfig, init_tracing};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let tracing_config = match cli.command {
        Some(Command::Serve { .. }) if cli.debug => TracingConfig::server().with_level(Level::DEBUG),
        Some(Command::Serve { .. }) => TracingConfig::server(),
        _ => TracingConfig::cli(cli.debug),
    };
    if let Err(e) = init_tracing(tracing_config) {
        eprintln!("warning: logging disabled: {}", e);
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> ClientResult<()> {
    let source = cli.config.clone().unwrap_or_else(AppConfig::default_path);
    if let Some(Command::Config {
        action: ConfigAction::Path,
    }) = &cli.command
    {
        return commands::config::path(&source);
    }

    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };

    match cli.command {
        Some(Command::Serve { bind }) => commands::serve::run(bind, &config).await,
        Some(Command::Schedule(args)) => commands::schedule::run(&args, &config).await,
        Some(Command::Config { action }) => match action {
            ConfigAction::Dump => commands::config::dump(&config, &source),
            ConfigAction::Validate => commands::config::validate(&config),
            ConfigAction::Path => commands::config::path(&source),
        },
        None => commands::schedule::run(&ScheduleArgs::default(), &config).await,
    }
}
