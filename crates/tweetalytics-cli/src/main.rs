//! Main entry point for the Tweetalytics command line.

use anyhow::Context;
use clap::Parser;
use std::process::ExitCode;
use tracing::{debug, error};
use tweetalytics_cli::{App, Cli, CliError};
use tweetalytics_common::init_logging;
use tweetalytics_config::ConfigLoader;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let mut config =
        ConfigLoader::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }

    // Keeps the non-blocking file writer flushing until exit.
    let _guard = init_logging(&config.logging).context("Failed to initialize logging")?;
    debug!(command = ?cli.command, "Starting");

    let app = App::from_config(config).context("Failed to set up")?;
    match app.run(&cli.command).await {
        Ok(report) => {
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            error!(error = %err, "Query failed");
            eprintln!("error: {err}");
            Ok(exit_code(&err))
        }
    }
}

fn exit_code(err: &CliError) -> ExitCode {
    ExitCode::from(err.exit_code() as u8)
}
