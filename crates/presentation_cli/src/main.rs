//! Speaker for Seniors CLI
//!
//! Processes one recording per run and prints what happened.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::process::ExitCode;

use clap::Parser;
use infrastructure::{AppConfig, init_logging};
use presentation_cli::{Cli, build_service, error_line, render_json, render_summary};
use tracing::debug;

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = AppConfig::load(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);

    // Ignore a subscriber that is already installed
    if let Err(e) = init_logging(&config.logging) {
        debug!(error = %e, "Logging already initialized");
    }

    let request = cli.request()?;
    let service = build_service(&config)?;
    let reply = service.handle(&request).await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&render_json(&reply))?);
    } else {
        print!("{}", render_summary(&reply));
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    // Usage errors exit with status 2 from inside clap
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", error_line(&e));
            ExitCode::FAILURE
        },
    }
}
