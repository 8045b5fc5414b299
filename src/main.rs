//! CLI entry point for the cookie-checker tool.

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::{debug, info};

mod app;
mod app_config;
mod cli;
mod output;

use app::{command_dispatcher, terminal};
use app_config::{Settings, VerbositySetting, load_default_file_config};
use cli::Cli;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let cli = Cli::parse();

    let loaded = load_default_file_config()?;
    let mut settings = Settings::from_file_config(loaded.config.as_ref());
    cli.command.apply(&mut settings);

    terminal::init_tracing(terminal::default_log_level(
        cli.quiet,
        cli.verbose,
        settings.verbosity,
    ));

    debug!(
        ?cli,
        config_path = ?loaded.path,
        verbosity = settings.verbosity.as_str(),
        "CLI arguments parsed"
    );
    info!("Cookie checker starting");

    let quiet =
        cli.quiet || (cli.verbose == 0 && settings.verbosity == VerbositySetting::Quiet);
    let exit = command_dispatcher::dispatch(&cli.command, &settings, quiet).await?;
    debug!(?exit, "finished");
    Ok(exit.into())
}
