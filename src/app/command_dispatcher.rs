//! CLI command routing: runs the convert, check, and run subcommands.

use std::time::Duration;

use anyhow::{Context, Result};
use cookie_checker_core::{
    CheckEngine, CheckSummary, ConvertReport, CookieStore, Validator, WorkingStore, convert_folder,
};
use tracing::{debug, info};

use crate::app::exit_handler::{ProcessExit, determine_exit_outcome};
use crate::app_config::Settings;
use crate::cli::Command;
use crate::output;

/// Runs `command` with the resolved `settings` and returns the exit outcome.
pub(crate) async fn dispatch(command: &Command, settings: &Settings, quiet: bool) -> Result<ProcessExit> {
    debug!(?settings, "effective settings");
    match command {
        Command::Convert(_) => {
            let report = run_convert(settings, command.clean(), quiet)?;
            Ok(determine_exit_outcome(
                report.converted_count(),
                report.failed_count(),
            ))
        }
        Command::Check(_) => {
            let summary = run_check(settings, quiet).await?;
            Ok(check_exit(&summary, 0))
        }
        Command::Run(_) => {
            let report = run_convert(settings, command.clean(), quiet)?;
            let summary = run_check(settings, quiet).await?;
            Ok(check_exit(&summary, report.failed_count()))
        }
    }
}

fn check_exit(summary: &CheckSummary, convert_failures: usize) -> ProcessExit {
    let failed = summary.errored() + convert_failures;
    determine_exit_outcome(summary.total() - summary.errored(), failed)
}

fn run_convert(settings: &Settings, clean: bool, quiet: bool) -> Result<ConvertReport> {
    let store = CookieStore::new(&settings.store_dir);
    let preparation = store
        .prepare(clean)
        .with_context(|| format!("Failed to prepare store '{}'", settings.store_dir.display()))?;
    info!(store = %settings.store_dir.display(), ?preparation, "store ready");

    let report = convert_folder(&settings.input_dir, &store).with_context(|| {
        format!(
            "Failed to convert cookie files from '{}'",
            settings.input_dir.display()
        )
    })?;
    output::emit(&output::convert_lines(&report, &settings.store_dir), quiet);
    Ok(report)
}

async fn run_check(settings: &Settings, quiet: bool) -> Result<CheckSummary> {
    let validator = Validator::with_endpoint(
        &settings.account_url,
        Duration::from_secs(settings.timeout_secs),
    )
    .context("Failed to set up validator")?;
    let engine = CheckEngine::new(usize::from(settings.concurrency))?;
    let store = CookieStore::new(&settings.store_dir);
    let working = WorkingStore::new(&settings.working_dir);

    let summary = engine
        .check_store(&store, &validator, &working)
        .await
        .with_context(|| {
            format!(
                "Failed to check cookie sets in '{}'",
                settings.store_dir.display()
            )
        })?;
    output::emit(&output::check_lines(&summary), quiet);
    Ok(summary)
}
