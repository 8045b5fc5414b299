//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::app_config::Settings;

/// Convert browser cookie exports and check which ones are still live.
///
/// `convert` normalizes raw exports into a canonical JSON store, `check`
/// validates every stored set against the account page and copies live sets
/// to the working folder, and `run` does both in sequence.
#[derive(Parser, Debug)]
#[command(name = "cookie-checker")]
#[command(author, version, about)]
pub struct Cli {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Pipeline stage to run.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Normalize raw cookie exports into the canonical store
    Convert(ConvertArgs),

    /// Validate stored cookie sets and save live ones
    Check(CheckArgs),

    /// Convert, then check
    Run(RunArgs),
}

/// Arguments for `convert`.
#[derive(Args, Debug)]
pub struct ConvertArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub store: StoreArgs,
}

/// Arguments for `check`.
#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    #[command(flatten)]
    pub validate: ValidateArgs,
}

/// Arguments for `run`.
#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub store: StoreArgs,

    #[command(flatten)]
    pub validate: ValidateArgs,
}

#[derive(Args, Debug)]
pub struct InputArgs {
    /// Folder with raw cookie exports
    #[arg(short = 'i', long, value_name = "DIR")]
    pub input: Option<PathBuf>,

    /// Empty the canonical store before converting
    #[arg(long)]
    pub clean: bool,
}

#[derive(Args, Debug)]
pub struct StoreArgs {
    /// Canonical store folder
    #[arg(short = 's', long, value_name = "DIR")]
    pub store: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Folder receiving live cookie sets
    #[arg(short = 'w', long, value_name = "DIR")]
    pub working: Option<PathBuf>,

    /// Account page to validate against
    #[arg(long, value_name = "URL")]
    pub account_url: Option<String>,

    /// Request timeout in seconds (1-300)
    #[arg(short = 't', long, value_parser = clap::value_parser!(u64).range(1..=300))]
    pub timeout: Option<u64>,

    /// Cookie sets validated at once (1-100)
    #[arg(short = 'c', long, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub concurrency: Option<u8>,
}

impl InputArgs {
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(input) = &self.input {
            settings.input_dir.clone_from(input);
        }
    }
}

impl StoreArgs {
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(store) = &self.store {
            settings.store_dir.clone_from(store);
        }
    }
}

impl ValidateArgs {
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(working) = &self.working {
            settings.working_dir.clone_from(working);
        }
        if let Some(account_url) = &self.account_url {
            settings.account_url.clone_from(account_url);
        }
        if let Some(timeout) = self.timeout {
            settings.timeout_secs = timeout;
        }
        if let Some(concurrency) = self.concurrency {
            settings.concurrency = concurrency;
        }
    }
}

impl Command {
    /// Overlays this subcommand's flags onto `settings`.
    pub fn apply(&self, settings: &mut Settings) {
        match self {
            Self::Convert(args) => {
                args.input.apply(settings);
                args.store.apply(settings);
            }
            Self::Check(args) => {
                args.store.apply(settings);
                args.validate.apply(settings);
            }
            Self::Run(args) => {
                args.input.apply(settings);
                args.store.apply(settings);
                args.validate.apply(settings);
            }
        }
    }

    /// Whether the canonical store should be emptied before converting.
    #[must_use]
    pub fn clean(&self) -> bool {
        match self {
            Self::Convert(args) => args.input.clean,
            Self::Run(args) => args.input.clean,
            Self::Check(_) => false,
        }
    }
}
