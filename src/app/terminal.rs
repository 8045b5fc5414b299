//! Log level selection and tracing setup.

use crate::app_config::VerbositySetting;

/// Picks the default log filter.
///
/// Priority: quiet flag > verbose flag > config verbosity > `info`.
/// `RUST_LOG`, when set, overrides the result in [`init_tracing`].
pub(crate) fn default_log_level(quiet: bool, verbose: u8, config: VerbositySetting) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => config.log_level(),
        1 => "debug",
        _ => "trace",
    }
}

/// Installs the stderr tracing subscriber. Later calls are no-ops.
pub(crate) fn init_tracing(default_level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .try_init();
}
