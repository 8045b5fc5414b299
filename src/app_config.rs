//! Application configuration loading and CLI defaults.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use cookie_checker_core::DEFAULT_CONCURRENCY;
use cookie_checker_core::validator::{DEFAULT_ACCOUNT_URL, DEFAULT_TIMEOUT_SECS, MAX_TIMEOUT_SECS};

/// Default folder holding raw cookie exports.
pub const DEFAULT_INPUT_DIR: &str = "cookies";

/// Default canonical store folder.
pub const DEFAULT_STORE_DIR: &str = "json__spotify_cookies";

/// Default working-cookie folder for live sets.
pub const DEFAULT_WORKING_DIR: &str = "working_cookies";

/// TOML-style file configuration for cookie-checker defaults.
#[derive(Debug, Clone, Default)]
pub struct FileConfig {
    /// Folder holding raw cookie exports.
    pub input_dir: Option<PathBuf>,
    /// Canonical store folder.
    pub store_dir: Option<PathBuf>,
    /// Working-cookie folder.
    pub working_dir: Option<PathBuf>,
    /// Account page URL.
    pub account_url: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: Option<u64>,
    /// Cookie sets validated at once (same range as CLI).
    pub concurrency: Option<u8>,
    /// Default verbosity mode.
    pub verbosity: Option<VerbositySetting>,
}

impl FileConfig {
    /// Validates config values against runtime and CLI constraints.
    pub fn validate(&self) -> Result<()> {
        if let Some(concurrency) = self.concurrency
            && !(1..=100).contains(&concurrency)
        {
            bail!("Invalid config value for `concurrency`: {concurrency}. Expected range: 1..=100");
        }

        if let Some(timeout) = self.timeout_secs
            && !(1..=MAX_TIMEOUT_SECS).contains(&timeout)
        {
            bail!(
                "Invalid config value for `timeout_secs`: {timeout}. Expected range: 1..={MAX_TIMEOUT_SECS}"
            );
        }

        if let Some(account_url) = &self.account_url {
            let parsed = url::Url::parse(account_url)
                .with_context(|| format!("Invalid config value for `account_url`: '{account_url}'"))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                bail!("Invalid config value for `account_url`: '{account_url}'. Expected an http(s) URL");
            }
        }

        Ok(())
    }
}

/// Supported config verbosity labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerbositySetting {
    Default,
    Verbose,
    Quiet,
    Debug,
}

impl VerbositySetting {
    /// Returns the stable string label for display output.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Verbose => "verbose",
            Self::Quiet => "quiet",
            Self::Debug => "debug",
        }
    }

    /// Log filter used when neither `RUST_LOG` nor a CLI flag overrides it.
    #[must_use]
    pub fn log_level(self) -> &'static str {
        match self {
            Self::Default => "info",
            Self::Verbose => "debug",
            Self::Quiet => "error",
            Self::Debug => "trace",
        }
    }
}

/// Effective settings after applying config file and CLI overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub input_dir: PathBuf,
    pub store_dir: PathBuf,
    pub working_dir: PathBuf,
    pub account_url: String,
    pub timeout_secs: u64,
    pub concurrency: u8,
    pub verbosity: VerbositySetting,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            store_dir: PathBuf::from(DEFAULT_STORE_DIR),
            working_dir: PathBuf::from(DEFAULT_WORKING_DIR),
            account_url: DEFAULT_ACCOUNT_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            // DEFAULT_CONCURRENCY is 1, always within u8.
            concurrency: u8::try_from(DEFAULT_CONCURRENCY).unwrap_or(1),
            verbosity: VerbositySetting::Default,
        }
    }
}

impl Settings {
    /// Builds settings from built-in defaults overlaid with `config`.
    #[must_use]
    pub fn from_file_config(config: Option<&FileConfig>) -> Self {
        let mut settings = Self::default();
        let Some(config) = config else {
            return settings;
        };

        if let Some(input_dir) = &config.input_dir {
            settings.input_dir.clone_from(input_dir);
        }
        if let Some(store_dir) = &config.store_dir {
            settings.store_dir.clone_from(store_dir);
        }
        if let Some(working_dir) = &config.working_dir {
            settings.working_dir.clone_from(working_dir);
        }
        if let Some(account_url) = &config.account_url {
            settings.account_url.clone_from(account_url);
        }
        if let Some(timeout_secs) = config.timeout_secs {
            settings.timeout_secs = timeout_secs;
        }
        if let Some(concurrency) = config.concurrency {
            settings.concurrency = concurrency;
        }
        if let Some(verbosity) = config.verbosity {
            settings.verbosity = verbosity;
        }
        settings
    }
}

/// Loaded config metadata.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// Resolved config path if a base directory is known.
    pub path: Option<PathBuf>,
    /// Parsed file config when a config file exists and was valid.
    pub config: Option<FileConfig>,
}

/// Resolves default config path.
///
/// Priority:
/// 1. `$XDG_CONFIG_HOME/cookie-checker/config.toml`
/// 2. `$HOME/.config/cookie-checker/config.toml`
#[must_use]
pub fn resolve_default_config_path() -> Option<PathBuf> {
    if let Some(xdg_config_home) = env_var_non_empty_os("XDG_CONFIG_HOME") {
        return Some(
            PathBuf::from(xdg_config_home)
                .join("cookie-checker")
                .join("config.toml"),
        );
    }

    let home = env_var_non_empty_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("cookie-checker")
            .join("config.toml"),
    )
}

fn env_var_non_empty_os(name: &str) -> Option<std::ffi::OsString> {
    let value = env::var_os(name)?;
    if value.is_empty() { None } else { Some(value) }
}

/// Loads config from default path if present.
pub fn load_default_file_config() -> Result<LoadedConfig> {
    let path = resolve_default_config_path();
    let config = match path.as_deref() {
        Some(path_ref) if path_ref.exists() => Some(load_file_config(path_ref)?),
        _ => None,
    };
    Ok(LoadedConfig { path, config })
}

fn load_file_config(path: &Path) -> Result<FileConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
    parse_config_str(&raw)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))
}

fn parse_config_str(raw: &str) -> Result<FileConfig> {
    let mut cfg = FileConfig::default();
    for (line_index, raw_line) in raw.lines().enumerate() {
        let line = strip_inline_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }

        let Some((raw_key, raw_value)) = line.split_once('=') else {
            bail!(
                "Invalid config syntax on line {}: expected key = value",
                line_index + 1
            );
        };

        let key = raw_key.trim();
        let value = raw_value.trim();
        let line_number = line_index + 1;

        match key {
            "input_dir" | "store_dir" | "working_dir" => {
                let parsed = parse_string_literal(value)
                    .with_context(|| format!("Invalid `{key}` value on line {line_number}"))?;
                let path = Some(PathBuf::from(parsed));
                match key {
                    "input_dir" => cfg.input_dir = path,
                    "store_dir" => cfg.store_dir = path,
                    _ => cfg.working_dir = path,
                }
            }
            "account_url" => {
                let parsed = parse_string_literal(value).with_context(|| {
                    format!("Invalid `account_url` value on line {line_number}")
                })?;
                cfg.account_url = Some(parsed);
            }
            "timeout_secs" => {
                let parsed = parse_integer_u64(value).with_context(|| {
                    format!("Invalid `timeout_secs` value on line {line_number}")
                })?;
                cfg.timeout_secs = Some(parsed);
            }
            "concurrency" => {
                let parsed = parse_integer_u8(value).with_context(|| {
                    format!("Invalid `concurrency` value on line {line_number}")
                })?;
                cfg.concurrency = Some(parsed);
            }
            "verbosity" => {
                let parsed = parse_string_literal(value).with_context(|| {
                    format!("Invalid `verbosity` value on line {line_number}")
                })?;
                cfg.verbosity = Some(parse_verbosity(&parsed).with_context(|| {
                    format!("Invalid `verbosity` value '{parsed}' on line {line_number}")
                })?);
            }
            unknown => {
                bail!("Unknown configuration key: '{unknown}' on line {line_number}");
            }
        }
    }
    cfg.validate()?;
    Ok(cfg)
}

fn strip_inline_comment(line: &str) -> &str {
    let mut in_string = false;
    for (index, ch) in line.char_indices() {
        match ch {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..index],
            _ => {}
        }
    }
    line
}

fn parse_string_literal(raw_value: &str) -> Result<String> {
    if raw_value.len() < 2 || !raw_value.starts_with('"') || !raw_value.ends_with('"') {
        bail!("Expected double-quoted string");
    }
    Ok(raw_value[1..raw_value.len() - 1].to_string())
}

fn parse_integer_u8(raw_value: &str) -> Result<u8> {
    let token = raw_value.trim();
    if token.is_empty() {
        bail!("Expected integer value");
    }
    let value = token.parse::<u16>()?;
    u8::try_from(value).map_err(|_| anyhow::anyhow!("Integer value out of range for u8"))
}

fn parse_integer_u64(raw_value: &str) -> Result<u64> {
    let token = raw_value.trim();
    if token.is_empty() {
        bail!("Expected integer value");
    }
    let value = token.parse::<i128>()?;
    if value < 0 {
        bail!("Expected non-negative integer");
    }
    u64::try_from(value).map_err(|_| anyhow::anyhow!("Integer value out of range for u64"))
}

fn parse_verbosity(value: &str) -> Result<VerbositySetting> {
    match value {
        "default" => Ok(VerbositySetting::Default),
        "verbose" => Ok(VerbositySetting::Verbose),
        "quiet" => Ok(VerbositySetting::Quiet),
        "debug" => Ok(VerbositySetting::Debug),
        _ => bail!("Expected one of: default, verbose, quiet, debug"),
    }
}
