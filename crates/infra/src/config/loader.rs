//! Configuration loader
//!
//! Loads writer configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If the queue name is not set, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `QUEUESINK_QUEUE_NAME`: Destination queue (required)
//! - `QUEUESINK_TTL_SECONDS`: Message time-to-live
//! - `QUEUESINK_VISIBILITY_DELAY_SECONDS`: Initial visibility delay
//! - `QUEUESINK_DIE_ON_ERROR`: Abort on connection/content errors
//!   (true/false)
//! - `QUEUESINK_BATCH_THRESHOLD`: Buffered messages that trigger a dispatch
//! - `QUEUESINK_SEND_TIMEOUT_SECONDS`: Per-message send timeout
//! - `QUEUESINK_MAX_CONCURRENT_SENDS`: In-flight send limit per dispatch
//!
//! Optional variables fall back to [`WriterConfig::default`].
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./queuesink.toml` or `./queuesink.json` (current working directory)
//! 2. `./config.toml` or `./config.json` (current working directory)
//! 3. `../queuesink.toml` or `../queuesink.json` (parent directory)
//! 4. Relative to executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;

use queuesink_domain::{QueueSinkError, Result, WriterConfig};

const ENV_QUEUE_NAME: &str = "QUEUESINK_QUEUE_NAME";
const ENV_TTL: &str = "QUEUESINK_TTL_SECONDS";
const ENV_VISIBILITY_DELAY: &str = "QUEUESINK_VISIBILITY_DELAY_SECONDS";
const ENV_DIE_ON_ERROR: &str = "QUEUESINK_DIE_ON_ERROR";
const ENV_BATCH_THRESHOLD: &str = "QUEUESINK_BATCH_THRESHOLD";
const ENV_SEND_TIMEOUT: &str = "QUEUESINK_SEND_TIMEOUT_SECONDS";
const ENV_MAX_CONCURRENT: &str = "QUEUESINK_MAX_CONCURRENT_SENDS";

/// Load configuration with automatic fallback strategy
///
/// # Errors
/// Returns `QueueSinkError::Config` if configuration cannot be loaded from
/// either source, or if the loaded configuration fails validation.
pub fn load() -> Result<WriterConfig> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// # Errors
/// Returns `QueueSinkError::Config` if `QUEUESINK_QUEUE_NAME` is missing,
/// a numeric variable does not parse, or validation fails.
pub fn load_from_env() -> Result<WriterConfig> {
    let defaults = WriterConfig::default();

    let config = WriterConfig {
        queue_name: env_var(ENV_QUEUE_NAME)?,
        time_to_live_seconds: env_parse(ENV_TTL, defaults.time_to_live_seconds)?,
        initial_visibility_delay_seconds: env_parse(
            ENV_VISIBILITY_DELAY,
            defaults.initial_visibility_delay_seconds,
        )?,
        die_on_error: env_bool(ENV_DIE_ON_ERROR, defaults.die_on_error),
        batch_threshold: env_parse(ENV_BATCH_THRESHOLD, defaults.batch_threshold)?,
        send_timeout_seconds: env_parse(ENV_SEND_TIMEOUT, defaults.send_timeout_seconds)?,
        max_concurrent_sends: env_parse(ENV_MAX_CONCURRENT, defaults.max_concurrent_sends)?,
    };

    config.validate()?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Format is detected by file extension.
///
/// # Errors
/// Returns `QueueSinkError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - Validation fails
pub fn load_from_file(path: Option<PathBuf>) -> Result<WriterConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(QueueSinkError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            QueueSinkError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| QueueSinkError::Config(format!("Failed to read config file: {e}")))?;

    let config = parse_config(&contents, &config_path)?;
    config.validate()?;
    Ok(config)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<WriterConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| QueueSinkError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| QueueSinkError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(QueueSinkError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    const FILE_NAMES: [&str; 4] =
        ["queuesink.toml", "queuesink.json", "config.toml", "config.json"];

    let mut roots = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        roots.push(cwd.clone());
        roots.push(cwd.join(".."));
    }
    if let Some(exe_dir) =
        std::env::current_exe().ok().and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        roots.push(exe_dir);
    }

    roots
        .iter()
        .flat_map(|root| FILE_NAMES.iter().map(move |name| root.join(name)))
        .find(|path| path.exists())
}

/// Get required environment variable
fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        QueueSinkError::Config(format!("Missing required environment variable: {key}"))
    })
}

/// Parse an optional numeric environment variable
fn env_parse<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| QueueSinkError::Config(format!("Invalid value for {key}: {e}"))),
        Err(_) => Ok(default),
    }
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
