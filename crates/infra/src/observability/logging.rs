//! Tracing subscriber setup
//!
//! The filter defaults to `info` and can be overridden with `RUST_LOG`.
//! Installing a subscriber twice is not an error; the first one wins.

use std::str::FromStr;

use queuesink_domain::QueueSinkError;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info";

/// Output format for log lines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable single-line output
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

impl FromStr for LogFormat {
    type Err = QueueSinkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" | "fmt" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(QueueSinkError::Config(format!("Unknown log format: {other}"))),
        }
    }
}

/// Install the global tracing subscriber.
///
/// Returns `false` when a subscriber was already installed.
pub fn init_tracing(format: LogFormat) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);

    let installed = match format {
        LogFormat::Pretty => builder.try_init().is_ok(),
        LogFormat::Json => builder.json().try_init().is_ok(),
    };

    if installed {
        tracing::debug!(?format, "Tracing subscriber installed");
    }
    installed
}

/// Log the final counts of a writer session with structured fields.
#[inline]
pub fn log_session_summary(result: &queuesink_domain::WriteResult) {
    if result.reject_count > 0 {
        tracing::warn!(
            session = %result.id,
            total = result.total_count,
            success = result.success_count,
            reject = result.reject_count,
            "queue_write_session_partial"
        );
    } else {
        tracing::info!(
            session = %result.id,
            total = result.total_count,
            success = result.success_count,
            "queue_write_session_complete"
        );
    }
}
