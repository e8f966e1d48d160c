//! Logging setup and configuration
//!
//! The console owns the terminal, so log lines go to a daily-rolling file
//! instead of stdout. The returned guard flushes the background writer when
//! dropped and must be held for the lifetime of the process.

use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// File name prefix of the rolling log
pub const LOG_FILE_PREFIX: &str = "monitor-console.log";

/// Default directory for log files
pub fn default_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("monitor-console")
        .join("logs")
}

/// Build the level filter: `RUST_LOG` wins, otherwise `default_level`
pub fn build_filter(default_level: &str) -> crate::Result<EnvFilter> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| crate::Error::Config(format!("Invalid log filter: {}", e)))
}

/// Setup tracing subscriber writing to `log_dir`
pub fn setup_logging(default_level: &str, log_dir: &Path) -> crate::Result<WorkerGuard> {
    let filter = build_filter(default_level)?;

    std::fs::create_dir_all(log_dir)?;
    let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true),
        )
        .try_init()
        .map_err(|e| crate::Error::Other(format!("Logging already initialized: {}", e)))?;

    tracing::debug!("Logging to {}", log_dir.display());
    Ok(guard)
}
