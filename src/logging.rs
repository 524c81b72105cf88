//! Logging configuration using the tracing ecosystem.
//!
//! Every command prints its result on stdout (issue tables, detail text or
//! JSON that may be piped into other tools) and its notifications and errors
//! on stderr. Log records therefore never go to either stream: they are
//! written to a daily rotating file under the data directory. The level is
//! taken from `RUST_LOG`.

use std::path::PathBuf;

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

/// Default log filter if RUST_LOG is not set.
const DEFAULT_LOG_FILTER: &str = "lazyissues=info,warn";

/// File name prefix of the rotated log files.
const LOG_FILE_NAME: &str = "lazyissues.log";

/// Initialize the logging system.
///
/// Logs are stored in the platform-specific local data directory:
/// - Linux: `~/.local/share/lazyissues/logs/`
/// - macOS: `~/Library/Application Support/lazyissues/logs/`
/// - Windows: `C:\Users\<User>\AppData\Local\lazyissues\logs\`
///
/// Configure the level via `RUST_LOG`, e.g. `RUST_LOG=lazyissues=debug`.
///
/// # Errors
///
/// Returns an error if the log directory cannot be determined or created,
/// or if a global subscriber is already set.
pub fn init() -> anyhow::Result<()> {
    let log_dir = get_log_directory()?;
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, LOG_FILE_NAME);

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let subscriber = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true),
        )
        .with(filter);

    tracing::subscriber::set_global_default(subscriber)?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "LazyIssues starting up");
    tracing::debug!(log_dir = %log_dir.display(), "Log directory");

    Ok(())
}

fn get_log_directory() -> anyhow::Result<PathBuf> {
    let base_dir = dirs::data_local_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine local data directory"))?;

    Ok(base_dir.join("lazyissues").join("logs"))
}

/// Get the path where logs are stored, for display to users.
pub fn log_directory() -> Option<PathBuf> {
    get_log_directory().ok()
}

/// Log application shutdown.
pub fn shutdown() {
    tracing::info!("LazyIssues shutting down");
}
