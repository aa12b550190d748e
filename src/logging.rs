//! Logging setup for host applications.
//!
//! Initializes a global tracing subscriber writing to stdout and to a log
//! file under the platform logs directory, with a session separator appended
//! on every launch.

use std::fs::OpenOptions;
use std::io::Write;
use std::sync::OnceLock;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;

use crate::paths;

const LOG_FILE_NAME: &str = "mapwright.log";

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Set up file and stdout logging.
///
/// Returns `None` (and logs nothing) when the logs directory cannot be
/// created; callers can keep running without file logging. Subsequent calls
/// are no-ops.
pub fn init() -> Option<&'static WorkerGuard> {
    if let Some(guard) = LOG_GUARD.get() {
        return Some(guard);
    }

    let logs_dir = paths::logs_dir();
    if std::fs::create_dir_all(&logs_dir).is_err() {
        eprintln!("Failed to create logs directory");
        return None;
    }

    let log_file_path = logs_dir.join(LOG_FILE_NAME);

    // Append session separator to existing log file
    if let Ok(mut file) = OpenOptions::new().append(true).open(&log_file_path) {
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
        let separator = "=".repeat(80);
        let _ = writeln!(
            file,
            "\n\n{}\n=== New Session Started at {} ===\n{}\n",
            separator, timestamp, separator
        );
    }

    // Set up file appender
    let file_appender = tracing_appender::rolling::never(&logs_dir, LOG_FILE_NAME);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // Configure file layer (no ANSI colors for file output)
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_level(true);

    // Configure stdout layer (with ANSI colors)
    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true)
        .with_target(true)
        .with_level(true);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,mapwright=debug"));

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stdout_layer)
        .init();

    let _ = LOG_GUARD.set(guard);
    LOG_GUARD.get()
}
