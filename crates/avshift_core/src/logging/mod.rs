//! Logging infrastructure for avshift.
//!
//! This module provides:
//! - Per-job loggers with optional file + callback dual output
//! - Compact mode that keeps captured tool output out of the way
//! - Tail buffer for error diagnosis
//! - Integration with the `tracing` ecosystem
//!
//! # Example
//!
//! ```no_run
//! use avshift_core::logging::{JobLogger, LogConfig};
//!
//! let logger = JobLogger::new("clip_p0d5_1234.mp4", Some("/path/to/logs".as_ref()), LogConfig::default(), None).unwrap();
//!
//! logger.phase("Shift");
//! logger.command("ffmpeg -i clip.mp4 ...");
//! logger.success("Wrote clip_p0d5_1234.mp4");
//! ```

mod job_logger;
mod types;

pub use job_logger::JobLogger;
pub use types::{LogConfig, LogLevel, LogSink, MessagePrefix};

use std::path::Path;

pub use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize global tracing subscriber for application-wide logging.
///
/// This sets up a subscriber that:
/// - Respects RUST_LOG environment variable
/// - Falls back to the provided default level
/// - Outputs to stderr
///
/// Should be called once at application startup.
pub fn init_tracing(default_level: LogLevel) {
    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .with(env_filter(default_level))
        .try_init();
}

/// Initialize tracing with an additional daily-rolling log file.
///
/// The returned guard must be held for the lifetime of the program;
/// dropping it flushes and stops the background file writer.
pub fn init_tracing_with_file(default_level: LogLevel, logs_dir: &Path) -> Option<WorkerGuard> {
    if let Err(e) = std::fs::create_dir_all(logs_dir) {
        init_tracing(default_level);
        tracing::warn!(
            "Could not create logs folder {}: {}. Logging to stderr only.",
            logs_dir.display(),
            e
        );
        return None;
    }

    let appender = tracing_appender::rolling::daily(logs_dir, "avshift.log");
    let (file_writer, guard) = tracing_appender::non_blocking(appender);

    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .with(fmt::layer().with_writer(file_writer).with_ansi(false))
        .with(env_filter(default_level))
        .try_init();

    Some(guard)
}

/// Initialize tracing for tests (only logs warnings and above).
#[cfg(test)]
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_test_writer()
        .try_init();
}

fn env_filter(default_level: LogLevel) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_to_filter_str(default_level)))
}

/// Convert LogLevel to filter string.
fn level_to_filter_str(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Trace => "trace",
        LogLevel::Debug => "debug",
        LogLevel::Info => "info",
        LogLevel::Warn => "warn",
        LogLevel::Error => "error",
    }
}
