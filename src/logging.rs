//! Logging configuration and initialization for kindsearch.
//!
//! Provides stderr logging and optional rolling file output.

use crate::config::LoggingConfig;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Guard that must be held for the lifetime of the application.
/// When dropped, flushes any pending log writes.
#[must_use = "Dropping this guard will stop logging - keep it alive for the program's lifetime"]
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
    _stderr_guard: Option<WorkerGuard>,
}

/// Initialize the logging subsystem based on configuration.
///
/// Returns a guard that must be kept alive for the duration of the program.
pub fn init_logging(config: &LoggingConfig, root: &Path) -> Result<LoggingGuard> {
    let mut file_guard = None;
    let mut stderr_guard = None;

    let file_layer = if config.enabled {
        let log_dir = resolve_log_dir(&config.directory, root);
        std::fs::create_dir_all(&log_dir)
            .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;

        let appender =
            RollingFileAppender::new(parse_rotation(&config.rotation), &log_dir, &config.file_prefix);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        file_guard = Some(guard);

        Some(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .with_filter(parse_level(&config.level)),
        )
    } else {
        None
    };

    let stderr_layer = if config.stderr {
        let (writer, guard) = tracing_appender::non_blocking(std::io::stderr());
        stderr_guard = Some(guard);

        Some(
            fmt::layer()
                .with_writer(writer)
                .with_target(false)
                .with_filter(stderr_filter(&config.level)),
        )
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .context("Failed to initialize logging subscriber")?;

    Ok(LoggingGuard {
        _file_guard: file_guard,
        _stderr_guard: stderr_guard,
    })
}

fn resolve_log_dir(directory: &Path, root: &Path) -> PathBuf {
    if directory.is_absolute() {
        directory.to_path_buf()
    } else {
        root.join(directory)
    }
}

/// `RUST_LOG` wins; otherwise the configured level applies to this crate.
fn stderr_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| parse_level(level))
}

fn parse_level(level: &str) -> EnvFilter {
    let level_lower = level.to_lowercase();
    let level_str = match level_lower.as_str() {
        "trace" => "kindsearch=trace",
        "debug" => "kindsearch=debug",
        "info" => "kindsearch=info",
        "warn" => "kindsearch=warn",
        "error" => "kindsearch=error",
        _ => {
            eprintln!("Warning: Unknown log level '{}', defaulting to 'info'", level);
            "kindsearch=info"
        }
    };
    EnvFilter::new(level_str)
}

fn parse_rotation(rotation: &str) -> Rotation {
    let rotation_lower = rotation.to_lowercase();
    match rotation_lower.as_str() {
        "hourly" => Rotation::HOURLY,
        "daily" => Rotation::DAILY,
        "minutely" => Rotation::MINUTELY,
        "never" => Rotation::NEVER,
        _ => {
            eprintln!(
                "Warning: Unknown rotation strategy '{}', defaulting to 'daily'",
                rotation
            );
            Rotation::DAILY
        }
    }
}
