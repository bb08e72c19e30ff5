//! Tracing setup shared by the blastscope entry points.
//!
//! Every component logs to its own daily-rolling file under
//! `~/.blastscope/logs`; the CLI can mirror events to stderr as well.

use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Debug, Clone, Copy)]
pub struct LogOptions {
    pub to_stderr: bool,
    /// Used when `RUST_LOG` is unset.
    pub default_level: &'static str,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            to_stderr: false,
            default_level: "info",
        }
    }
}

pub fn log_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".blastscope")
        .join("logs")
}

/// Install the global subscriber. The returned guard flushes the file
/// writer on drop and must be held for the life of the process.
pub fn init_logging(component: &str, options: LogOptions) -> WorkerGuard {
    let dir = log_dir();
    let _ = std::fs::create_dir_all(&dir);

    // e.g. cli.log.2026-10-16
    let (file_writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(&dir, component));

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(options.default_level));

    let stderr_layer = options.to_stderr.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .with_target(false)
    });

    let result = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(file_writer)
                .with_ansi(false)
                .with_target(true),
        )
        .with(stderr_layer)
        .try_init();

    if let Err(e) = result {
        eprintln!("logging already initialized: {}", e);
    }

    guard
}
