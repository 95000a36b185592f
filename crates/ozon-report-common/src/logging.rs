//! Structured logging infrastructure for the report job.
//!
//! Every run writes to stdout and appends to a log file so cron invocations
//! leave a trail even when their stdout is discarded.

use crate::error::{ReportError, Result};
use serde::{Deserialize, Serialize};
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing::Subscriber;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Configuration for the logging system
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "ozon_report_api=trace")
    pub level: String,
    /// Directory holding the log file
    pub directory: PathBuf,
    /// Log file name inside `directory`
    pub file_name: String,
    /// Whether to colorize console output; defaults to whether stdout is a terminal
    pub ansi: bool,
    /// Whether to include target module information
    pub include_targets: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: PathBuf::from("logs"),
            file_name: "ozon_analysis_bot.log".to_string(),
            ansi: std::io::stdout().is_terminal(),
            include_targets: true,
        }
    }
}

impl LoggingConfig {
    /// Full path of the log file
    pub fn file_path(&self) -> PathBuf {
        self.directory.join(&self.file_name)
    }

    /// Builds the level filter, falling back to `info` when the configured
    /// directive does not parse.
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_new(&self.level).unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

/// Builds the console and file subscriber without installing it.
///
/// Useful with [`tracing::subscriber::with_default`] for a scoped phase such
/// as start-up, before the final configuration is known.
pub fn build_subscriber(
    config: &LoggingConfig,
) -> Result<(impl Subscriber + Send + Sync + 'static, WorkerGuard)> {
    std::fs::create_dir_all(&config.directory)?;

    let file_appender = tracing_appender::rolling::never(&config.directory, &config.file_name);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let subscriber = tracing_subscriber::registry()
        .with(config.env_filter())
        .with(
            fmt::layer()
                .with_ansi(config.ansi)
                .with_target(config.include_targets),
        )
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_target(config.include_targets)
                .with_writer(file_writer),
        );

    Ok((subscriber, guard))
}

/// Initialize the tracing subscriber with console and file output.
///
/// The returned guard flushes the file writer when dropped, so the caller
/// must keep it alive until the process is about to exit.
pub fn init_logging(config: &LoggingConfig) -> Result<WorkerGuard> {
    let (subscriber, guard) = build_subscriber(config)?;
    subscriber
        .try_init()
        .map_err(|e| ReportError::config_with_source("Failed to install tracing subscriber", e))?;

    Ok(guard)
}
