//! Application-wide error types using thiserror.

use ozon_report_common::ReportError;
use ozon_report_config::ConfigError;

/// Main application error type.
#[derive(thiserror::Error, Debug)]
pub enum BotError {
    /// Configuration could not be loaded or is invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Sales could not be fetched; the report cannot be built.
    #[error("Failed to fetch sales: {0}")]
    Sales(#[source] ReportError),

    /// The chart could not be rendered.
    #[error("Failed to render chart: {0}")]
    Chart(#[source] ReportError),

    /// A message or image could not be delivered.
    #[error("Failed to deliver report: {0}")]
    Delivery(#[source] ReportError),

    /// Any other report error.
    #[error(transparent)]
    Report(#[from] ReportError),
}

/// Result type for the bot application.
pub type BotResult<T> = Result<T, BotError>;
