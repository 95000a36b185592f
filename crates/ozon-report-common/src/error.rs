//! Error types and utilities for the report job.

use thiserror::Error;

/// Result type alias for report operations
pub type Result<T> = std::result::Result<T, ReportError>;

/// Main error type for report operations
#[derive(Error, Debug)]
pub enum ReportError {
    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Config {
        /// Human readable description
        message: String,
        /// Underlying cause
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Network related errors (HTTP transport, timeouts)
    #[error("Network error: {message}")]
    Network {
        /// Human readable description
        message: String,
        /// Underlying cause
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Seller analytics API errors
    #[error("Seller API error: {message}")]
    SellerApi {
        /// Human readable description
        message: String,
        /// HTTP status returned by the API, if any
        status_code: Option<u16>,
    },

    /// Performance (advertising) API errors
    #[error("Ads API error: {message}")]
    AdsApi {
        /// Human readable description
        message: String,
        /// HTTP status returned by the API, if any
        status_code: Option<u16>,
    },

    /// Telegram Bot API errors
    #[error("Telegram API error: {message}")]
    Telegram {
        /// Human readable description
        message: String,
        /// `error_code` reported by Telegram, if any
        error_code: Option<u16>,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// CSV decoding errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Chart rendering errors
    #[error("Graph error: {message}")]
    Graph {
        /// Human readable description
        message: String,
        /// Underlying cause
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Validation errors for configuration or data
    #[error("Validation error: {message}")]
    Validation {
        /// Human readable description
        message: String,
        /// Offending field, if known
        field: Option<String>,
    },

    /// Generic error with custom message
    #[error("{message}")]
    Generic {
        /// Human readable description
        message: String,
        /// Underlying cause
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl ReportError {
    /// Create a new generic error with a custom message
    pub fn new(msg: impl Into<String>) -> Self {
        Self::Generic {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new generic error with a custom message and source
    pub fn with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Generic {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new configuration error with source
    pub fn config_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new network error with source
    pub fn network_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Network {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new seller API error
    pub fn seller(msg: impl Into<String>) -> Self {
        Self::SellerApi {
            message: msg.into(),
            status_code: None,
        }
    }

    /// Create a new seller API error with status code
    pub fn seller_with_status(msg: impl Into<String>, status: u16) -> Self {
        Self::SellerApi {
            message: msg.into(),
            status_code: Some(status),
        }
    }

    /// Create a new ads API error
    pub fn ads(msg: impl Into<String>) -> Self {
        Self::AdsApi {
            message: msg.into(),
            status_code: None,
        }
    }

    /// Create a new ads API error with status code
    pub fn ads_with_status(msg: impl Into<String>, status: u16) -> Self {
        Self::AdsApi {
            message: msg.into(),
            status_code: Some(status),
        }
    }

    /// Create a new Telegram API error
    pub fn telegram(msg: impl Into<String>) -> Self {
        Self::Telegram {
            message: msg.into(),
            error_code: None,
        }
    }

    /// Create a new Telegram API error with error code
    pub fn telegram_with_code(msg: impl Into<String>, code: u16) -> Self {
        Self::Telegram {
            message: msg.into(),
            error_code: Some(code),
        }
    }

    /// Create a new graph error
    pub fn graph(msg: impl Into<String>) -> Self {
        Self::Graph {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new graph error with source
    pub fn graph_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Graph {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            field: None,
        }
    }

    /// Create a new validation error with field name
    pub fn validation_field(msg: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            field: Some(field.into()),
        }
    }

    /// HTTP status or API error code attached to this error, if any
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::SellerApi { status_code, .. } | Self::AdsApi { status_code, .. } => *status_code,
            Self::Telegram { error_code, .. } => *error_code,
            _ => None,
        }
    }
}

// Error conversion implementations for external types

/// Convert from reqwest::Error to ReportError
impl From<reqwest::Error> for ReportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::network_with_source("Request timeout", err)
        } else if err.is_connect() {
            Self::network_with_source("Connection failed", err)
        } else if err.is_status() {
            let status_code = err.status().map_or(0, |s| s.as_u16());
            Self::network_with_source(format!("HTTP error: {status_code}"), err)
        } else if err.is_decode() {
            Self::network_with_source("Failed to decode response body", err)
        } else {
            Self::network_with_source("Network request failed", err)
        }
    }
}

#[cfg(feature = "plotters")]
/// Convert from plotters drawing errors to ReportError
impl<T> From<plotters::drawing::DrawingAreaErrorKind<T>> for ReportError
where
    T: std::error::Error + Send + Sync + 'static,
{
    fn from(err: plotters::drawing::DrawingAreaErrorKind<T>) -> Self {
        Self::graph_with_source("Graph rendering failed", err)
    }
}
