//! Configuration loading utilities

use crate::Config;
use ozon_report_common::ReportError;
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Environment variable naming an explicit configuration file.
pub const CONFIG_PATH_ENV: &str = "OZON_REPORT_CONFIG";

/// Files probed in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILES: [&str; 3] = ["config.yaml", "config.yml", "config.toml"];

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error when reading configuration file
    #[error("Failed to read configuration file '{}': {source}", path.display())]
    Io {
        /// File that could not be read
        path: PathBuf,
        /// Underlying cause
        #[source]
        source: std::io::Error,
    },

    /// YAML parsing error
    #[error("Failed to parse YAML configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("Failed to parse TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// File extension is neither YAML nor TOML
    #[error("Unsupported configuration format: '{0}'")]
    UnsupportedFormat(String),

    /// `.env` file could not be loaded
    #[error("Failed to load env file '{}': {source}", path.display())]
    EnvFile {
        /// File that could not be loaded
        path: PathBuf,
        /// Underlying cause
        #[source]
        source: dotenv::Error,
    },

    /// Environment variable parsing error
    #[error("Failed to parse environment variable '{var}': {source}")]
    EnvParse {
        /// Variable name
        var: String,
        /// Underlying cause
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Configuration validation error
    #[error(transparent)]
    Validation(ReportError),
}

impl From<ConfigError> for ReportError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation(inner) => inner,
            other => Self::config(other.to_string()),
        }
    }
}

/// Builder-style loader combining `.env`, a config file and environment overrides.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
    env_file: Option<PathBuf>,
    require_delivery: bool,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Creates a loader that probes the default locations.
    pub const fn new() -> Self {
        Self {
            config_path: None,
            env_file: None,
            require_delivery: true,
        }
    }

    /// Uses an explicit configuration file.
    #[must_use]
    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// Loads variables from this `.env` file instead of `./.env`.
    #[must_use]
    pub fn with_env_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.env_file = Some(path.into());
        self
    }

    /// Whether Telegram credentials must be present (disabled for dry runs).
    #[must_use]
    pub const fn require_delivery(mut self, required: bool) -> Self {
        self.require_delivery = required;
        self
    }

    /// Load configuration: `.env`, then the config file, then environment overrides.
    pub fn load(&self) -> Result<Config, ConfigError> {
        self.load_env_file()?;

        let mut config = match self.resolve_config_path() {
            Some(path) => {
                info!("Loading configuration from {}", path.display());
                Self::load_config(&path)?
            }
            None => {
                debug!("No configuration file found, using defaults");
                Config::default()
            }
        };

        Self::apply_env_overrides(&mut config)?;

        if self.require_delivery {
            config.validate()
        } else {
            config.validate_sources()
        }
        .map_err(ConfigError::Validation)?;

        Ok(config)
    }

    /// Parse a configuration file, choosing YAML or TOML by extension.
    pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();

        match extension.as_str() {
            "yaml" | "yml" => Self::parse_yaml(&content),
            "toml" => Self::parse_toml(&content),
            other => Err(ConfigError::UnsupportedFormat(other.to_string())),
        }
    }

    /// Parse YAML configuration text.
    pub fn parse_yaml(content: &str) -> Result<Config, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Config::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Parse TOML configuration text.
    pub fn parse_toml(content: &str) -> Result<Config, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Apply overrides from the process environment.
    pub fn apply_env_overrides(config: &mut Config) -> Result<(), ConfigError> {
        Self::apply_overrides_from(config, |var| env::var(var).ok())
    }

    /// Apply overrides using `lookup` to read variables. Values are trimmed and
    /// empty values are ignored.
    pub fn apply_overrides_from<F>(config: &mut Config, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| {
            lookup(var)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        // Seller API
        if let Some(v) = get("OZON_CLIENT_ID") {
            config.seller.client_id = v;
        }
        if let Some(v) = get("OZON_API_KEY") {
            config.seller.api_key = v;
        }
        if let Some(v) = get("OZON_SELLER_URL") {
            config.seller.base_url = v;
        }

        // Performance API
        if let Some(v) = get("OZON_PERF_CLIENT_ID") {
            config.ads.client_id = v;
        }
        if let Some(v) = get("OZON_PERF_CLIENT_SECRET") {
            config.ads.client_secret = v;
        }
        if let Some(v) = get("OZON_PERF_BASE_URL") {
            config.ads.base_urls.retain(|url| url != &v);
            config.ads.base_urls.insert(0, v);
        }
        if let Some(v) = get("ADS_ENABLED") {
            config.ads.enabled = parse_bool(&v).ok_or_else(|| ConfigError::EnvParse {
                var: "ADS_ENABLED".to_string(),
                source: format!("expected a boolean, got '{v}'").into(),
            })?;
        }

        // Telegram
        if let Some(v) = get("TG_BOT_TOKEN") {
            config.telegram.bot_token = v;
        }
        if let Some(v) = get("TG_CHAT_ID") {
            config.telegram.chat_id = v;
        }
        if let Some(v) = get("TG_API_URL") {
            config.telegram.api_url = v;
        }

        // Report
        if let Some(v) = get("REPORT_DAYS") {
            config.report.days = v.parse().map_err(|e| ConfigError::EnvParse {
                var: "REPORT_DAYS".to_string(),
                source: Box::new(e),
            })?;
        }
        if let Some(v) = get("REPORT_OUTPUT_DIR") {
            config.report.output_dir = PathBuf::from(v);
        }

        // Logging
        if let Some(v) = get("LOG_LEVEL") {
            config.logging.level = v;
        }
        if let Some(v) = get("LOG_DIR") {
            config.logging.directory = PathBuf::from(v);
        }

        Ok(())
    }

    fn load_env_file(&self) -> Result<(), ConfigError> {
        match &self.env_file {
            Some(path) => {
                dotenv::from_path(path).map_err(|source| ConfigError::EnvFile {
                    path: path.clone(),
                    source,
                })?;
                debug!("Loaded environment from {}", path.display());
            }
            None => {
                if let Ok(path) = dotenv::dotenv() {
                    debug!("Loaded environment from {}", path.display());
                }
            }
        }
        Ok(())
    }

    fn resolve_config_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.config_path {
            return Some(path.clone());
        }
        if let Some(path) = env::var_os(CONFIG_PATH_ENV).filter(|p| !p.is_empty()) {
            return Some(PathBuf::from(path));
        }
        DEFAULT_CONFIG_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
