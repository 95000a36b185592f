//! Configuration loading before the configured logger exists.

use crate::error::BotResult;
use ozon_report_common::{build_subscriber, LoggingConfig};
use ozon_report_config::{Config, ConfigLoader};
use tracing::error;

/// Logging used while the configuration loads: defaults, with an optional
/// level override from the command line.
pub fn startup_logging(level: Option<&str>) -> LoggingConfig {
    let mut config = LoggingConfig::default();
    if let Some(level) = level {
        config.level = level.to_string();
    }
    config
}

/// Loads the configuration with `startup` logging installed for the duration
/// of the load, so loader messages and load failures reach the log file.
pub fn load_config(loader: &ConfigLoader, startup: &LoggingConfig) -> BotResult<Config> {
    let (subscriber, guard) = build_subscriber(startup)?;

    let loaded = tracing::subscriber::with_default(subscriber, || {
        loader.load().inspect_err(|e| error!("Failed to load configuration: {}", e))
    });
    drop(guard);

    Ok(loaded?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_startup_logging_level_override() {
        assert_eq!(startup_logging(None), LoggingConfig::default());
        assert_eq!(startup_logging(Some("debug")).level, "debug");
    }
}
