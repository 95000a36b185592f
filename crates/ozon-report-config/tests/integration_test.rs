//! Integration tests for configuration file loading.

use ozon_report_common::test_utils::create_temp_dir;
use ozon_report_config::{AxisRange, Config, ConfigError, ConfigLoader};
use std::fs;
use std::path::PathBuf;

const YAML_CONFIG: &str = r##"
seller:
  client_id: "12345"
  api_key: "seller-key"
ads:
  enabled: false
telegram:
  bot_token: "123:abc"
  chat_id: "-100500"
report:
  days: 14
  output_dir: "out/charts"
chart:
  cpo_range:
    min: 10.0
    max: 90.0
    step: 20.0
logging:
  level: "debug"
"##;

const TOML_CONFIG: &str = r##"
[seller]
client_id = "12345"
api_key = "seller-key"

[ads]
client_id = "perf-id"
client_secret = "perf-secret"
max_campaigns = 5

[telegram]
bot_token = "123:abc"
chat_id = "@ozon_reports"

[chart]
width = 1200
height = 800
"##;

#[test]
fn test_load_yaml_file() {
    let dir = create_temp_dir();
    let path = dir.path().join("config.yaml");
    fs::write(&path, YAML_CONFIG).unwrap();

    let config = ConfigLoader::load_config(&path).unwrap();

    assert_eq!(config.seller.client_id, "12345");
    assert!(!config.ads.enabled);
    assert_eq!(config.chart.cpo_range, AxisRange::new(10.0, 90.0, 20.0));
    assert_eq!(config.logging.level, "debug");
    assert!(config.validate().is_ok());
}

#[test]
fn test_load_toml_file() {
    let dir = create_temp_dir();
    let path = dir.path().join("config.toml");
    fs::write(&path, TOML_CONFIG).unwrap();

    let config = ConfigLoader::load_config(&path).unwrap();

    assert_eq!(config.ads.max_campaigns, 5);
    assert_eq!(config.telegram.chat_id, "@ozon_reports");
    assert_eq!((config.chart.width, config.chart.height), (1200, 800));
    assert_eq!(config.report, Config::default().report);
    assert!(config.validate().is_ok());
}

#[test]
fn test_unsupported_extension() {
    let dir = create_temp_dir();
    let path = dir.path().join("config.ini");
    fs::write(&path, "days=14").unwrap();

    let err = ConfigLoader::load_config(&path).unwrap_err();
    assert!(matches!(err, ConfigError::UnsupportedFormat(ref ext) if ext == "ini"));
}

#[test]
fn test_missing_file() {
    let err = ConfigLoader::load_config(PathBuf::from("/nonexistent/ozon/config.yaml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}

#[test]
fn test_malformed_yaml() {
    let dir = create_temp_dir();
    let path = dir.path().join("config.yml");
    fs::write(&path, "report: [unterminated").unwrap();

    let err = ConfigLoader::load_config(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Yaml(_)));
}

#[test]
fn test_loader_reads_env_file_and_skips_delivery_checks() {
    let dir = create_temp_dir();
    let config_path = dir.path().join("config.yaml");
    fs::write(&config_path, "ads:\n  enabled: false\n").unwrap();
    let env_path = dir.path().join(".env");
    fs::write(
        &env_path,
        "OZON_CLIENT_ID=env-client\nOZON_API_KEY=env-key\n",
    )
    .unwrap();

    let config = ConfigLoader::new()
        .with_config_path(&config_path)
        .with_env_file(&env_path)
        .require_delivery(false)
        .load()
        .unwrap();

    assert_eq!(config.seller.client_id, "env-client");
    assert_eq!(config.seller.api_key, "env-key");
}

#[test]
fn test_loader_rejects_invalid_values() {
    let dir = create_temp_dir();
    let config_path = dir.path().join("config.yaml");
    fs::write(
        &config_path,
        "seller:\n  client_id: \"1\"\n  api_key: \"k\"\nads:\n  enabled: false\nreport:\n  days: 1\n",
    )
    .unwrap();

    let err = ConfigLoader::new()
        .with_config_path(&config_path)
        .require_delivery(false)
        .load()
        .unwrap_err();

    assert!(matches!(err, ConfigError::Validation(_)));
    assert!(err.to_string().contains("report.days"));
}

#[test]
fn test_loader_fails_on_missing_env_file() {
    let dir = create_temp_dir();
    let err = ConfigLoader::new()
        .with_env_file(dir.path().join("missing.env"))
        .load()
        .unwrap_err();

    assert!(matches!(err, ConfigError::EnvFile { .. }));
}

#[test]
fn test_example_config_matches_defaults() {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../config.example.yaml");
    let config = ConfigLoader::load_config(path).unwrap();

    assert_eq!(config, Config::default());
}
