//! Configuration schema definitions using serde.

use crate::validator::{
    validate_axis, validate_hex_color, validate_non_empty, validate_range, validate_url,
};
use ozon_report_common::{LoggingConfig, ReportError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure for the report job.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Seller analytics API configuration.
    pub seller: SellerConfig,
    /// Performance (advertising) API configuration.
    pub ads: AdsConfig,
    /// Telegram delivery configuration.
    pub telegram: TelegramConfig,
    /// Report contents configuration.
    pub report: ReportConfig,
    /// Chart rendering configuration.
    pub chart: ChartConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Seller analytics API configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SellerConfig {
    /// Seller API base URL.
    pub base_url: String,
    /// Value of the `Client-Id` header.
    pub client_id: String,
    /// Value of the `Api-Key` header.
    pub api_key: String,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
    /// Maximum number of rows requested from the analytics endpoint.
    pub limit: u32,
}

/// Performance (advertising) API configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdsConfig {
    /// Whether ad spend is fetched at all.
    pub enabled: bool,
    /// Candidate base URLs, tried in order when requesting a token.
    pub base_urls: Vec<String>,
    /// OAuth client id.
    pub client_id: String,
    /// OAuth client secret.
    pub client_secret: String,
    /// Token request timeout in seconds.
    pub token_timeout_seconds: u64,
    /// Campaign list request timeout in seconds.
    pub campaign_timeout_seconds: u64,
    /// Statistics request timeout in seconds.
    pub stats_timeout_seconds: u64,
    /// Maximum number of campaign ids sent to the statistics endpoint.
    pub max_campaigns: usize,
}

/// Telegram Bot API configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelegramConfig {
    /// Bot API base URL.
    pub api_url: String,
    /// Bot token.
    pub bot_token: String,
    /// Target chat id (numeric id or `@channel`).
    pub chat_id: String,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

/// Report contents configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Number of trailing days covered by the report.
    pub days: u32,
    /// Marketplace label used in the message and chart title.
    pub marketplace_label: String,
    /// Directory receiving the rendered chart.
    pub output_dir: PathBuf,
    /// File name of the rendered chart.
    pub chart_file_name: String,
}

/// Value range and tick step of one chart axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisRange {
    /// Lower bound.
    pub min: f64,
    /// Upper bound; raised automatically when the data exceeds it.
    pub max: f64,
    /// Distance between major ticks.
    pub step: f64,
}

impl AxisRange {
    /// Creates a new axis range.
    pub const fn new(min: f64, max: f64, step: f64) -> Self {
        Self { min, max, step }
    }
}

/// Chart rendering configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Font family for all text.
    pub font_family: String,
    /// Average order value axis (top panel, left).
    pub aov_range: AxisRange,
    /// Units axis (top panel, right).
    pub units_range: AxisRange,
    /// Ad spend axis (bottom panel, left).
    pub spend_range: AxisRange,
    /// Cost per order axis (bottom panel, right).
    pub cpo_range: AxisRange,
    /// Average order value bar color.
    pub aov_color: String,
    /// Units line color.
    pub units_color: String,
    /// Ad spend bar color.
    pub spend_color: String,
    /// Cost per order bar color.
    pub cpo_color: String,
    /// Background color.
    pub background_color: String,
}

impl ReportConfig {
    /// Full path of the rendered chart.
    pub fn chart_path(&self) -> PathBuf {
        self.output_dir.join(&self.chart_file_name)
    }
}

impl Config {
    /// Validates everything, including the Telegram delivery settings.
    pub fn validate(&self) -> Result<(), ReportError> {
        self.validate_sources()?;
        self.validate_delivery()
    }

    /// Validates the data sources, report and chart sections.
    pub fn validate_sources(&self) -> Result<(), ReportError> {
        validate_url(&self.seller.base_url, "seller.base_url")?;
        validate_non_empty(&self.seller.client_id, "seller.client_id")?;
        validate_non_empty(&self.seller.api_key, "seller.api_key")?;
        validate_range(self.seller.timeout_seconds, 1, 300, "seller.timeout_seconds")?;
        validate_range(u64::from(self.seller.limit), 1, 1000, "seller.limit")?;

        if self.ads.enabled {
            if self.ads.base_urls.is_empty() {
                return Err(ReportError::validation_field(
                    "at least one base URL is required when ads are enabled",
                    "ads.base_urls",
                ));
            }
            for url in &self.ads.base_urls {
                validate_url(url, "ads.base_urls")?;
            }
            validate_range(self.ads.max_campaigns as u64, 1, 100, "ads.max_campaigns")?;
            validate_range(self.ads.token_timeout_seconds, 1, 300, "ads.token_timeout_seconds")?;
            validate_range(
                self.ads.campaign_timeout_seconds,
                1,
                300,
                "ads.campaign_timeout_seconds",
            )?;
            validate_range(self.ads.stats_timeout_seconds, 1, 300, "ads.stats_timeout_seconds")?;
        }

        validate_range(u64::from(self.report.days), 2, 90, "report.days")?;
        validate_non_empty(&self.report.chart_file_name, "report.chart_file_name")?;

        validate_range(u64::from(self.chart.width), 100, 8000, "chart.width")?;
        validate_range(u64::from(self.chart.height), 100, 8000, "chart.height")?;
        validate_axis(&self.chart.aov_range, "chart.aov_range")?;
        validate_axis(&self.chart.units_range, "chart.units_range")?;
        validate_axis(&self.chart.spend_range, "chart.spend_range")?;
        validate_axis(&self.chart.cpo_range, "chart.cpo_range")?;
        validate_hex_color(&self.chart.aov_color, "chart.aov_color")?;
        validate_hex_color(&self.chart.units_color, "chart.units_color")?;
        validate_hex_color(&self.chart.spend_color, "chart.spend_color")?;
        validate_hex_color(&self.chart.cpo_color, "chart.cpo_color")?;
        validate_hex_color(&self.chart.background_color, "chart.background_color")?;

        Ok(())
    }

    /// Validates the Telegram delivery settings.
    pub fn validate_delivery(&self) -> Result<(), ReportError> {
        validate_url(&self.telegram.api_url, "telegram.api_url")?;
        validate_non_empty(&self.telegram.bot_token, "telegram.bot_token")?;
        validate_non_empty(&self.telegram.chat_id, "telegram.chat_id")?;
        validate_range(self.telegram.timeout_seconds, 1, 300, "telegram.timeout_seconds")
    }
}
