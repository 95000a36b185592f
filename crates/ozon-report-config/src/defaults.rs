//! Default values for every configuration section.

use crate::schema::*;
use std::path::PathBuf;

/// Performance API hosts, most common first.
pub const DEFAULT_ADS_BASE_URLS: [&str; 4] = [
    "https://api-performance.ozon.ru/api/client",
    "https://performance.ozon.ru/api/client",
    "https://performance.ozon.ru/api",
    "https://api-performance.ozon.ru/api",
];

impl Default for SellerConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api-seller.ozon.ru".to_string(),
            client_id: String::new(),
            api_key: String::new(),
            timeout_seconds: 30,
            limit: 1000,
        }
    }
}

impl Default for AdsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_urls: DEFAULT_ADS_BASE_URLS.iter().map(ToString::to_string).collect(),
            client_id: String::new(),
            client_secret: String::new(),
            token_timeout_seconds: 20,
            campaign_timeout_seconds: 20,
            stats_timeout_seconds: 30,
            max_campaigns: 10,
        }
    }
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.telegram.org".to_string(),
            bot_token: String::new(),
            chat_id: String::new(),
            timeout_seconds: 30,
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            days: 14,
            marketplace_label: "OZON".to_string(),
            output_dir: PathBuf::from("out/charts"),
            chart_file_name: "ozon_14d.png".to_string(),
        }
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 1944,
            height: 1080,
            font_family: "sans-serif".to_string(),
            aov_range: AxisRange::new(500.0, 1000.0, 100.0),
            units_range: AxisRange::new(0.0, 500.0, 50.0),
            spend_range: AxisRange::new(0.0, 20000.0, 5000.0),
            cpo_range: AxisRange::new(20.0, 80.0, 10.0),
            aov_color: "#1f77b4".to_string(),
            units_color: "#ff7f0e".to_string(),
            spend_color: "#b9d4e6".to_string(),
            cpo_color: "#f3c74a".to_string(),
            background_color: "#ffffff".to_string(),
        }
    }
}
