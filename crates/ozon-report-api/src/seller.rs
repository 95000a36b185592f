//! OZON Seller analytics client
//!
//! Reads daily revenue and ordered units through `POST /v1/analytics/data`.

use crate::models::{AnalyticsRequest, AnalyticsResponse};
use chrono::NaiveDate;
use ozon_report_common::{preview, DailySales, ReportError, ReportWindow, Result};
use ozon_report_config::SellerConfig;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error, info, instrument};

/// Seller analytics API client
#[derive(Debug, Clone)]
pub struct SellerClient {
    client: Client,
    config: SellerConfig,
}

impl SellerClient {
    /// Create a new client with the given configuration
    pub fn new(config: &SellerConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| ReportError::network_with_source("Failed to create HTTP client", e))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    fn analytics_url(&self) -> String {
        format!("{}/v1/analytics/data", self.config.base_url.trim_end_matches('/'))
    }

    /// Fetch revenue and ordered units per day, sorted by date.
    #[instrument(skip(self, window), fields(window = %window))]
    pub async fn fetch_daily_sales(&self, window: &ReportWindow) -> Result<Vec<DailySales>> {
        let url = self.analytics_url();
        let body = AnalyticsRequest::daily_sales(window.date_from, window.date_to, self.config.limit);
        debug!("Requesting analytics from {}", url);

        let response = self
            .client
            .post(&url)
            .header("Client-Id", &self.config.client_id)
            .header("Api-Key", &self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ReportError::network_with_source("Failed to read response body", e))?;

        if !status.is_success() {
            error!("Analytics request failed: {} {}", status, preview(&text, 400));
            return Err(ReportError::seller_with_status(
                format!("analytics returned {status}: {}", preview(&text, 400)),
                status.as_u16(),
            ));
        }

        let parsed: AnalyticsResponse = serde_json::from_str(&text)?;
        let rows = daily_sales_from_response(parsed)?;
        info!("Fetched {} days of sales", rows.len());
        Ok(rows)
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn units_from_metric(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value.round() as u64
    } else {
        0
    }
}

/// Converts analytics rows into [`DailySales`], oldest day first.
pub fn daily_sales_from_response(response: AnalyticsResponse) -> Result<Vec<DailySales>> {
    let mut rows = response
        .result
        .data
        .into_iter()
        .map(|row| -> Result<DailySales> {
            let id = row
                .dimensions
                .first()
                .map(|d| d.id.as_str())
                .ok_or_else(|| ReportError::seller("analytics row without a day dimension"))?;
            let date = NaiveDate::parse_from_str(id, "%Y-%m-%d")
                .map_err(|_| ReportError::seller(format!("invalid day in analytics row: '{id}'")))?;
            let metric = |i: usize| row.metrics.get(i).copied().flatten().unwrap_or(0.0);

            Ok(DailySales::new(date, metric(0), units_from_metric(metric(1))))
        })
        .collect::<Result<Vec<_>>>()?;

    rows.sort_by_key(|row| row.date);
    Ok(rows)
}
