//! OZON Performance (advertising) API client
//!
//! Authentication uses OAuth client credentials. The Performance API is served
//! from several hosts and path prefixes, so [`PerformanceClient::authenticate`]
//! walks the configured base URLs and keeps the first one that issues a token.

use crate::models::{AccessToken, Campaign, TokenRequest, TokenResponse};
use crate::spend::{parse_spend_csv, parse_spend_json};
use ozon_report_common::{preview, AdSpendByDay, ReportError, ReportWindow, Result};
use ozon_report_config::AdsConfig;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

/// Primary daily statistics endpoint.
const CAMPAIGN_DAILY_PATH: &str = "statistics/campaign/daily";

/// Fallback daily statistics endpoint.
const DAILY_PATH: &str = "statistics/daily";

/// Performance API client
#[derive(Debug, Clone)]
pub struct PerformanceClient {
    client: Client,
    config: AdsConfig,
}

impl PerformanceClient {
    /// Create a new client with the given configuration
    pub fn new(config: &AdsConfig) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| ReportError::network_with_source("Failed to create HTTP client", e))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// Request a token from each candidate base URL until one succeeds.
    #[instrument(skip(self))]
    pub async fn authenticate(&self) -> Result<AccessToken> {
        if self.config.client_id.trim().is_empty() || self.config.client_secret.trim().is_empty() {
            return Err(ReportError::config(
                "OZON_PERF_CLIENT_ID and OZON_PERF_CLIENT_SECRET must be set",
            ));
        }

        let mut last_error = None;
        for base in &self.config.base_urls {
            let base = base.trim_end_matches('/');
            match self.request_token(base).await {
                Ok(token) => {
                    info!("Token issued by {}", base);
                    return Ok(AccessToken {
                        token,
                        base_url: base.to_string(),
                    });
                }
                Err(e) => {
                    warn!("Token request to {} failed: {}", base, e);
                    last_error = Some(e);
                }
            }
        }

        let last = last_error.map_or_else(|| "no base URLs configured".to_string(), |e| e.to_string());
        error!("No base URL issued a token, last error: {}", last);
        Err(ReportError::ads(format!(
            "failed to obtain an access token; last error: {last}"
        )))
    }

    async fn request_token(&self, base: &str) -> Result<String> {
        let body = TokenRequest {
            client_id: &self.config.client_id,
            client_secret: &self.config.client_secret,
            grant_type: "client_credentials",
        };

        let response = self
            .client
            .post(format!("{base}/token"))
            .header(ACCEPT, "application/json")
            .timeout(Duration::from_secs(self.config.token_timeout_seconds))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = read_body(response).await?;
        if status != StatusCode::OK {
            return Err(ReportError::ads_with_status(
                format!("token endpoint returned {status}: {}", preview(&text, 200)),
                status.as_u16(),
            ));
        }

        let parsed: TokenResponse = serde_json::from_str(&text).map_err(|_| {
            ReportError::ads(format!("token response is not JSON: {}", preview(&text, 200)))
        })?;

        parsed
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ReportError::ads(format!("no access_token in {}", preview(&text, 200))))
    }

    /// List the advertiser's campaigns.
    #[instrument(skip(self, token), fields(base = %token.base_url))]
    pub async fn list_campaigns(&self, token: &AccessToken) -> Result<Vec<Campaign>> {
        let response = self
            .client
            .get(format!("{}/campaign", token.base_url))
            .bearer_auth(&token.token)
            .header(ACCEPT, "application/json")
            .timeout(Duration::from_secs(self.config.campaign_timeout_seconds))
            .send()
            .await?;

        let status = response.status();
        let text = read_body(response).await?;
        if status != StatusCode::OK {
            return Err(ReportError::ads_with_status(
                format!("campaign list returned {status}: {}", preview(&text, 400)),
                status.as_u16(),
            ));
        }

        let value = parse_json_body(&text, "campaign list")?;
        let campaigns = Campaign::list_from_value(&value);
        debug!("Listed {} campaigns", campaigns.len());
        Ok(campaigns)
    }

    /// Daily spend for `campaign_ids`, falling back to the general statistics endpoint.
    #[instrument(skip(self, token, campaign_ids, window), fields(campaigns = campaign_ids.len(), window = %window))]
    pub async fn fetch_daily_statistics(
        &self,
        token: &AccessToken,
        campaign_ids: &[String],
        window: &ReportWindow,
    ) -> Result<AdSpendByDay> {
        let params = statistics_query(campaign_ids, window);

        let mut response = self.get_statistics(token, CAMPAIGN_DAILY_PATH, &params).await?;
        if response.status() != StatusCode::OK {
            info!(
                "{} returned {}, trying {}",
                CAMPAIGN_DAILY_PATH,
                response.status(),
                DAILY_PATH
            );
            response = self.get_statistics(token, DAILY_PATH, &params).await?;
        }

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let text = read_body(response).await?;

        if status != StatusCode::OK {
            return Err(ReportError::ads_with_status(
                format!("statistics returned {status}: {}", preview(&text, 400)),
                status.as_u16(),
            ));
        }

        let spend = if is_csv_content_type(&content_type) {
            let spend = parse_spend_csv(&text)?;
            info!("CSV statistics covering {} days", spend.len());
            spend
        } else {
            let spend = parse_spend_json(&parse_json_body(&text, "statistics")?);
            info!("JSON statistics covering {} days", spend.len());
            spend
        };

        Ok(spend)
    }

    /// Authenticate, pick campaigns and collect spend per day for `window`.
    #[instrument(skip(self, window), fields(window = %window))]
    pub async fn fetch_spend_by_day(&self, window: &ReportWindow) -> Result<AdSpendByDay> {
        let token = self.authenticate().await?;
        let campaigns = self.list_campaigns(&token).await?;
        let ids = select_campaign_ids(&campaigns, self.config.max_campaigns);

        if ids.is_empty() {
            info!("No campaigns found, ad spend is empty");
            return Ok(AdSpendByDay::new());
        }

        self.fetch_daily_statistics(&token, &ids, window).await
    }

    async fn get_statistics(
        &self,
        token: &AccessToken,
        path: &str,
        params: &[(&'static str, String)],
    ) -> Result<Response> {
        Ok(self
            .client
            .get(format!("{}/{path}", token.base_url))
            .bearer_auth(&token.token)
            .header(ACCEPT, "application/json")
            .query(params)
            .timeout(Duration::from_secs(self.config.stats_timeout_seconds))
            .send()
            .await?)
    }
}

async fn read_body(response: Response) -> Result<String> {
    response
        .text()
        .await
        .map_err(|e| ReportError::network_with_source("Failed to read response body", e))
}

fn parse_json_body(text: &str, context: &str) -> Result<Value> {
    if text.trim().is_empty() {
        return Err(ReportError::ads(format!("empty {context} response")));
    }
    serde_json::from_str(text).map_err(|_| {
        ReportError::ads(format!("{context} response is not JSON: {}", preview(text, 400)))
    })
}

/// Whether a `Content-Type` value announces a CSV body.
pub fn is_csv_content_type(content_type: &str) -> bool {
    let content_type = content_type.to_ascii_lowercase();
    content_type.contains("text/csv") || content_type.contains("application/csv")
}

/// Query string for the statistics endpoints: one `campaign_ids` per id, then the window.
pub fn statistics_query(campaign_ids: &[String], window: &ReportWindow) -> Vec<(&'static str, String)> {
    campaign_ids
        .iter()
        .map(|id| ("campaign_ids", id.clone()))
        .chain([
            ("date_from", window.date_from.format("%Y-%m-%d").to_string()),
            ("date_to", window.date_to.format("%Y-%m-%d").to_string()),
        ])
        .collect()
}

/// Running campaigns when there are any, otherwise all; at most `max` ids.
pub fn select_campaign_ids(campaigns: &[Campaign], max: usize) -> Vec<String> {
    let any_running = campaigns.iter().any(Campaign::is_running);

    campaigns
        .iter()
        .filter(|c| !any_running || c.is_running())
        .filter_map(|c| c.id.clone())
        .take(max)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CAMPAIGN_STATE_RUNNING;
    use ozon_report_common::test_utils::date;

    fn campaign(id: Option<&str>, state: &str) -> Campaign {
        Campaign {
            id: id.map(ToString::to_string),
            title: None,
            state: Some(state.to_string()),
        }
    }

    #[test]
    fn test_select_prefers_running() {
        let campaigns = vec![
            campaign(Some("1"), "CAMPAIGN_STATE_STOPPED"),
            campaign(Some("2"), CAMPAIGN_STATE_RUNNING),
            campaign(None, CAMPAIGN_STATE_RUNNING),
            campaign(Some("3"), CAMPAIGN_STATE_RUNNING),
        ];
        assert_eq!(select_campaign_ids(&campaigns, 10), vec!["2", "3"]);
    }

    #[test]
    fn test_select_falls_back_to_all() {
        let campaigns = vec![
            campaign(Some("1"), "CAMPAIGN_STATE_STOPPED"),
            campaign(Some("2"), "CAMPAIGN_STATE_INACTIVE"),
        ];
        assert_eq!(select_campaign_ids(&campaigns, 10), vec!["1", "2"]);
        assert!(select_campaign_ids(&[], 10).is_empty());
    }

    #[test]
    fn test_select_caps_ids() {
        let campaigns: Vec<Campaign> = (0..25)
            .map(|i| campaign(Some(&i.to_string()), CAMPAIGN_STATE_RUNNING))
            .collect();
        let ids = select_campaign_ids(&campaigns, 10);
        assert_eq!(ids.len(), 10);
        assert_eq!(ids[0], "0");
        assert_eq!(ids[9], "9");
    }

    #[test]
    fn test_statistics_query_repeats_campaign_ids() {
        let window = ReportWindow::new(date(2026, 1, 6), date(2026, 1, 19)).unwrap();
        let query = statistics_query(&["101".to_string(), "102".to_string()], &window);
        assert_eq!(
            query,
            vec![
                ("campaign_ids", "101".to_string()),
                ("campaign_ids", "102".to_string()),
                ("date_from", "2026-01-06".to_string()),
                ("date_to", "2026-01-19".to_string()),
            ]
        );
    }

    #[test]
    fn test_csv_content_type() {
        assert!(is_csv_content_type("text/csv; charset=utf-8"));
        assert!(is_csv_content_type("Application/CSV"));
        assert!(!is_csv_content_type("application/json"));
        assert!(!is_csv_content_type(""));
    }

    #[test]
    fn test_parse_json_body() {
        assert!(parse_json_body("{\"list\": []}", "campaign list").is_ok());
        let err = parse_json_body("<html>redirect</html>", "campaign list").unwrap_err();
        assert!(err.to_string().contains("not JSON"));
        assert!(parse_json_body("  ", "statistics").is_err());
    }

    #[tokio::test]
    async fn test_authenticate_requires_credentials() {
        let client = PerformanceClient::new(&AdsConfig::default()).unwrap();
        let err = client.authenticate().await.unwrap_err();
        assert!(matches!(err, ReportError::Config { .. }));
    }
}
