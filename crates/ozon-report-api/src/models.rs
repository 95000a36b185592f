//! Request and response models for the OZON APIs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Metrics requested from the analytics endpoint, in response order.
pub const SALES_METRICS: [&str; 2] = ["revenue", "ordered_units"];

/// Campaign state preferred when choosing campaigns for statistics.
pub const CAMPAIGN_STATE_RUNNING: &str = "CAMPAIGN_STATE_RUNNING";

/// Sort clause of an analytics request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortSpec {
    /// Field to sort by.
    pub key: String,
    /// `ASC` or `DESC`.
    pub order: String,
}

/// Body of `POST /v1/analytics/data`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsRequest {
    /// First day, `YYYY-MM-DD`.
    pub date_from: String,
    /// Last day, `YYYY-MM-DD`.
    pub date_to: String,
    /// Requested metrics.
    pub metrics: Vec<String>,
    /// Grouping dimensions.
    pub dimension: Vec<String>,
    /// Row filters (always empty).
    pub filters: Vec<Value>,
    /// Sort clauses.
    pub sort: Vec<SortSpec>,
    /// Maximum rows returned.
    pub limit: u32,
    /// Row offset.
    pub offset: u32,
}

impl AnalyticsRequest {
    /// Daily revenue and ordered units for `date_from..=date_to`, oldest first.
    pub fn daily_sales(date_from: NaiveDate, date_to: NaiveDate, limit: u32) -> Self {
        Self {
            date_from: date_from.format("%Y-%m-%d").to_string(),
            date_to: date_to.format("%Y-%m-%d").to_string(),
            metrics: SALES_METRICS.iter().map(ToString::to_string).collect(),
            dimension: vec!["day".to_string()],
            filters: Vec::new(),
            sort: vec![SortSpec {
                key: "day".to_string(),
                order: "ASC".to_string(),
            }],
            limit,
            offset: 0,
        }
    }
}

/// Analytics response envelope.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalyticsResponse {
    /// Result payload; absent means no rows.
    #[serde(default)]
    pub result: AnalyticsResult,
}

/// Analytics result payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalyticsResult {
    /// One row per dimension value.
    #[serde(default)]
    pub data: Vec<AnalyticsRow>,
}

/// One analytics row.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalyticsRow {
    /// Dimension values; the first is the day.
    #[serde(default)]
    pub dimensions: Vec<Dimension>,
    /// Metric values in request order; `null` reads as 0.
    #[serde(default)]
    pub metrics: Vec<Option<f64>>,
}

/// Dimension value of an analytics row.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Dimension {
    /// Dimension id; for `day` this is the date.
    #[serde(default)]
    pub id: String,
    /// Human readable name.
    #[serde(default)]
    pub name: Option<String>,
}

/// Body of `POST /token`.
#[derive(Debug, Clone, Serialize)]
pub struct TokenRequest<'a> {
    /// OAuth client id.
    pub client_id: &'a str,
    /// OAuth client secret.
    pub client_secret: &'a str,
    /// Always `client_credentials`.
    pub grant_type: &'static str,
}

/// Token endpoint answer.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenResponse {
    /// Bearer token.
    #[serde(default)]
    pub access_token: Option<String>,
    /// Lifetime in seconds.
    #[serde(default)]
    pub expires_in: Option<u64>,
    /// Usually `Bearer`.
    #[serde(default)]
    pub token_type: Option<String>,
}

/// Bearer token together with the base URL that issued it.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    /// Bearer token value.
    pub token: String,
    /// Base URL used for every later Performance API call in the run.
    pub base_url: String,
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Advertising campaign as listed by `GET /campaign`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Campaign {
    /// Campaign id; numbers are kept in their decimal form.
    pub id: Option<String>,
    /// Campaign title.
    pub title: Option<String>,
    /// Campaign state, e.g. `CAMPAIGN_STATE_RUNNING`.
    pub state: Option<String>,
}

impl Campaign {
    /// Whether the campaign is currently running.
    pub fn is_running(&self) -> bool {
        self.state.as_deref() == Some(CAMPAIGN_STATE_RUNNING)
    }

    fn from_value(value: &Value) -> Self {
        let text = |key: &str| match value.get(key) {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        };
        Self {
            id: text("id"),
            title: text("title"),
            state: text("state"),
        }
    }

    /// Reads campaigns from the `list` array, falling back to `result`.
    pub fn list_from_value(value: &Value) -> Vec<Self> {
        ["list", "result"]
            .iter()
            .filter_map(|key| value.get(*key).and_then(Value::as_array))
            .find(|items| !items.is_empty())
            .map(|items| items.iter().map(Self::from_value).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_analytics_request_shape() {
        let from = NaiveDate::from_ymd_opt(2026, 1, 6).unwrap();
        let to = NaiveDate::from_ymd_opt(2026, 1, 19).unwrap();
        let body = serde_json::to_value(AnalyticsRequest::daily_sales(from, to, 1000)).unwrap();

        assert_eq!(
            body,
            json!({
                "date_from": "2026-01-06",
                "date_to": "2026-01-19",
                "metrics": ["revenue", "ordered_units"],
                "dimension": ["day"],
                "filters": [],
                "sort": [{"key": "day", "order": "ASC"}],
                "limit": 1000,
                "offset": 0
            })
        );
    }

    #[test]
    fn test_analytics_response_with_nulls() {
        let response: AnalyticsResponse = serde_json::from_value(json!({
            "result": {
                "data": [
                    {"dimensions": [{"id": "2026-01-19", "name": ""}], "metrics": [null, 5.0]}
                ],
                "totals": [0, 0]
            },
            "timestamp": "2026-01-20 06:00:00"
        }))
        .unwrap();

        assert_eq!(response.result.data.len(), 1);
        assert_eq!(response.result.data[0].metrics, vec![None, Some(5.0)]);

        let empty: AnalyticsResponse = serde_json::from_value(json!({})).unwrap();
        assert!(empty.result.data.is_empty());
    }

    #[test]
    fn test_campaigns_from_list_or_result() {
        let listed = Campaign::list_from_value(&json!({
            "list": [
                {"id": "101", "title": "Brand", "state": "CAMPAIGN_STATE_RUNNING"},
                {"id": 102, "state": "CAMPAIGN_STATE_STOPPED"}
            ]
        }));
        assert_eq!(listed.len(), 2);
        assert!(listed[0].is_running());
        assert_eq!(listed[1].id.as_deref(), Some("102"));

        let result = Campaign::list_from_value(&json!({"result": [{"id": "7"}]}));
        assert_eq!(result.len(), 1);

        assert!(Campaign::list_from_value(&json!({"list": []})).is_empty());
        assert!(Campaign::list_from_value(&json!({"error": "denied"})).is_empty());
    }

    #[test]
    fn test_access_token_debug_hides_token() {
        let token = AccessToken {
            token: "secret-value".to_string(),
            base_url: "https://performance.ozon.ru/api/client".to_string(),
        };
        let debug = format!("{token:?}");
        assert!(!debug.contains("secret-value"));
        assert!(debug.contains("performance.ozon.ru"));
    }
}
