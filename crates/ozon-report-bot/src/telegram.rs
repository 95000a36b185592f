//! Telegram Bot API delivery
//!
//! Only the two methods the report needs are implemented: `sendMessage` and
//! `sendPhoto`. The bot token is part of every request URL, so transport
//! errors are stripped of their URL before they reach the logs.

use async_trait::async_trait;
use ozon_report_common::{preview, ReportError, Result};
use ozon_report_config::TelegramConfig;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

#[cfg(test)]
use mockall::automock;

/// Telegram message formatting mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParseMode {
    /// Legacy Markdown (`*bold*`).
    Markdown,
    /// `MarkdownV2`.
    MarkdownV2,
    /// HTML subset.
    #[serde(rename = "HTML")]
    Html,
}

/// Envelope of every Bot API answer.
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramResponse {
    /// Whether the call succeeded.
    pub ok: bool,
    /// Method result on success.
    #[serde(default)]
    pub result: Option<Value>,
    /// Error description on failure.
    #[serde(default)]
    pub description: Option<String>,
    /// Error code on failure.
    #[serde(default)]
    pub error_code: Option<u16>,
}

impl TelegramResponse {
    /// Turns an `ok == false` answer into a [`ReportError::Telegram`].
    pub fn into_result(self) -> Result<Option<Value>> {
        if self.ok {
            return Ok(self.result);
        }
        let description = self
            .description
            .unwrap_or_else(|| "request was not successful".to_string());
        Err(match self.error_code {
            Some(code) => ReportError::telegram_with_code(description, code),
            None => ReportError::telegram(description),
        })
    }
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parse_mode: Option<ParseMode>,
}

/// Delivery of the report message and chart.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Sends a text message.
    async fn send_text(&self, text: &str, parse_mode: Option<ParseMode>) -> Result<()>;

    /// Sends an image file with a caption.
    async fn send_image(&self, path: &Path, caption: &str) -> Result<()>;
}

/// Telegram Bot API client
#[derive(Debug, Clone)]
pub struct TelegramClient {
    client: Client,
    config: TelegramConfig,
}

impl TelegramClient {
    /// Create a new client with the given configuration
    pub fn new(config: &TelegramConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| ReportError::network_with_source("Failed to create HTTP client", e))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{method}",
            self.config.api_url.trim_end_matches('/'),
            self.config.bot_token
        )
    }

    /// Send a text message to the configured chat.
    #[instrument(skip(self, text), fields(chars = text.chars().count()))]
    pub async fn send_message(&self, text: &str, parse_mode: Option<ParseMode>) -> Result<()> {
        let body = SendMessageRequest {
            chat_id: &self.config.chat_id,
            text,
            parse_mode,
        };

        let response = self
            .client
            .post(self.method_url("sendMessage"))
            .json(&body)
            .send()
            .await
            .map_err(|e| ReportError::from(e.without_url()))?;

        Self::check_response(response).await?;
        info!("Message sent");
        Ok(())
    }

    /// Send a PNG image to the configured chat.
    #[instrument(skip(self, caption), fields(path = %path.display()))]
    pub async fn send_photo(&self, path: &Path, caption: &str) -> Result<()> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("chart.png")
            .to_string();
        debug!("Uploading {} ({} bytes)", file_name, bytes.len());

        let photo = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("image/png")
            .map_err(|e| ReportError::telegram(format!("invalid photo part: {}", e.without_url())))?;
        let form = Form::new()
            .text("chat_id", self.config.chat_id.clone())
            .text("caption", caption.to_string())
            .part("photo", photo);

        let response = self
            .client
            .post(self.method_url("sendPhoto"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| ReportError::from(e.without_url()))?;

        Self::check_response(response).await?;
        info!("Photo sent");
        Ok(())
    }

    async fn check_response(response: Response) -> Result<Option<Value>> {
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ReportError::network_with_source("Failed to read response body", e.without_url()))?;

        match serde_json::from_str::<TelegramResponse>(&text) {
            Ok(parsed) => parsed.into_result(),
            Err(_) if !status.is_success() => Err(ReportError::telegram_with_code(
                format!("HTTP {status}: {}", preview(&text, 200)),
                status.as_u16(),
            )),
            Err(e) => Err(ReportError::telegram(format!("unexpected response: {e}"))),
        }
    }
}

#[async_trait]
impl Notifier for TelegramClient {
    async fn send_text(&self, text: &str, parse_mode: Option<ParseMode>) -> Result<()> {
        self.send_message(text, parse_mode).await
    }

    async fn send_image(&self, path: &Path, caption: &str) -> Result<()> {
        self.send_photo(path, caption).await
    }
}

/// Prints the report instead of sending it.
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunNotifier;

#[async_trait]
impl Notifier for DryRunNotifier {
    async fn send_text(&self, text: &str, parse_mode: Option<ParseMode>) -> Result<()> {
        info!("Dry run, message not sent (parse mode {:?})", parse_mode);
        println!("{text}");
        Ok(())
    }

    async fn send_image(&self, path: &Path, _caption: &str) -> Result<()> {
        info!("Dry run, chart not sent: {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_send_message_body() {
        let body = SendMessageRequest {
            chat_id: "-100500",
            text: "*Отчет*",
            parse_mode: Some(ParseMode::Markdown),
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"chat_id": "-100500", "text": "*Отчет*", "parse_mode": "Markdown"})
        );

        let plain = SendMessageRequest {
            chat_id: "-100500",
            text: "OZON: мало данных для отчёта",
            parse_mode: None,
        };
        assert!(serde_json::to_value(&plain).unwrap().get("parse_mode").is_none());
        assert_eq!(serde_json::to_value(ParseMode::Html).unwrap(), json!("HTML"));
    }

    #[test]
    fn test_response_ok() {
        let response: TelegramResponse =
            serde_json::from_value(json!({"ok": true, "result": {"message_id": 42}})).unwrap();
        let result = response.into_result().unwrap().unwrap();
        assert_eq!(result["message_id"], 42);
    }

    #[test]
    fn test_response_error() {
        let response: TelegramResponse = serde_json::from_value(json!({
            "ok": false,
            "error_code": 400,
            "description": "Bad Request: chat not found"
        }))
        .unwrap();

        let err = response.into_result().unwrap_err();
        assert_eq!(err.status_code(), Some(400));
        assert!(err.to_string().contains("chat not found"));
    }

    #[test]
    fn test_method_url() {
        let config = TelegramConfig {
            bot_token: "123:abc".to_string(),
            chat_id: "-100500".to_string(),
            ..TelegramConfig::default()
        };
        let client = TelegramClient::new(&config).unwrap();
        assert_eq!(
            client.method_url("sendPhoto"),
            "https://api.telegram.org/bot123:abc/sendPhoto"
        );
    }

    #[test]
    fn test_dry_run_notifier_accepts_everything() {
        let notifier = DryRunNotifier;
        tokio_test::block_on(notifier.send_text("*Отчет*", Some(ParseMode::Markdown))).unwrap();
        tokio_test::block_on(notifier.send_image(Path::new("out/charts/ozon_14d.png"), ""))
            .unwrap();
    }
}
