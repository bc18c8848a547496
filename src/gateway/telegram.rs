use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::app::ports::NotificationSink;
use crate::config::BotConfig;
use crate::error::{AppError, Result};

const API_BASE: &str = "https://api.telegram.org";

/// Notification sink backed by the Telegram Bot API. One instance per bot
/// and channel; messages use the legacy Markdown parse mode.
pub struct TelegramNotifier {
    client: reqwest::Client,
    config: BotConfig,
}

#[derive(Deserialize)]
struct TelegramResponse {
    ok: bool,
    description: Option<String>,
}

impl TelegramNotifier {
    pub fn new(client: reqwest::Client, config: BotConfig) -> Self {
        Self { client, config }
    }

    async fn call(&self, method: &str, payload: serde_json::Value) -> Result<()> {
        let url = format!("{}/bot{}/{}", API_BASE, self.config.token, method);
        let resp = self.client.post(&url).json(&payload).send().await?;
        let status = resp.status();
        // Telegram reports errors as JSON with ok=false and a description.
        let body: TelegramResponse = resp.json().await?;
        if !status.is_success() || !body.ok {
            return Err(AppError::Api {
                message: format!(
                    "Telegram {} failed: {}",
                    method,
                    body.description.unwrap_or_else(|| status.to_string())
                ),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl NotificationSink for TelegramNotifier {
    async fn send_text(&self, text: &str) -> Result<()> {
        self.call(
            "sendMessage",
            json!({
                "chat_id": self.config.chat_id,
                "text": text,
                "parse_mode": "Markdown",
            }),
        )
        .await
    }

    async fn send_photo(&self, photo_url: &str, caption: &str) -> Result<()> {
        self.call(
            "sendPhoto",
            json!({
                "chat_id": self.config.chat_id,
                "photo": photo_url,
                "caption": caption,
                "parse_mode": "Markdown",
            }),
        )
        .await
    }
}
