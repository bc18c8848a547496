use async_trait::async_trait;
use serde_json::json;

use crate::app::ports::TabularSink;
use crate::error::{AppError, Result};

/// Tabular sink that posts rows to an Apps-Script-style webhook, which owns
/// the actual spreadsheet append.
pub struct SheetsWebhook {
    client: reqwest::Client,
    webhook_url: String,
}

impl SheetsWebhook {
    pub fn new(client: reqwest::Client, webhook_url: String) -> Self {
        Self { client, webhook_url }
    }
}

#[async_trait]
impl TabularSink for SheetsWebhook {
    async fn append_row(&self, tab: &str, values: Vec<String>) -> Result<()> {
        let resp = self
            .client
            .post(&self.webhook_url)
            .json(&json!({ "sheet": tab, "values": values }))
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AppError::Api {
                message: format!("Sheet append failed: {status} - {body}"),
            });
        }
        Ok(())
    }
}
