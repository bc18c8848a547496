use async_trait::async_trait;

use crate::error::Result;

/// Stores an uploaded payment screenshot and returns its public URL.
#[async_trait]
pub trait ImageStore: Send + Sync {
    async fn upload(&self, filename: &str, bytes: Vec<u8>) -> Result<String>;
}

/// Delivers operator-facing notifications to a chat channel. The channel
/// identity is part of the sink, not of the call.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn send_text(&self, text: &str) -> Result<()>;
    async fn send_photo(&self, photo_url: &str, caption: &str) -> Result<()>;
}

/// Appends one row to a spreadsheet-like log, partitioned by tab name.
#[async_trait]
pub trait TabularSink: Send + Sync {
    async fn append_row(&self, tab: &str, values: Vec<String>) -> Result<()>;
}
