use async_trait::async_trait;
use serde::Deserialize;
use sha1::{Digest, Sha1};

use crate::app::ports::ImageStore;
use crate::config::CloudinaryConfig;
use crate::error::{AppError, Result};

/// All payment screenshots land in one folder on the Cloudinary account.
pub const UPLOAD_FOLDER: &str = "thunderclash_payments";

const ALLOWED_FORMATS: [&str; 4] = ["jpg", "png", "jpeg", "heic"];

/// Image store backed by Cloudinary's signed upload endpoint.
pub struct CloudinaryStore {
    client: reqwest::Client,
    config: CloudinaryConfig,
}

#[derive(Deserialize)]
struct UploadResponse {
    secure_url: String,
}

impl CloudinaryStore {
    pub fn new(client: reqwest::Client, config: CloudinaryConfig) -> Self {
        Self { client, config }
    }
}

/// Signature over the alphabetically ordered upload parameters, per the
/// Cloudinary authentication scheme.
fn sign_upload(folder: &str, timestamp: &str, api_secret: &str) -> String {
    let to_sign = format!("folder={folder}&timestamp={timestamp}{api_secret}");
    let mut hasher = Sha1::new();
    hasher.update(to_sign.as_bytes());
    hex::encode(hasher.finalize())
}

fn is_allowed_format(filename: &str) -> bool {
    std::path::Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ALLOWED_FORMATS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

#[async_trait]
impl ImageStore for CloudinaryStore {
    async fn upload(&self, filename: &str, bytes: Vec<u8>) -> Result<String> {
        if !is_allowed_format(filename) {
            return Err(AppError::Validation(format!(
                "Unsupported screenshot format: {filename}"
            )));
        }

        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = sign_upload(UPLOAD_FOLDER, &timestamp, &self.config.api_secret);

        let file = reqwest::multipart::Part::bytes(bytes).file_name(filename.to_string());
        let form = reqwest::multipart::Form::new()
            .part("file", file)
            .text("api_key", self.config.api_key.clone())
            .text("timestamp", timestamp)
            .text("folder", UPLOAD_FOLDER)
            .text("signature", signature);

        let endpoint = format!(
            "https://api.cloudinary.com/v1_1/{}/image/upload",
            self.config.cloud_name
        );
        let resp = self.client.post(&endpoint).multipart(form).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AppError::Api {
                message: format!("Cloudinary upload failed: {status} - {body}"),
            });
        }

        let body: UploadResponse = resp.json().await?;
        Ok(body.secure_url)
    }
}
