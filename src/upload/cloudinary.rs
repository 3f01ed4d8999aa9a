use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha2::{Digest, Sha256};

use super::{ImageUploader, UploadError};
use crate::config::CloudinaryConfig;

pub struct CloudinaryUploader {
    client: reqwest::Client,
    config: CloudinaryConfig,
}

#[derive(Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
    url: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorMessage,
}

#[derive(Deserialize)]
struct ErrorMessage {
    message: String,
}

impl CloudinaryUploader {
    pub fn new(config: CloudinaryConfig) -> Result<Self, String> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .map_err(|e| format!("Failed to build HTTP client: {e}"))?;
        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!(
            "https://api.cloudinary.com/v1_1/{}/image/upload",
            self.config.cloud_name
        )
    }
}

/// Signs the upload parameters (`timestamp` only) with the API secret.
pub fn sign(timestamp: i64, api_secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(format!("timestamp={timestamp}{api_secret}").as_bytes());
    hex::encode(hasher.finalize())
}

#[async_trait]
impl ImageUploader for CloudinaryUploader {
    async fn upload(&self, bytes: Bytes, file_name: &str) -> Result<String, UploadError> {
        let timestamp = Utc::now().timestamp();
        let signature = sign(timestamp, &self.config.api_secret);

        let form = Form::new()
            .part("file", Part::stream(bytes).file_name(file_name.to_string()))
            .text("api_key", self.config.api_key.clone())
            .text("timestamp", timestamp.to_string())
            .text("signature_algorithm", "sha256")
            .text("signature", signature);

        let resp = self.client.post(self.endpoint()).multipart(form).send().await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let message = resp
                .json::<ErrorResponse>()
                .await
                .map(|e| e.error.message)
                .unwrap_or_else(|_| format!("HTTP {status}"));
            return Err(UploadError::Rejected(message));
        }

        let body: UploadResponse = resp.json().await?;
        body.secure_url
            .or(body.url)
            .ok_or_else(|| UploadError::Rejected("response carried no URL".to_string()))
    }
}
