pub mod cloudinary;
pub mod local;

use async_trait::async_trait;
use bytes::Bytes;

#[derive(Debug)]
pub enum UploadError {
    NotConfigured,
    Rejected(String),
    Transport(reqwest::Error),
}

impl std::fmt::Display for UploadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UploadError::NotConfigured => write!(f, "no image host configured"),
            UploadError::Rejected(msg) => write!(f, "image host rejected upload: {msg}"),
            UploadError::Transport(err) => write!(f, "image host unreachable: {err}"),
        }
    }
}

impl std::error::Error for UploadError {}

impl From<reqwest::Error> for UploadError {
    fn from(err: reqwest::Error) -> Self {
        UploadError::Transport(err)
    }
}

/// Remote image host. Takes raw bytes, hands back a public URL.
#[async_trait]
pub trait ImageUploader: Send + Sync {
    async fn upload(&self, bytes: Bytes, file_name: &str) -> Result<String, UploadError>;
}
