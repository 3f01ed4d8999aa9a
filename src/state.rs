use std::sync::Arc;

use sqlx::PgPool;

use crate::audit::ActivityReader;
use crate::config::Config;
use crate::error::AppError;
use crate::rate_limit::LoginRateLimiter;
use crate::upload::{ImageUploader, UploadError};

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub pool: PgPool,
    pub config: Config,
    pub activity: ActivityReader,
    pub uploader: Option<Arc<dyn ImageUploader>>,
    pub login_limiter: LoginRateLimiter,
}

impl AppState {
    pub fn uploader(&self) -> Result<&Arc<dyn ImageUploader>, AppError> {
        self.uploader
            .as_ref()
            .ok_or_else(|| UploadError::NotConfigured.into())
    }
}
