pub mod config;
pub mod error;
pub mod state;
pub mod audit;
pub mod auth;
pub mod db;
pub mod models;
pub mod middleware;
pub mod routes;
pub mod upload;
pub mod rate_limit;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderName, HeaderValue};
use axum::Router;
use sqlx::PgPool;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::audit::{ActivityReader, ActivityRecorder, AuditStore};
use crate::config::Config;
use crate::db::audit::PgAuditStore;
use crate::middleware::audit::record_activity;
use crate::rate_limit::LoginRateLimiter;
use crate::state::{AppState, SharedState};
use crate::upload::cloudinary::CloudinaryUploader;
use crate::upload::ImageUploader;

pub fn build_app(pool: PgPool, config: Config) -> (Router, SharedState) {
    let store: Arc<dyn AuditStore> = Arc::new(PgAuditStore::new(pool.clone()));
    let recorder = ActivityRecorder::new(store.clone());
    let activity = ActivityReader::new(store);

    // Image host
    let uploader = config.cloudinary.clone().and_then(|cloudinary| {
        match CloudinaryUploader::new(cloudinary) {
            Ok(uploader) => {
                tracing::info!("Cloudinary uploads configured");
                Some(Arc::new(uploader) as Arc<dyn ImageUploader>)
            }
            Err(e) => {
                tracing::warn!("Cloudinary not available: {e}");
                None
            }
        }
    });
    if uploader.is_none() {
        tracing::warn!("No image host configured, image uploads will be refused");
    }

    let upload_dir = config.upload_dir.clone();
    let max_body_size = config.max_body_size;

    let state: SharedState = Arc::new(AppState {
        pool,
        config,
        activity,
        uploader,
        login_limiter: LoginRateLimiter::new(),
    });

    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let router = Router::new()
        .merge(
            routes::api_routes()
                .layer(axum::middleware::from_fn_with_state(recorder, record_activity)),
        )
        .nest_service("/uploads", ServeDir::new(upload_dir))
        .route("/health", axum::routing::get(health))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_body_size))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-content-type-options"),
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-frame-options"),
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("referrer-policy"),
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state.clone());

    (router, state)
}

async fn health() -> &'static str {
    "ok"
}
