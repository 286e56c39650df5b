//! Service banner and health check.

use axum::{Json, Router, routing::get};
use serde::Serialize;

use crate::middleware::AppState;

/// Root banner.
#[derive(Serialize)]
pub struct BannerResponse {
    pub message: &'static str,
    pub status: &'static str,
}

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

async fn banner() -> Json<BannerResponse> {
    Json(BannerResponse {
        message: "API is running",
        status: "ok",
    })
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "healthy" })
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(banner))
        .route("/health", get(health))
}
