//! API endpoints.

mod admin;
mod locations;
mod meta;
mod notes;
mod votes;

use axum::{Json, Router, http::StatusCode};
use serde_json::{Value, json};

use crate::middleware::AppState;

pub use locations::{LocationResponse, NoteResponse, TallyResponse};
pub use votes::VoteSubmissionResponse;

/// Unknown routes.
async fn not_found() -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Route not found" })))
}

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(meta::router())
        .merge(locations::router())
        .merge(votes::router())
        .merge(notes::router())
        .nest("/admin", admin::router())
        .fallback(not_found)
}
