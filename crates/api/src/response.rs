//! API response helpers.

use axum::{Json, http::StatusCode};
use serde::Serialize;

/// Body of endpoints that only confirm an action.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// `{"message": ...}` with status 200.
pub fn message(text: impl Into<String>) -> Json<MessageResponse> {
    Json(MessageResponse {
        message: text.into(),
    })
}

/// JSON body with status 201.
pub fn created<T: Serialize>(body: T) -> (StatusCode, Json<T>) {
    (StatusCode::CREATED, Json(body))
}
