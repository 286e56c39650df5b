//! Admin endpoints.
//!
//! Everything except `/login` requires the admin password as a bearer token.

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use battlefield_common::AppResult;
use battlefield_core::{ApproveVotesInput, RejectVotesInput};
use serde::{Deserialize, Serialize};

use crate::{
    endpoints::votes::VoteSubmissionResponse,
    extractors::{AdminAuth, AppJson},
    middleware::AppState,
};

// ==================== Request/Response Types ====================

/// Login request.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub password: String,
}

/// Login outcome.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LoginResponse {
    fn failure(status: StatusCode, error: &str) -> Response {
        let body = Self {
            success: false,
            message: None,
            error: Some(error.to_string()),
        };
        (status, Json(body)).into_response()
    }
}

/// Approval outcome.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApproveVotesResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub updated: bool,
    pub notes_added: u64,
    pub votes_approved: u64,
}

/// Rejection outcome.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectVotesResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub deleted_count: u64,
}

// ==================== Handlers ====================

/// Check the admin password.
async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Response {
    let password = match body {
        Ok(Json(req)) if !req.password.is_empty() => req.password,
        _ => return LoginResponse::failure(StatusCode::BAD_REQUEST, "Password is required"),
    };

    if !state.admin_service.is_valid(&password) {
        tracing::debug!("Admin login failed");
        return LoginResponse::failure(StatusCode::UNAUTHORIZED, "Invalid password");
    }

    Json(LoginResponse {
        success: true,
        message: Some("Authenticated".to_string()),
        error: None,
    })
    .into_response()
}

/// Vote submissions awaiting moderation.
async fn pending_votes(
    _admin: AdminAuth,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<VoteSubmissionResponse>>> {
    let pending = state.moderation_service.list_pending_votes().await?;
    Ok(Json(pending.into_iter().map(Into::into).collect()))
}

/// Approve a location's pending votes.
async fn approve_votes(
    _admin: AdminAuth,
    State(state): State<AppState>,
    AppJson(input): AppJson<ApproveVotesInput>,
) -> AppResult<Json<ApproveVotesResponse>> {
    let summary = state.moderation_service.approve_votes(input).await?;

    Ok(Json(ApproveVotesResponse {
        status: "approved",
        message: "Votes approved and location updated successfully",
        updated: summary.updated,
        notes_added: summary.notes_added,
        votes_approved: summary.votes_approved,
    }))
}

/// Reject a location's pending votes.
async fn reject_votes(
    _admin: AdminAuth,
    State(state): State<AppState>,
    AppJson(input): AppJson<RejectVotesInput>,
) -> AppResult<Json<RejectVotesResponse>> {
    let deleted_count = state.moderation_service.reject_votes(input).await?;

    Ok(Json(RejectVotesResponse {
        status: "rejected",
        message: "Votes rejected successfully",
        deleted_count,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/votes/pending", get(pending_votes))
        .route("/approve-votes", post(approve_votes))
        .route("/reject-votes", post(reject_votes))
}
