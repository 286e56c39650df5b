//! Vote endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::post,
};
use battlefield_common::AppResult;
use battlefield_core::SubmitVoteInput;
use battlefield_db::entities::vote_submission;
use serde::Serialize;

use crate::{
    endpoints::locations::{NoteResponse, TallyResponse},
    extractors::AppJson,
    middleware::AppState,
    response::created,
};

/// A queued vote submission.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteSubmissionResponse {
    pub id: String,
    /// Key of the location the vote was cast on.
    pub location_id: String,
    pub difficulty: String,
    pub notes: String,
    pub created_at: String,
    pub is_approved: bool,
    pub approved_at: Option<String>,
}

impl From<vote_submission::Model> for VoteSubmissionResponse {
    fn from(s: vote_submission::Model) -> Self {
        Self {
            id: s.id,
            location_id: s.location_key,
            difficulty: s.difficulty,
            notes: s.notes,
            created_at: s.created_at.to_rfc3339(),
            is_approved: s.is_approved,
            approved_at: s.approved_at.map(|dt| dt.to_rfc3339()),
        }
    }
}

/// Result of casting a vote.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitVoteResponse {
    pub message: String,
    pub vote: VoteSubmissionResponse,
    pub tally: TallyResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<NoteResponse>,
}

/// Vote on a location's difficulty.
async fn submit(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(input): AppJson<SubmitVoteInput>,
) -> AppResult<(StatusCode, Json<SubmitVoteResponse>)> {
    let recorded = state.moderation_service.submit_vote(&id, input).await?;

    Ok(created(SubmitVoteResponse {
        message: "Vote submitted successfully".to_string(),
        vote: recorded.submission.into(),
        tally: recorded.tally.into(),
        note: recorded.note.map(Into::into),
    }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/locations/{id}/vote", post(submit))
}
