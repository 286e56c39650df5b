//! Note endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
};
use battlefield_common::AppResult;
use battlefield_core::AddNoteInput;
use serde::Serialize;

use crate::{
    endpoints::locations::NoteResponse,
    extractors::AppJson,
    middleware::AppState,
    response::{MessageResponse, created, message},
};

/// Both note lists of a location.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotesResponse {
    pub notes: Vec<NoteResponse>,
    pub pending_notes: Vec<NoteResponse>,
}

/// Attach a pending note.
async fn add(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(input): AppJson<AddNoteInput>,
) -> AppResult<(StatusCode, Json<NoteResponse>)> {
    let note = state.moderation_service.add_note(&id, input).await?;
    Ok(created(NoteResponse::from(note)))
}

/// List approved and pending notes.
async fn list(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<NotesResponse>> {
    let lists = state.moderation_service.list_notes(&id).await?;

    Ok(Json(NotesResponse {
        notes: lists.notes.into_iter().map(Into::into).collect(),
        pending_notes: lists.pending_notes.into_iter().map(Into::into).collect(),
    }))
}

/// Delete a note from either list.
async fn remove(
    State(state): State<AppState>,
    Path((id, note_id)): Path<(String, String)>,
) -> AppResult<Json<MessageResponse>> {
    state.moderation_service.delete_note(&id, &note_id).await?;
    Ok(message("Note deleted successfully"))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/locations/{id}/notes", get(list).post(add))
        .route("/api/locations/{id}/notes/{note_id}", delete(remove))
}
