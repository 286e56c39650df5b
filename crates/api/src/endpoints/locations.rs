//! Location endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use battlefield_common::AppResult;
use battlefield_core::{CreateLocationInput, LocationDocument, UpdateLocationInput};
use battlefield_db::entities::{location::LocationData, location_note, location_vote};
use serde::Serialize;

use crate::{
    extractors::AppJson,
    middleware::AppState,
    response::{MessageResponse, created, message},
};

// ==================== Response Types ====================

/// Vote tally for one difficulty label.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TallyResponse {
    pub id: String,
    pub difficulty: String,
    pub count: i32,
}

impl From<location_vote::Model> for TallyResponse {
    fn from(v: location_vote::Model) -> Self {
        Self {
            id: v.id,
            difficulty: v.difficulty,
            count: v.count,
        }
    }
}

/// Note in either list.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteResponse {
    pub id: String,
    pub content: String,
    pub created_at: String,
    pub is_approved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<String>,
}

impl From<location_note::Model> for NoteResponse {
    fn from(n: location_note::Model) -> Self {
        Self {
            is_approved: n.is_approved(),
            id: n.id,
            content: n.content,
            created_at: n.created_at.to_rfc3339(),
            approved_at: n.approved_at.map(|dt| dt.to_rfc3339()),
        }
    }
}

/// Full location document.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationResponse {
    pub id: String,
    pub key: String,
    pub name: String,
    pub emoji: String,
    pub difficulty: String,
    pub color: String,
    pub location_data: Option<LocationData>,
    pub votes: Vec<TallyResponse>,
    pub notes: Vec<NoteResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_notes: Option<Vec<NoteResponse>>,
    pub is_approved: bool,
    pub approved_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<LocationDocument> for LocationResponse {
    fn from(doc: LocationDocument) -> Self {
        let location_data = doc.location.location_data();
        let l = doc.location;
        Self {
            id: l.id,
            key: l.key,
            name: l.name,
            emoji: l.emoji,
            difficulty: l.difficulty,
            color: l.color,
            location_data,
            votes: doc.votes.into_iter().map(Into::into).collect(),
            notes: doc.notes.into_iter().map(Into::into).collect(),
            pending_notes: doc
                .pending_notes
                .map(|notes| notes.into_iter().map(Into::into).collect()),
            is_approved: l.is_approved,
            approved_at: l.approved_at.map(|dt| dt.to_rfc3339()),
            created_at: l.created_at.to_rfc3339(),
            updated_at: l.updated_at.to_rfc3339(),
        }
    }
}

// ==================== Handlers ====================

/// List every location.
async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<LocationResponse>>> {
    let docs = state.location_service.list().await?;
    Ok(Json(docs.into_iter().map(Into::into).collect()))
}

/// Get one location.
async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<LocationResponse>> {
    let doc = state.location_service.get(&id).await?;
    Ok(Json(doc.into()))
}

/// Create a location.
async fn create(
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateLocationInput>,
) -> AppResult<(StatusCode, Json<LocationResponse>)> {
    let doc = state.location_service.create(input).await?;
    Ok(created(LocationResponse::from(doc)))
}

/// Update a location's editable fields.
async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(input): AppJson<UpdateLocationInput>,
) -> AppResult<Json<MessageResponse>> {
    state.location_service.update(&id, input).await?;
    Ok(message("Location updated successfully"))
}

/// Delete a location.
async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    state.location_service.delete(&id).await?;
    Ok(message("Location deleted successfully"))
}

/// Vote tallies of a location.
async fn votes(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<TallyResponse>>> {
    let tallies = state.location_service.votes(&id).await?;
    Ok(Json(tallies.into_iter().map(Into::into).collect()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/locations", get(list).post(create))
        .route(
            "/api/locations/{id}",
            get(show).put(update).delete(delete),
        )
        .route("/api/locations/{id}/votes", get(votes))
}
