//! API integration tests.
//!
//! These drive the router end to end against a mock database.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
};
use battlefield_api::{middleware::AppState, router};
use battlefield_core::{AdminService, LocationService, ModerationService};
use battlefield_db::{
    entities::{location, location_note, location_note::NoteStatus, location_vote, vote_submission},
    repositories::{LocationRepository, ModerationRepository, NoteRepository},
};
use chrono::Utc;
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
use serde_json::{Value, json};
use tower::ServiceExt;

const LOC_ID: &str = "01hzxyq8v5zk2m3n4p5q6r7s8t";
const NOTE_ID: &str = "01hzxyq8v5zk2m3n4p5q6r7s8w";
const ADMIN_PASSWORD: &str = "hunter2";

fn create_test_app(db: DatabaseConnection) -> Router {
    let db = Arc::new(db);
    let location_repo = LocationRepository::new(Arc::clone(&db));
    let note_repo = NoteRepository::new(Arc::clone(&db));
    let moderation_repo = ModerationRepository::new(db);

    let state = AppState {
        location_service: LocationService::new(location_repo.clone(), note_repo.clone()),
        moderation_service: ModerationService::new(moderation_repo, location_repo, note_repo),
        admin_service: AdminService::new(ADMIN_PASSWORD),
    };

    router().with_state(state)
}

fn empty_db() -> DatabaseConnection {
    MockDatabase::new(DatabaseBackend::Postgres).into_connection()
}

fn create_test_location() -> location::Model {
    location::Model {
        id: LOC_ID.to_string(),
        key: "market".to_string(),
        name: "Tuesday Market".to_string(),
        emoji: "🧺".to_string(),
        difficulty: "medium".to_string(),
        color: location::DEFAULT_COLOR.to_string(),
        location_data: Some(json!({"type": "point", "coordinates": {"lat": 1.5, "lng": 2.5}})),
        is_approved: false,
        approved_at: None,
        created_at: Utc::now().into(),
        updated_at: Utc::now().into(),
    }
}

const fn rows(rows_affected: u64) -> MockExecResult {
    MockExecResult {
        last_insert_id: 0,
        rows_affected,
    }
}

fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method(method)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn admin_request(method: &str, uri: &str, body: Option<&Value>) -> Request<Body> {
    let builder = Request::builder()
        .uri(uri)
        .method(method)
        .header(header::AUTHORIZATION, format!("Bearer {ADMIN_PASSWORD}"));
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method("GET")
        .body(Body::empty())
        .unwrap()
}

async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// ==================== Meta ====================

#[tokio::test]
async fn test_banner_and_health() {
    let app = create_test_app(empty_db());

    let response = app.clone().oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["message"], "API is running");
    assert_eq!(body["status"], "ok");

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(body_json(response).await["status"], "healthy");
}

#[tokio::test]
async fn test_unknown_endpoint_returns_404() {
    let app = create_test_app(empty_db());

    let response = app.oneshot(get("/nonexistent/endpoint")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "Route not found");
}

// ==================== Locations ====================

#[tokio::test]
async fn test_get_location_with_malformed_id() {
    let app = create_test_app(empty_db());

    let response = app.oneshot(get("/api/locations/not-an-id")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Invalid location ID");
    assert_eq!(body["code"], "INVALID_ARGUMENT");
}

#[tokio::test]
async fn test_get_missing_location() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<location::Model>::new()])
        .into_connection();
    let app = create_test_app(db);

    let response = app
        .oneshot(get(&format!("/api/locations/{LOC_ID}")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "Location not found");
}

#[tokio::test]
async fn test_get_location_document() {
    let tally = location_vote::Model {
        id: "v1".to_string(),
        location_id: LOC_ID.to_string(),
        difficulty: "hard".to_string(),
        count: 2,
        created_at: Utc::now().into(),
    };
    let note = location_note::Model {
        id: NOTE_ID.to_string(),
        location_id: LOC_ID.to_string(),
        content: "bring cash".to_string(),
        status: NoteStatus::Pending,
        created_at: Utc::now().into(),
        approved_at: None,
    };

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[create_test_location()]])
        .append_query_results([[tally]])
        .append_query_results([[note]])
        .into_connection();
    let app = create_test_app(db);

    let response = app
        .oneshot(get(&format!("/api/locations/{LOC_ID}")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["id"], LOC_ID);
    assert_eq!(body["locationData"]["type"], "point");
    assert_eq!(body["votes"][0]["count"], 2);
    assert_eq!(body["notes"], json!([]));
    assert_eq!(body["pendingNotes"][0]["content"], "bring cash");
    assert_eq!(body["pendingNotes"][0]["isApproved"], false);
    assert_eq!(body["isApproved"], false);
}

#[tokio::test]
async fn test_approved_location_omits_pending_notes() {
    let mut approved = create_test_location();
    approved.is_approved = true;
    approved.approved_at = Some(Utc::now().into());

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[approved]])
        .append_query_results([Vec::<location_vote::Model>::new()])
        .append_query_results([Vec::<location_note::Model>::new()])
        .into_connection();
    let app = create_test_app(db);

    let response = app
        .oneshot(get(&format!("/api/locations/{LOC_ID}")))
        .await
        .unwrap();

    let body = body_json(response).await;
    assert!(body.get("pendingNotes").is_none());
    assert!(body["approvedAt"].is_string());
}

#[tokio::test]
async fn test_create_location() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[create_test_location()]])
        .into_connection();
    let app = create_test_app(db);

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/locations",
            &json!({"key": "market", "name": "Tuesday Market"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["color"], "#4ECDC4");
    assert_eq!(body["votes"], json!([]));
    assert_eq!(body["notes"], json!([]));
    assert_eq!(body["pendingNotes"], json!([]));
    assert_eq!(body["isApproved"], false);
}

#[tokio::test]
async fn test_create_location_without_name() {
    let app = create_test_app(empty_db());

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/locations",
            &json!({"key": "market"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_rejects_unknown_fields() {
    let app = create_test_app(empty_db());

    let response = app
        .oneshot(json_request(
            "PUT",
            &format!("/api/locations/{LOC_ID}"),
            &json!({"isApproved": true}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_location() {
    let existing = create_test_location();
    let mut updated = existing.clone();
    updated.name = "Night Market".to_string();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[existing]])
        .append_query_results([[updated]])
        .into_connection();
    let app = create_test_app(db);

    let response = app
        .oneshot(json_request(
            "PUT",
            &format!("/api/locations/{LOC_ID}"),
            &json!({"name": "Night Market"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await["message"],
        "Location updated successfully"
    );
}

#[tokio::test]
async fn test_delete_missing_location() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([rows(0)])
        .into_connection();
    let app = create_test_app(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/api/locations/{LOC_ID}"))
                .method("DELETE")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ==================== Votes & Notes ====================

#[tokio::test]
async fn test_submit_vote() {
    let tally = location_vote::Model {
        id: "v1".to_string(),
        location_id: LOC_ID.to_string(),
        difficulty: "hard".to_string(),
        count: 1,
        created_at: Utc::now().into(),
    };
    let submission = vote_submission::Model {
        id: "s1".to_string(),
        location_key: "market".to_string(),
        difficulty: "hard".to_string(),
        notes: String::new(),
        created_at: Utc::now().into(),
        is_approved: false,
        approved_at: None,
    };

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[create_test_location()]])
        .append_query_results([[tally]])
        .append_query_results([[submission]])
        .append_exec_results([rows(1), rows(1)])
        .into_connection();
    let app = create_test_app(db);

    let response = app
        .oneshot(json_request(
            "POST",
            &format!("/api/locations/{LOC_ID}/vote"),
            &json!({"difficulty": "hard"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Vote submitted successfully");
    assert_eq!(body["vote"]["locationId"], "market");
    assert_eq!(body["tally"]["count"], 1);
}

#[tokio::test]
async fn test_add_note_with_blank_content() {
    let app = create_test_app(empty_db());

    let response = app
        .oneshot(json_request(
            "POST",
            &format!("/api/locations/{LOC_ID}/notes"),
            &json!({"content": "   "}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_note_in_neither_list() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([rows(0)])
        .into_connection();
    let app = create_test_app(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/api/locations/{LOC_ID}/notes/{NOTE_ID}"))
                .method("DELETE")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "Note not found");
}

// ==================== Admin ====================

#[tokio::test]
async fn test_admin_login() {
    let app = create_test_app(empty_db());

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/admin/login",
            &json!({"password": ADMIN_PASSWORD}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Authenticated");

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/admin/login",
            &json!({"password": "wrong"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Invalid password");

    let response = app
        .oneshot(json_request("POST", "/admin/login", &json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Password is required");
}

#[tokio::test]
async fn test_pending_votes_require_admin() {
    let app = create_test_app(empty_db());

    let response = app
        .clone()
        .oneshot(get("/admin/votes/pending"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/admin/votes/pending")
                .header(header::AUTHORIZATION, "Bearer wrong")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_pending_votes() {
    let submission = vote_submission::Model {
        id: "s1".to_string(),
        location_key: "market".to_string(),
        difficulty: "hard".to_string(),
        notes: "steep".to_string(),
        created_at: Utc::now().into(),
        is_approved: false,
        approved_at: None,
    };

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[submission]])
        .into_connection();
    let app = create_test_app(db);

    let response = app
        .oneshot(admin_request("GET", "/admin/votes/pending", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body[0]["locationId"], "market");
    assert_eq!(body[0]["isApproved"], false);
}

#[tokio::test]
async fn test_approve_votes() {
    let minted = location_note::Model {
        id: NOTE_ID.to_string(),
        location_id: LOC_ID.to_string(),
        content: "steep incline".to_string(),
        status: NoteStatus::Approved,
        created_at: Utc::now().into(),
        approved_at: Some(Utc::now().into()),
    };

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[create_test_location()]])
        .append_query_results([[minted]])
        .append_exec_results([rows(2), rows(0), rows(1)])
        .into_connection();
    let app = create_test_app(db);

    let response = app
        .oneshot(admin_request(
            "POST",
            "/admin/approve-votes",
            Some(&json!({
                "locationId": LOC_ID,
                "difficulty": "hard",
                "notes": ["steep incline"]
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "approved");
    assert_eq!(body["updated"], true);
    assert_eq!(body["notesAdded"], 1);
    assert_eq!(body["votesApproved"], 2);
}

#[tokio::test]
async fn test_reject_votes_with_nothing_pending() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<location::Model>::new()])
        .append_exec_results([rows(0)])
        .into_connection();
    let app = create_test_app(db);

    let response = app
        .oneshot(admin_request(
            "POST",
            "/admin/reject-votes",
            Some(&json!({"locationId": "market"})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "rejected");
    assert_eq!(body["deletedCount"], 0);
}
