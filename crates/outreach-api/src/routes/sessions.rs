//! # Session Record API
//!
//! Create, list, update, and delete session records. Writes validate the
//! submission with the core validator before anything is persisted; a
//! rejected record is never stored, in memory or in the database.

use std::cmp::Reverse;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use outreach_core::{SessionInput, SessionRecord};

use crate::error::AppError;
use crate::extractors::extract_json;
use crate::state::AppState;

/// A session record as listed, with derived display fields.
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionView {
    #[serde(flatten)]
    pub record: SessionRecord,
    pub total_participants: i64,
    pub photo_count: usize,
}

/// Build the sessions router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/sessions", get(list_sessions).post(create_session))
        .route(
            "/v1/sessions/:id",
            put(update_session).delete(delete_session),
        )
}

/// GET /v1/sessions — List all session records.
#[utoipa::path(
    get,
    path = "/v1/sessions",
    responses(
        (status = 200, description = "All session records, newest session date first", body = [SessionView]),
    ),
    tag = "sessions"
)]
pub async fn list_sessions(State(state): State<AppState>) -> Json<Vec<SessionView>> {
    let mut records = state.sessions.list();
    records.sort_by_key(|r| (Reverse(r.fields.session_date), Reverse(r.created_at)));

    let photos = state.photos.list();
    let views = records
        .into_iter()
        .map(|record| {
            let photo_count = photos.iter().filter(|p| p.session_id == record.id).count();
            SessionView {
                total_participants: record.total_participants(),
                photo_count,
                record,
            }
        })
        .collect();
    Json(views)
}

/// POST /v1/sessions — Validate and create a session record.
#[utoipa::path(
    post,
    path = "/v1/sessions",
    request_body = SessionInput,
    responses(
        (status = 201, description = "Session recorded", body = SessionRecord),
        (status = 422, description = "Validation failed", body = crate::error::ErrorBody),
    ),
    tag = "sessions"
)]
pub async fn create_session(
    State(state): State<AppState>,
    body: Result<Json<SessionInput>, JsonRejection>,
) -> Result<(StatusCode, Json<SessionRecord>), AppError> {
    let input = extract_json(body)?;
    let fields = input
        .resolve(Utc::now().date_naive())
        .map_err(AppError::Validation)?;

    let record = SessionRecord::new(Uuid::new_v4(), fields, Utc::now());
    state.sessions.insert(record.id, record.clone());

    // Persist to database (write-through). Failure is surfaced to the client
    // because the in-memory record would be lost on restart.
    if let Some(pool) = &state.db_pool {
        if let Err(e) = crate::db::sessions::insert(pool, &record).await {
            tracing::error!(session_id = %record.id, error = %e, "failed to persist session");
            return Err(AppError::Internal(
                "session recorded in-memory but database persist failed".to_string(),
            ));
        }
    }

    tracing::info!(session_id = %record.id, school = %record.fields.school_name, "session recorded");
    Ok((StatusCode::CREATED, Json(record)))
}

/// PUT /v1/sessions/:id — Validate and replace every mutable field.
///
/// Validation runs before the existence check, so a malformed update is
/// reported as 422 even for an unknown id.
#[utoipa::path(
    put,
    path = "/v1/sessions/{id}",
    params(("id" = Uuid, Path, description = "Session ID")),
    request_body = SessionInput,
    responses(
        (status = 200, description = "Session updated", body = SessionRecord),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
        (status = 422, description = "Validation failed", body = crate::error::ErrorBody),
    ),
    tag = "sessions"
)]
pub async fn update_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Result<Json<SessionInput>, JsonRejection>,
) -> Result<Json<SessionRecord>, AppError> {
    let input = extract_json(body)?;
    let fields = input
        .resolve(Utc::now().date_naive())
        .map_err(AppError::Validation)?;

    let updated = state
        .sessions
        .update(&id, |record| record.apply(fields))
        .ok_or_else(|| AppError::not_found(format!("session {id} not found")))?;

    if let Some(pool) = &state.db_pool {
        match crate::db::sessions::update(pool, &updated).await {
            Ok(true) => {}
            Ok(false) => {
                tracing::warn!(session_id = %id, "session missing from database during update");
            }
            Err(e) => {
                tracing::error!(session_id = %id, error = %e, "failed to persist session update");
                return Err(AppError::Internal(
                    "session updated in-memory but database persist failed".to_string(),
                ));
            }
        }
    }

    Ok(Json(updated))
}

/// DELETE /v1/sessions/:id — Delete a session, its attachment records, and
/// their backing files.
#[utoipa::path(
    delete,
    path = "/v1/sessions/{id}",
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 204, description = "Session deleted"),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "sessions"
)]
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.sessions.remove(&id).is_none() {
        return Err(AppError::not_found(format!("session {id} not found")));
    }

    // Cascade: attachment records and their backing files. Blob deletion is
    // best-effort; a file already gone is not a failure.
    let attached: Vec<_> = state
        .photos
        .list()
        .into_iter()
        .filter(|p| p.session_id == id)
        .collect();
    for photo in &attached {
        state.photos.remove(&photo.id);
        if let Err(e) = state.blobs.delete(&photo.filename).await {
            tracing::warn!(filename = %photo.filename, error = %e, "failed to delete photo file");
        }
    }

    // Database rows cascade from the session row.
    if let Some(pool) = &state.db_pool {
        if let Err(e) = crate::db::sessions::delete(pool, id).await {
            tracing::error!(session_id = %id, error = %e, "failed to delete session from database");
            return Err(AppError::Internal(
                "session removed in-memory but database delete failed".to_string(),
            ));
        }
    }

    tracing::info!(session_id = %id, photos = attached.len(), "session deleted");
    Ok(StatusCode::NO_CONTENT)
}
