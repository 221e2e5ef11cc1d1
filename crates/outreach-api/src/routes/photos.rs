//! # Photo Attachment API
//!
//! Multipart upload, listing, deletion, and serving of session photos.
//! Uploads are validated per file: the extension must be an allowed image
//! type and the stored size must not exceed the 5 MiB cap. The size check
//! runs after the bytes are written; a violation deletes the just-written
//! file so no oversized blob is left behind.

use axum::extract::multipart::MultipartRejection;
use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get};
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use outreach_core::{allowed_photo_extension, PhotoAttachment, MAX_PHOTO_BYTES};

use crate::error::AppError;
use crate::state::AppState;

/// Body limit for upload requests. Individual files are capped at 5 MiB
/// after storage; this bounds the whole multipart body.
const UPLOAD_BODY_LIMIT: usize = 32 * 1024 * 1024;

/// An attachment as returned by the API, with its serving URL.
#[derive(Debug, Serialize, ToSchema)]
pub struct PhotoView {
    #[serde(flatten)]
    pub photo: PhotoAttachment,
    pub url: String,
}

impl From<PhotoAttachment> for PhotoView {
    fn from(photo: PhotoAttachment) -> Self {
        let url = format!("/uploads/photos/{}", photo.filename);
        Self { photo, url }
    }
}

/// Build the photos router.
///
/// The body limit is raised here, on this router only; the application-wide
/// 2 MiB default stays in place for everything else.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/v1/sessions/:id/photos",
            get(list_photos).post(upload_photos),
        )
        .route("/v1/sessions/:id/photos/:photo_id", delete(delete_photo))
        .route("/uploads/photos/:filename", get(serve_photo))
        .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT))
}

/// POST /v1/sessions/:id/photos — Attach photos to a session.
///
/// Accepts any number of files in one multipart body. Parts without a
/// filename are skipped. Files accepted before a failing part stay recorded.
#[utoipa::path(
    post,
    path = "/v1/sessions/{id}/photos",
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 201, description = "Photos attached", body = [PhotoView]),
        (status = 404, description = "Session not found", body = crate::error::ErrorBody),
        (status = 422, description = "File type or size rejected", body = crate::error::ErrorBody),
    ),
    tag = "photos"
)]
pub async fn upload_photos(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<Vec<PhotoView>>), AppError> {
    if !state.sessions.contains(&id) {
        return Err(AppError::not_found(format!("session {id} not found")));
    }

    let mut multipart = multipart.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let mut uploaded = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        let Some(original_filename) = field.file_name().map(str::to_string) else {
            continue;
        };
        if original_filename.is_empty() {
            continue;
        }

        let extension = allowed_photo_extension(&original_filename).ok_or_else(|| {
            AppError::invalid(format!("File type not allowed for {original_filename}"))
        })?;

        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        let stored = state.blobs.save(&bytes, &extension).await?;
        if stored.size > MAX_PHOTO_BYTES {
            state.blobs.delete(&stored.filename).await?;
            return Err(AppError::invalid(format!(
                "File {original_filename} is too large (max 5MB)"
            )));
        }

        let photo = PhotoAttachment {
            id: Uuid::new_v4(),
            session_id: id,
            filename: stored.filename,
            original_filename,
            file_size: stored.size,
            uploaded_at: Utc::now(),
        };
        state.photos.insert(photo.id, photo.clone());

        if let Some(pool) = &state.db_pool {
            if let Err(e) = crate::db::photos::insert(pool, &photo).await {
                tracing::error!(photo_id = %photo.id, error = %e, "failed to persist photo record");
                return Err(AppError::Internal(
                    "photo stored but database persist failed".to_string(),
                ));
            }
        }

        uploaded.push(PhotoView::from(photo));
    }

    tracing::info!(session_id = %id, count = uploaded.len(), "photos attached");
    Ok((StatusCode::CREATED, Json(uploaded)))
}

/// GET /v1/sessions/:id/photos — List a session's photos, newest first.
#[utoipa::path(
    get,
    path = "/v1/sessions/{id}/photos",
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Photos for the session", body = [PhotoView]),
        (status = 404, description = "Session not found", body = crate::error::ErrorBody),
    ),
    tag = "photos"
)]
pub async fn list_photos(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<PhotoView>>, AppError> {
    if !state.sessions.contains(&id) {
        return Err(AppError::not_found(format!("session {id} not found")));
    }

    let mut photos: Vec<_> = state
        .photos
        .list()
        .into_iter()
        .filter(|p| p.session_id == id)
        .collect();
    photos.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at).then(a.id.cmp(&b.id)));

    Ok(Json(photos.into_iter().map(PhotoView::from).collect()))
}

/// DELETE /v1/sessions/:id/photos/:photo_id — Detach one photo and delete
/// its backing file.
#[utoipa::path(
    delete,
    path = "/v1/sessions/{id}/photos/{photo_id}",
    params(
        ("id" = Uuid, Path, description = "Session ID"),
        ("photo_id" = Uuid, Path, description = "Photo ID"),
    ),
    responses(
        (status = 204, description = "Photo deleted"),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "photos"
)]
pub async fn delete_photo(
    State(state): State<AppState>,
    Path((id, photo_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    let photo = state
        .photos
        .get(&photo_id)
        .filter(|p| p.session_id == id)
        .ok_or_else(|| AppError::not_found(format!("photo {photo_id} not found")))?;

    if let Err(e) = state.blobs.delete(&photo.filename).await {
        tracing::warn!(filename = %photo.filename, error = %e, "failed to delete photo file");
    }
    state.photos.remove(&photo_id);

    if let Some(pool) = &state.db_pool {
        if let Err(e) = crate::db::photos::delete(pool, photo_id).await {
            tracing::error!(photo_id = %photo_id, error = %e, "failed to delete photo from database");
            return Err(AppError::Internal(
                "photo removed in-memory but database delete failed".to_string(),
            ));
        }
    }

    Ok(StatusCode::NO_CONTENT)
}

/// GET /uploads/photos/:filename — Serve a stored photo.
#[utoipa::path(
    get,
    path = "/uploads/photos/{filename}",
    params(("filename" = String, Path, description = "Stored filename")),
    responses(
        (status = 200, description = "Photo bytes"),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "photos"
)]
pub async fn serve_photo(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, AppError> {
    let Some(bytes) = state.blobs.read(&filename).await? else {
        return Err(AppError::not_found(format!("photo {filename} not found")));
    };

    let content_type = match filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        _ => "application/octet-stream",
    };

    Ok(([(header::CONTENT_TYPE, content_type)], bytes).into_response())
}
