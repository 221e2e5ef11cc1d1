//! # Outreach Session API
//!
//! HTTP service for recording school outreach sessions, attaching photos to
//! them, and serving trailing-week participation statistics.
//!
//! ## Surface
//!
//! | Method | Path                               | Purpose                      |
//! |--------|------------------------------------|------------------------------|
//! | GET    | `/v1/sessions`                     | List session records         |
//! | POST   | `/v1/sessions`                     | Record a session             |
//! | PUT    | `/v1/sessions/:id`                 | Replace a session's fields   |
//! | DELETE | `/v1/sessions/:id`                 | Delete a session (cascades)  |
//! | POST   | `/v1/sessions/:id/photos`          | Attach photos (multipart)    |
//! | GET    | `/v1/sessions/:id/photos`          | List a session's photos      |
//! | DELETE | `/v1/sessions/:id/photos/:photo_id`| Detach one photo             |
//! | GET    | `/uploads/photos/:filename`        | Serve a stored photo         |
//! | GET    | `/v1/stats`                        | Participation statistics     |
//! | GET    | `/health/liveness`                 | Process is up                |
//! | GET    | `/health/readiness`                | Dependencies reachable       |
//! | GET    | `/openapi.json`                    | OpenAPI specification        |
//!
//! Domain rules (field validation, photo constraints, stats aggregation)
//! live in `outreach-core`; this crate is the HTTP and persistence shell.

use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use tower_http::trace::TraceLayer;

pub mod blob;
pub mod db;
pub mod error;
pub mod extractors;
pub mod openapi;
pub mod routes;
pub mod state;

pub use error::AppError;
pub use state::{AppConfig, AppState};

/// Default request body limit. The photos router raises its own limit for
/// multipart uploads.
const DEFAULT_BODY_LIMIT: usize = 2 * 1024 * 1024;

/// Build the complete application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::sessions::router())
        .merge(routes::photos::router())
        .merge(routes::stats::router())
        .merge(openapi::router())
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness))
        .layer(DefaultBodyLimit::max(DEFAULT_BODY_LIMIT))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health/liveness — the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// GET /health/readiness — the service can do useful work.
///
/// With a database configured this pings it; a failed ping returns 503 so a
/// load balancer can pull the instance while the pool recovers.
async fn readiness(State(state): State<AppState>) -> (StatusCode, Json<serde_json::Value>) {
    if let Some(pool) = &state.db_pool {
        if let Err(e) = sqlx::query("SELECT 1").execute(pool).await {
            tracing::warn!(error = %e, "readiness check failed: database unreachable");
            return (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({ "status": "unavailable", "database": "unreachable" })),
            );
        }
        return (
            StatusCode::OK,
            Json(serde_json::json!({ "status": "ok", "database": "connected" })),
        );
    }

    (
        StatusCode::OK,
        Json(serde_json::json!({ "status": "ok", "database": "not configured" })),
    )
}
