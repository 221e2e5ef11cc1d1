//! # OpenAPI Specification Assembly
//!
//! Assembles all utoipa-documented routes into a single OpenAPI spec,
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the entire API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Outreach Session API",
        version = "0.1.0",
        description = "Record-keeping service for school outreach sessions: session record CRUD, photo attachments, and trailing-week participation statistics for the dashboard.",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server"),
    ),
    paths(
        // -- Sessions -----------------------------------------------------
        crate::routes::sessions::list_sessions,
        crate::routes::sessions::create_session,
        crate::routes::sessions::update_session,
        crate::routes::sessions::delete_session,
        // -- Photos -------------------------------------------------------
        crate::routes::photos::upload_photos,
        crate::routes::photos::list_photos,
        crate::routes::photos::delete_photo,
        crate::routes::photos::serve_photo,
        // -- Stats --------------------------------------------------------
        crate::routes::stats::get_stats,
    ),
    components(
        schemas(
            // -- Domain types ---------------------------------------------
            outreach_core::SessionRecord,
            outreach_core::SessionFields,
            outreach_core::SessionInput,
            outreach_core::FieldValue,
            outreach_core::YearGroup,
            outreach_core::PhotoAttachment,
            outreach_core::ParticipationStats,
            outreach_core::DayStat,
            // -- Route DTOs -----------------------------------------------
            crate::routes::sessions::SessionView,
            crate::routes::photos::PhotoView,
            // -- Error types ----------------------------------------------
            crate::error::ErrorBody,
            crate::error::ErrorDetail,
        ),
    ),
    tags(
        (name = "sessions", description = "Session record CRUD"),
        (name = "photos", description = "Photo attachments and serving"),
        (name = "stats", description = "Dashboard participation statistics"),
    )
)]
pub struct ApiDoc;

/// Build the OpenAPI router.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json — Return the generated OpenAPI specification.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
