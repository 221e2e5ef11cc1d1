//! # Dashboard Statistics API
//!
//! Single read endpoint that rolls the session store up with the core
//! aggregator. The reference date is the current calendar date; everything
//! else is pure computation over the materialized record set.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;

use outreach_core::{aggregate, ParticipationStats};

use crate::state::AppState;

/// Build the stats router.
pub fn router() -> Router<AppState> {
    Router::new().route("/v1/stats", get(get_stats))
}

/// GET /v1/stats — Trailing-7-day participation statistics.
#[utoipa::path(
    get,
    path = "/v1/stats",
    responses(
        (status = 200, description = "Participation statistics", body = ParticipationStats),
    ),
    tag = "stats"
)]
pub async fn get_stats(State(state): State<AppState>) -> Json<ParticipationStats> {
    let records = state.sessions.list();
    Json(aggregate(&records, Utc::now().date_naive()))
}
