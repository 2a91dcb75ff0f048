use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Json;
use axum::Router;

use crate::engine::{assignment, lifecycle};
use crate::error::AppError;
use crate::models::booking::Booking;
use crate::models::draft::Draft;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/drafts/:agent",
            get(get_draft).patch(merge_draft).delete(clear_draft),
        )
        .route("/drafts/:agent/assign", post(assign_draft_driver))
        .route("/drafts/:agent/commit", post(commit_draft))
}

async fn get_draft(
    State(state): State<Arc<AppState>>,
    Path(agent): Path<String>,
) -> Json<Draft> {
    Json(state.drafts.get(&agent).unwrap_or_default())
}

/// Each wizard step PATCHes only the fields it collected; the store merges
/// them into the agent's single in-progress draft.
async fn merge_draft(
    State(state): State<Arc<AppState>>,
    Path(agent): Path<String>,
    Json(patch): Json<Draft>,
) -> Json<Draft> {
    let merged = state.drafts.merge(&agent, patch);
    state.metrics.drafts_active.set(state.drafts.len() as i64);
    Json(merged)
}

async fn clear_draft(
    State(state): State<Arc<AppState>>,
    Path(agent): Path<String>,
) -> StatusCode {
    state.drafts.clear(&agent);
    state.metrics.drafts_active.set(state.drafts.len() as i64);
    StatusCode::NO_CONTENT
}

/// Resolves an eligible driver for the draft's service type and attaches
/// the snapshot to the draft ahead of commit.
async fn assign_draft_driver(
    State(state): State<Arc<AppState>>,
    Path(agent): Path<String>,
) -> Result<Json<Draft>, AppError> {
    let draft = state.drafts.get(&agent).unwrap_or_default();
    let service_type = draft
        .service_type
        .ok_or_else(|| AppError::BadRequest("draft has no service type yet".to_string()))?;

    let snapshot = assignment::resolve(&state, service_type)?;
    let merged = state.drafts.merge(
        &agent,
        Draft {
            driver: Some(snapshot),
            ..Draft::default()
        },
    );

    Ok(Json(merged))
}

async fn commit_draft(
    State(state): State<Arc<AppState>>,
    Path(agent): Path<String>,
) -> Result<Json<Booking>, AppError> {
    let booking = lifecycle::commit(&state, &agent)?;
    Ok(Json(booking))
}
