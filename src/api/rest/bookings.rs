use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::Json;
use axum::Router;

use crate::engine::{lifecycle, query};
use crate::error::AppError;
use crate::models::booking::Booking;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/bookings", get(list_bookings))
        .route("/bookings/:id", get(get_booking))
        .route("/bookings/:id/follow-up", post(mark_follow_up))
        .route("/bookings/:id/assign", post(assign_driver))
        .route("/bookings/:id/start", post(start_booking))
        .route("/bookings/:id/complete", post(complete_booking))
        .route("/bookings/:id/cancel", post(cancel_booking))
}

async fn list_bookings(State(state): State<Arc<AppState>>) -> Json<Vec<Booking>> {
    Json(query::list_all(&state))
}

async fn get_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Booking>, AppError> {
    Ok(Json(query::get_by_id(&state, &id)?))
}

async fn mark_follow_up(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Booking>, AppError> {
    Ok(Json(lifecycle::mark_follow_up(&state, &id)?))
}

async fn assign_driver(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Booking>, AppError> {
    Ok(Json(lifecycle::assign_driver(&state, &id)?))
}

async fn start_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Booking>, AppError> {
    Ok(Json(lifecycle::start(&state, &id)?))
}

async fn complete_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Booking>, AppError> {
    Ok(Json(lifecycle::complete(&state, &id)?))
}

async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Booking>, AppError> {
    Ok(Json(lifecycle::cancel(&state, &id)?))
}
