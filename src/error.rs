use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::models::booking::BookingStatus;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("incomplete draft: missing {}", .0.join(", "))]
    IncompleteDraft(Vec<&'static str>),

    #[error("no eligible driver")]
    NoEligibleDriver,

    #[error("invalid transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: BookingStatus,
        to: BookingStatus,
    },

    #[error("booking {0} is terminal")]
    AlreadyTerminal(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::IncompleteDraft(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::NoEligibleDriver => StatusCode::SERVICE_UNAVAILABLE,
            AppError::InvalidTransition { .. } | AppError::AlreadyTerminal(_) => {
                StatusCode::CONFLICT
            }
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // IncompleteDraft carries the missing field names so the caller can
        // offer a guided retry rather than a bare failure.
        let body = match &self {
            AppError::IncompleteDraft(missing) => Json(json!({
                "error": self.to_string(),
                "missing": missing,
            })),
            _ => Json(json!({
                "error": self.to_string()
            })),
        };

        (status, body).into_response()
    }
}
