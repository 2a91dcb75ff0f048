use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{patch, post};
use axum::Json;
use axum::Router;
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::draft::ServiceType;
use crate::models::driver::{Driver, DriverStatus};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/drivers", post(create_driver).get(list_drivers))
        .route("/drivers/:id/status", patch(update_driver_status))
        .route("/drivers/:id/telemetry", patch(update_driver_telemetry))
}

#[derive(Deserialize)]
pub struct CreateDriverRequest {
    pub name: String,
    pub vehicle: String,
    pub battery_level: u8,
    pub services: Vec<ServiceType>,
    pub distance_km: f64,
}

#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: DriverStatus,
}

#[derive(Deserialize)]
pub struct UpdateTelemetryRequest {
    pub battery_level: Option<u8>,
    pub distance_km: Option<f64>,
}

async fn create_driver(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateDriverRequest>,
) -> Result<Json<Driver>, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest("name cannot be empty".to_string()));
    }

    if payload.battery_level > 100 {
        return Err(AppError::BadRequest(
            "battery_level must be within 0..=100".to_string(),
        ));
    }

    if payload.services.is_empty() {
        return Err(AppError::BadRequest(
            "driver must support at least one service".to_string(),
        ));
    }

    let driver = Driver {
        id: Uuid::new_v4(),
        name: payload.name,
        vehicle: payload.vehicle,
        battery_level: payload.battery_level,
        status: DriverStatus::Available,
        services: payload.services,
        distance_km: payload.distance_km.max(0.0),
        updated_at: Utc::now(),
    };

    state.drivers.insert(driver.id, driver.clone());
    Ok(Json(driver))
}

async fn list_drivers(State(state): State<Arc<AppState>>) -> Json<Vec<Driver>> {
    let drivers = state
        .drivers
        .iter()
        .map(|entry| entry.value().clone())
        .collect();
    Json(drivers)
}

async fn update_driver_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<Json<Driver>, AppError> {
    let mut driver = state
        .drivers
        .get_mut(&id)
        .ok_or_else(|| AppError::NotFound(format!("driver {id} not found")))?;

    driver.status = payload.status;
    driver.updated_at = Utc::now();

    Ok(Json(driver.clone()))
}

async fn update_driver_telemetry(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTelemetryRequest>,
) -> Result<Json<Driver>, AppError> {
    let mut driver = state
        .drivers
        .get_mut(&id)
        .ok_or_else(|| AppError::NotFound(format!("driver {id} not found")))?;

    if let Some(battery_level) = payload.battery_level {
        if battery_level > 100 {
            return Err(AppError::BadRequest(
                "battery_level must be within 0..=100".to_string(),
            ));
        }
        driver.battery_level = battery_level;
    }

    if let Some(distance_km) = payload.distance_km {
        driver.distance_km = distance_km.max(0.0);
    }

    driver.updated_at = Utc::now();

    Ok(Json(driver.clone()))
}
