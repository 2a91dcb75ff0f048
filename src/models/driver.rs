use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::draft::ServiceType;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum DriverStatus {
    Available,
    Busy,
    Offline,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Driver {
    pub id: Uuid,
    pub name: String,
    pub vehicle: String,
    pub battery_level: u8,
    pub status: DriverStatus,
    pub services: Vec<ServiceType>,
    pub distance_km: f64,
    pub updated_at: DateTime<Utc>,
}

/// Display fields frozen at assignment time. Deliberately not a live
/// reference: later battery or status changes never touch a booking.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DriverSnapshot {
    pub id: Uuid,
    pub name: String,
    pub vehicle: String,
    pub battery_level: u8,
}

impl Driver {
    pub fn snapshot(&self) -> DriverSnapshot {
        DriverSnapshot {
            id: self.id,
            name: self.name.clone(),
            vehicle: self.vehicle.clone(),
            battery_level: self.battery_level,
        }
    }
}
