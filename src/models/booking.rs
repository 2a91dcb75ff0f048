use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::models::draft::{ClientType, ServiceType, TimeMode};
use crate::models::driver::DriverSnapshot;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BookingStatus {
    New,
    Assigned,
    InProgress,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, BookingStatus::Completed | BookingStatus::Cancelled)
    }

    /// Transitions are monotonic: New -> Assigned -> InProgress ->
    /// {Completed, Cancelled}, with Cancelled reachable from any
    /// non-terminal state. Nothing leaves a terminal state.
    pub fn can_become(self, next: BookingStatus) -> bool {
        use BookingStatus::*;
        matches!(
            (self, next),
            (New, Assigned)
                | (Assigned, InProgress)
                | (InProgress, Completed)
                | (New, Cancelled)
                | (Assigned, Cancelled)
                | (InProgress, Cancelled)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BookingStatus::New => "new",
            BookingStatus::Assigned => "assigned",
            BookingStatus::InProgress => "in_progress",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Contact {
    pub name: String,
    pub phone: String,
}

/// The service-specific fields of a draft, frozen at commit time. One
/// variant per service type, each carrying its required fields as plain
/// values rather than options.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "service_type", rename_all = "kebab-case")]
pub enum ServiceDetail {
    Ride {
        contact: Contact,
        pickup: String,
        dropoff: String,
    },
    Delivery {
        sender: Contact,
        recipient: Contact,
        pickup: String,
        dropoff: String,
        parcel_description: String,
    },
    Rental {
        contact: Contact,
        pickup: String,
        start_date: NaiveDate,
        end_date: NaiveDate,
    },
    SchoolShuttle {
        contact: Contact,
        pickup: String,
        dropoff: String,
        group_size: u32,
    },
    Tour {
        contact: Contact,
        package_name: String,
        pickup: String,
        start_date: NaiveDate,
        end_date: NaiveDate,
    },
    Ems {
        contact: Contact,
        pickup: String,
    },
}

impl ServiceDetail {
    pub fn service_type(&self) -> ServiceType {
        match self {
            ServiceDetail::Ride { .. } => ServiceType::Ride,
            ServiceDetail::Delivery { .. } => ServiceType::Delivery,
            ServiceDetail::Rental { .. } => ServiceType::Rental,
            ServiceDetail::SchoolShuttle { .. } => ServiceType::SchoolShuttle,
            ServiceDetail::Tour { .. } => ServiceType::Tour,
            ServiceDetail::Ems { .. } => ServiceType::Ems,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub status: BookingStatus,
    pub client_type: Option<ClientType>,
    pub detail: ServiceDetail,
    pub time_mode: TimeMode,
    pub scheduled_time: Option<DateTime<Utc>>,
    pub driver: Option<DriverSnapshot>,
    pub follow_up: bool,
    pub version: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingEvent {
    pub booking_id: String,
    pub status: BookingStatus,
    pub follow_up: bool,
    pub at: DateTime<Utc>,
}
