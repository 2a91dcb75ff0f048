use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::models::driver::DriverSnapshot;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceType {
    Ride,
    Delivery,
    Rental,
    SchoolShuttle,
    Tour,
    Ems,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum ClientType {
    Rider,
    Corporate,
    WalkIn,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum TimeMode {
    #[default]
    Now,
    Later,
}

/// An in-progress booking request, assembled over several wizard steps.
/// Every field is optional until commit; the per-service required sets are
/// enforced by `engine::validation` at the commit boundary, not here.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Draft {
    pub service_type: Option<ServiceType>,
    pub client_type: Option<ClientType>,
    pub contact_name: Option<String>,
    pub contact_phone: Option<String>,
    pub sender_name: Option<String>,
    pub sender_phone: Option<String>,
    pub recipient_name: Option<String>,
    pub recipient_phone: Option<String>,
    pub pickup: Option<String>,
    pub dropoff: Option<String>,
    pub parcel_description: Option<String>,
    pub group_size: Option<u32>,
    pub package_name: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub time_mode: Option<TimeMode>,
    pub scheduled_time: Option<DateTime<Utc>>,
    pub driver: Option<DriverSnapshot>,
}

impl Draft {
    /// Shallow field-level merge: fields present in `patch` win, absent
    /// fields keep their current value.
    pub fn apply(&mut self, patch: Draft) {
        self.service_type = patch.service_type.or(self.service_type);
        self.client_type = patch.client_type.or(self.client_type);
        self.contact_name = patch.contact_name.or(self.contact_name.take());
        self.contact_phone = patch.contact_phone.or(self.contact_phone.take());
        self.sender_name = patch.sender_name.or(self.sender_name.take());
        self.sender_phone = patch.sender_phone.or(self.sender_phone.take());
        self.recipient_name = patch.recipient_name.or(self.recipient_name.take());
        self.recipient_phone = patch.recipient_phone.or(self.recipient_phone.take());
        self.pickup = patch.pickup.or(self.pickup.take());
        self.dropoff = patch.dropoff.or(self.dropoff.take());
        self.parcel_description = patch.parcel_description.or(self.parcel_description.take());
        self.group_size = patch.group_size.or(self.group_size);
        self.package_name = patch.package_name.or(self.package_name.take());
        self.start_date = patch.start_date.or(self.start_date);
        self.end_date = patch.end_date.or(self.end_date);
        self.time_mode = patch.time_mode.or(self.time_mode);
        self.scheduled_time = patch.scheduled_time.or(self.scheduled_time);
        self.driver = patch.driver.or(self.driver.take());
    }
}

#[cfg(test)]
mod tests {
    use super::{Draft, ServiceType};

    fn patch(f: impl FnOnce(&mut Draft)) -> Draft {
        let mut d = Draft::default();
        f(&mut d);
        d
    }

    #[test]
    fn later_fields_win_and_absent_fields_are_preserved() {
        let mut draft = Draft::default();
        draft.apply(patch(|d| d.service_type = Some(ServiceType::Ride)));
        draft.apply(patch(|d| {
            d.pickup = Some("A".to_string());
            d.dropoff = Some("B".to_string());
        }));
        draft.apply(patch(|d| d.pickup = Some("C".to_string())));

        assert_eq!(draft.service_type, Some(ServiceType::Ride));
        assert_eq!(draft.pickup.as_deref(), Some("C"));
        assert_eq!(draft.dropoff.as_deref(), Some("B"));
    }

    #[test]
    fn sequential_merges_equal_one_combined_merge() {
        let p1 = patch(|d| {
            d.service_type = Some(ServiceType::Delivery);
            d.pickup = Some("X".to_string());
        });
        let p2 = patch(|d| {
            d.pickup = Some("Y".to_string());
            d.parcel_description = Some("box".to_string());
        });

        let mut sequential = Draft::default();
        sequential.apply(p1.clone());
        sequential.apply(p2.clone());

        let mut combined_patch = p1;
        combined_patch.apply(p2);
        let mut combined = Draft::default();
        combined.apply(combined_patch);

        assert_eq!(sequential, combined);
    }

    #[test]
    fn empty_patch_changes_nothing() {
        let mut draft = patch(|d| {
            d.service_type = Some(ServiceType::Ems);
            d.pickup = Some("Depot".to_string());
        });
        let before = draft.clone();
        draft.apply(Draft::default());
        assert_eq!(draft, before);
    }
}
