use chrono::{DateTime, NaiveDate, Utc};

use crate::error::AppError;
use crate::models::booking::{Contact, ServiceDetail};
use crate::models::draft::{ClientType, Draft, ServiceType, TimeMode};

/// A draft that passed the commit-boundary check: the service-specific
/// fields are frozen into a `ServiceDetail` variant and the schedule is
/// consistent.
#[derive(Debug)]
pub struct ValidDraft {
    pub detail: ServiceDetail,
    pub client_type: Option<ClientType>,
    pub time_mode: TimeMode,
    pub scheduled_time: Option<DateTime<Utc>>,
}

/// Validates completeness once, at commit, rather than per wizard page.
/// Fails with `IncompleteDraft` naming every missing field so the caller
/// can report exactly what is unmet.
pub fn validate(draft: &Draft) -> Result<ValidDraft, AppError> {
    let Some(service_type) = draft.service_type else {
        return Err(AppError::IncompleteDraft(vec!["service_type"]));
    };

    let mut missing: Vec<&'static str> = Vec::new();
    let detail = build_detail(draft, service_type, &mut missing);

    let time_mode = draft.time_mode.unwrap_or_default();
    if time_mode == TimeMode::Later && draft.scheduled_time.is_none() {
        missing.push("scheduled_time");
    }

    if !missing.is_empty() {
        return Err(AppError::IncompleteDraft(missing));
    }

    if let (Some(start), Some(end)) = (draft.start_date, draft.end_date) {
        if end < start {
            return Err(AppError::BadRequest(format!(
                "end_date {end} is before start_date {start}"
            )));
        }
    }

    Ok(ValidDraft {
        detail,
        client_type: draft.client_type,
        time_mode,
        scheduled_time: draft.scheduled_time,
    })
}

// Placeholder values fill missing slots so the whole required set can be
// reported in one pass; the result is discarded unless `missing` stays empty.
fn build_detail(
    draft: &Draft,
    service_type: ServiceType,
    missing: &mut Vec<&'static str>,
) -> ServiceDetail {
    match service_type {
        ServiceType::Ride => ServiceDetail::Ride {
            contact: contact(draft, missing),
            pickup: text(&draft.pickup, "pickup", missing),
            dropoff: text(&draft.dropoff, "dropoff", missing),
        },
        ServiceType::Delivery => ServiceDetail::Delivery {
            sender: Contact {
                name: text(&draft.sender_name, "sender_name", missing),
                phone: text(&draft.sender_phone, "sender_phone", missing),
            },
            recipient: Contact {
                name: text(&draft.recipient_name, "recipient_name", missing),
                phone: text(&draft.recipient_phone, "recipient_phone", missing),
            },
            pickup: text(&draft.pickup, "pickup", missing),
            dropoff: text(&draft.dropoff, "dropoff", missing),
            parcel_description: text(&draft.parcel_description, "parcel_description", missing),
        },
        ServiceType::Rental => ServiceDetail::Rental {
            contact: contact(draft, missing),
            pickup: text(&draft.pickup, "pickup", missing),
            start_date: date(draft.start_date, "start_date", missing),
            end_date: date(draft.end_date, "end_date", missing),
        },
        ServiceType::SchoolShuttle => ServiceDetail::SchoolShuttle {
            contact: contact(draft, missing),
            pickup: text(&draft.pickup, "pickup", missing),
            dropoff: text(&draft.dropoff, "dropoff", missing),
            group_size: match draft.group_size {
                Some(n) if n > 0 => n,
                _ => {
                    missing.push("group_size");
                    0
                }
            },
        },
        ServiceType::Tour => ServiceDetail::Tour {
            contact: contact(draft, missing),
            package_name: text(&draft.package_name, "package_name", missing),
            pickup: text(&draft.pickup, "pickup", missing),
            start_date: date(draft.start_date, "start_date", missing),
            end_date: date(draft.end_date, "end_date", missing),
        },
        ServiceType::Ems => ServiceDetail::Ems {
            contact: contact(draft, missing),
            pickup: text(&draft.pickup, "pickup", missing),
        },
    }
}

fn contact(draft: &Draft, missing: &mut Vec<&'static str>) -> Contact {
    Contact {
        name: text(&draft.contact_name, "contact_name", missing),
        phone: text(&draft.contact_phone, "contact_phone", missing),
    }
}

fn text(value: &Option<String>, name: &'static str, missing: &mut Vec<&'static str>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.clone(),
        _ => {
            missing.push(name);
            String::new()
        }
    }
}

fn date(value: Option<NaiveDate>, name: &'static str, missing: &mut Vec<&'static str>) -> NaiveDate {
    match value {
        Some(v) => v,
        None => {
            missing.push(name);
            NaiveDate::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::validate;
    use crate::error::AppError;
    use crate::models::booking::ServiceDetail;
    use crate::models::draft::{Draft, ServiceType, TimeMode};

    fn delivery_draft() -> Draft {
        Draft {
            service_type: Some(ServiceType::Delivery),
            sender_name: Some("A".to_string()),
            sender_phone: Some("+1".to_string()),
            recipient_name: Some("B".to_string()),
            recipient_phone: Some("+2".to_string()),
            pickup: Some("X".to_string()),
            dropoff: Some("Y".to_string()),
            parcel_description: Some("box".to_string()),
            ..Draft::default()
        }
    }

    #[test]
    fn complete_delivery_draft_validates() {
        let valid = validate(&delivery_draft()).unwrap();
        match valid.detail {
            ServiceDetail::Delivery { sender, dropoff, .. } => {
                assert_eq!(sender.name, "A");
                assert_eq!(dropoff, "Y");
            }
            other => panic!("unexpected detail: {other:?}"),
        }
    }

    #[test]
    fn missing_dropoff_is_named() {
        let mut draft = delivery_draft();
        draft.dropoff = None;

        match validate(&draft) {
            Err(AppError::IncompleteDraft(missing)) => assert_eq!(missing, vec!["dropoff"]),
            other => panic!("expected IncompleteDraft, got {other:?}"),
        }
    }

    #[test]
    fn blank_strings_count_as_missing() {
        let mut draft = delivery_draft();
        draft.pickup = Some("   ".to_string());

        match validate(&draft) {
            Err(AppError::IncompleteDraft(missing)) => assert_eq!(missing, vec!["pickup"]),
            other => panic!("expected IncompleteDraft, got {other:?}"),
        }
    }

    #[test]
    fn empty_draft_reports_service_type() {
        match validate(&Draft::default()) {
            Err(AppError::IncompleteDraft(missing)) => assert_eq!(missing, vec!["service_type"]),
            other => panic!("expected IncompleteDraft, got {other:?}"),
        }
    }

    #[test]
    fn tour_requires_package_and_dates() {
        let draft = Draft {
            service_type: Some(ServiceType::Tour),
            contact_name: Some("C".to_string()),
            contact_phone: Some("+3".to_string()),
            pickup: Some("Harbor".to_string()),
            ..Draft::default()
        };

        match validate(&draft) {
            Err(AppError::IncompleteDraft(missing)) => {
                assert_eq!(missing, vec!["package_name", "start_date", "end_date"]);
            }
            other => panic!("expected IncompleteDraft, got {other:?}"),
        }
    }

    #[test]
    fn scheduled_later_requires_a_time() {
        let mut draft = delivery_draft();
        draft.time_mode = Some(TimeMode::Later);

        match validate(&draft) {
            Err(AppError::IncompleteDraft(missing)) => {
                assert_eq!(missing, vec!["scheduled_time"]);
            }
            other => panic!("expected IncompleteDraft, got {other:?}"),
        }
    }

    #[test]
    fn rental_dates_must_be_ordered() {
        let draft = Draft {
            service_type: Some(ServiceType::Rental),
            contact_name: Some("C".to_string()),
            contact_phone: Some("+3".to_string()),
            pickup: Some("Depot".to_string()),
            start_date: NaiveDate::from_ymd_opt(2026, 9, 10),
            end_date: NaiveDate::from_ymd_opt(2026, 9, 1),
            ..Draft::default()
        };

        assert!(matches!(validate(&draft), Err(AppError::BadRequest(_))));
    }
}
