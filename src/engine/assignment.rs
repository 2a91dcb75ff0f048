use tracing::info;

use crate::config::AssignmentStrategy;
use crate::error::AppError;
use crate::models::draft::ServiceType;
use crate::models::driver::{Driver, DriverSnapshot, DriverStatus};
use crate::state::AppState;

/// Selects an eligible driver for a service type and returns a snapshot
/// frozen at this moment. The driver record itself is never mutated by the
/// booking flow.
pub fn resolve(state: &AppState, service_type: ServiceType) -> Result<DriverSnapshot, AppError> {
    let mut candidates: Vec<Driver> = state
        .drivers
        .iter()
        .filter_map(|entry| {
            let driver = entry.value();
            let eligible = driver.status == DriverStatus::Available
                && driver.battery_level >= state.policy.min_battery
                && driver.services.contains(&service_type);

            if eligible {
                Some(driver.clone())
            } else {
                None
            }
        })
        .collect();

    if candidates.is_empty() {
        return Err(AppError::NoEligibleDriver);
    }

    // Sorted by id so both strategies are deterministic for a given pool.
    candidates.sort_by(|a, b| a.id.cmp(&b.id));

    let chosen = match state.policy.strategy {
        AssignmentStrategy::Nearest => candidates
            .iter()
            .min_by(|a, b| a.distance_km.total_cmp(&b.distance_km))
            .ok_or_else(|| AppError::Internal("failed to rank drivers".to_string()))?,
        AssignmentStrategy::RoundRobin => {
            let index = state.next_round_robin_index(candidates.len());
            &candidates[index]
        }
    };

    info!(
        driver_id = %chosen.id,
        service_type = ?service_type,
        battery = chosen.battery_level,
        "driver resolved"
    );

    Ok(chosen.snapshot())
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::resolve;
    use crate::config::{AssignmentStrategy, DispatchPolicy};
    use crate::error::AppError;
    use crate::models::draft::ServiceType;
    use crate::models::driver::{Driver, DriverStatus};
    use crate::state::AppState;

    fn driver(
        id_seed: u128,
        status: DriverStatus,
        battery: u8,
        distance_km: f64,
        services: Vec<ServiceType>,
    ) -> Driver {
        Driver {
            id: Uuid::from_u128(id_seed),
            name: format!("driver-{id_seed}"),
            vehicle: "Leaf".to_string(),
            battery_level: battery,
            status,
            services,
            distance_km,
            updated_at: Utc::now(),
        }
    }

    fn state_with(policy: DispatchPolicy, drivers: Vec<Driver>) -> AppState {
        let state = AppState::new(policy, 16);
        for d in drivers {
            state.drivers.insert(d.id, d);
        }
        state
    }

    #[test]
    fn nearest_picks_lowest_declared_distance() {
        let state = state_with(
            DispatchPolicy::default(),
            vec![
                driver(1, DriverStatus::Available, 90, 4.0, vec![ServiceType::Ride]),
                driver(2, DriverStatus::Available, 90, 1.5, vec![ServiceType::Ride]),
            ],
        );

        let snapshot = resolve(&state, ServiceType::Ride).unwrap();
        assert_eq!(snapshot.id, Uuid::from_u128(2));
    }

    #[test]
    fn distance_ties_break_by_driver_id() {
        let state = state_with(
            DispatchPolicy::default(),
            vec![
                driver(7, DriverStatus::Available, 90, 2.0, vec![ServiceType::Ride]),
                driver(3, DriverStatus::Available, 90, 2.0, vec![ServiceType::Ride]),
            ],
        );

        let snapshot = resolve(&state, ServiceType::Ride).unwrap();
        assert_eq!(snapshot.id, Uuid::from_u128(3));
    }

    #[test]
    fn offline_and_busy_drivers_are_skipped() {
        let state = state_with(
            DispatchPolicy::default(),
            vec![
                driver(1, DriverStatus::Offline, 90, 0.5, vec![ServiceType::Ride]),
                driver(2, DriverStatus::Busy, 90, 0.5, vec![ServiceType::Ride]),
                driver(3, DriverStatus::Available, 90, 9.0, vec![ServiceType::Ride]),
            ],
        );

        let snapshot = resolve(&state, ServiceType::Ride).unwrap();
        assert_eq!(snapshot.id, Uuid::from_u128(3));
    }

    #[test]
    fn low_battery_drivers_are_skipped() {
        let policy = DispatchPolicy {
            min_battery: 30,
            ..DispatchPolicy::default()
        };
        let state = state_with(
            policy,
            vec![
                driver(1, DriverStatus::Available, 20, 0.5, vec![ServiceType::Ems]),
                driver(2, DriverStatus::Available, 55, 3.0, vec![ServiceType::Ems]),
            ],
        );

        let snapshot = resolve(&state, ServiceType::Ems).unwrap();
        assert_eq!(snapshot.id, Uuid::from_u128(2));
    }

    #[test]
    fn capability_mismatch_yields_no_eligible_driver() {
        let state = state_with(
            DispatchPolicy::default(),
            vec![driver(
                1,
                DriverStatus::Available,
                90,
                1.0,
                vec![ServiceType::Delivery],
            )],
        );

        assert!(matches!(
            resolve(&state, ServiceType::Tour),
            Err(AppError::NoEligibleDriver)
        ));
    }

    #[test]
    fn round_robin_rotates_through_eligible_drivers() {
        let policy = DispatchPolicy {
            strategy: AssignmentStrategy::RoundRobin,
            ..DispatchPolicy::default()
        };
        let state = state_with(
            policy,
            vec![
                driver(1, DriverStatus::Available, 90, 1.0, vec![ServiceType::Ride]),
                driver(2, DriverStatus::Available, 90, 1.0, vec![ServiceType::Ride]),
            ],
        );

        let first = resolve(&state, ServiceType::Ride).unwrap();
        let second = resolve(&state, ServiceType::Ride).unwrap();
        let third = resolve(&state, ServiceType::Ride).unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(first.id, third.id);
    }
}
