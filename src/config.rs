use std::env;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentStrategy {
    Nearest,
    RoundRobin,
}

/// Knobs the dispatch core consults at runtime. `allow_unassigned_commit`
/// decides whether a driverless commit lands in `New` (true) or auto-runs
/// the resolver and fails hard when no driver is eligible (false).
#[derive(Debug, Clone, Copy)]
pub struct DispatchPolicy {
    pub strategy: AssignmentStrategy,
    pub min_battery: u8,
    pub allow_unassigned_commit: bool,
}

impl Default for DispatchPolicy {
    fn default() -> Self {
        Self {
            strategy: AssignmentStrategy::Nearest,
            min_battery: 15,
            allow_unassigned_commit: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub http_port: u16,
    pub log_level: String,
    pub event_buffer_size: usize,
    pub policy: DispatchPolicy,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let _ = dotenvy::dotenv();

        let strategy = match env::var("ASSIGNMENT_STRATEGY").as_deref() {
            Err(_) | Ok("nearest") => AssignmentStrategy::Nearest,
            Ok("round-robin") => AssignmentStrategy::RoundRobin,
            Ok(other) => {
                return Err(AppError::Internal(format!(
                    "invalid ASSIGNMENT_STRATEGY: {other}"
                )))
            }
        };

        Ok(Self {
            http_port: parse_or_default("HTTP_PORT", 3000)?,
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            event_buffer_size: parse_or_default("EVENT_BUFFER_SIZE", 1024)?,
            policy: DispatchPolicy {
                strategy,
                min_battery: parse_or_default("MIN_BATTERY_PERCENT", 15)?,
                allow_unassigned_commit: parse_or_default("ALLOW_UNASSIGNED_COMMIT", false)?,
            },
        })
    }
}

fn parse_or_default<T>(key: &str, default: T) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|err| AppError::Internal(format!("invalid {key}: {err}"))),
        Err(_) => Ok(default),
    }
}
