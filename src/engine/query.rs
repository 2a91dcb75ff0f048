use crate::error::AppError;
use crate::models::booking::Booking;
use crate::state::AppState;

/// Read-only lookups. All mutation goes through `engine::lifecycle` so the
/// state-machine invariants are enforced in one place.
pub fn get_by_id(state: &AppState, id: &str) -> Result<Booking, AppError> {
    state
        .bookings
        .get(id)
        .map(|entry| entry.value().clone())
        .ok_or_else(|| AppError::NotFound(format!("booking {id} not found")))
}

/// Newest first; the sequence in the id breaks same-instant ties.
pub fn list_all(state: &AppState) -> Vec<Booking> {
    let mut bookings: Vec<Booking> = state
        .bookings
        .iter()
        .map(|entry| entry.value().clone())
        .collect();

    bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
    bookings
}
