use std::time::Instant;

use chrono::Utc;
use dashmap::mapref::one::RefMut;
use tracing::info;

use crate::engine::{assignment, validation};
use crate::error::AppError;
use crate::models::booking::{Booking, BookingEvent, BookingStatus};
use crate::state::AppState;

/// Turns the agent's draft into a persisted booking. On success the draft
/// is cleared; a committed draft can never be resurrected or committed
/// twice.
pub fn commit(state: &AppState, agent: &str) -> Result<Booking, AppError> {
    let start = Instant::now();
    let result = commit_draft(state, agent);

    let outcome = if result.is_ok() { "success" } else { "error" };
    state
        .metrics
        .commit_latency_seconds
        .with_label_values(&[outcome])
        .observe(start.elapsed().as_secs_f64());
    state
        .metrics
        .commits_total
        .with_label_values(&[outcome])
        .inc();

    result
}

fn commit_draft(state: &AppState, agent: &str) -> Result<Booking, AppError> {
    // Validation through insert runs under the draft's entry lock, and the
    // draft is removed through that same entry. A concurrent commit for the
    // same agent therefore sees an empty draft and fails IncompleteDraft
    // instead of producing a duplicate booking.
    let booking = state.drafts.take_on_success(agent, |draft| {
        let valid = validation::validate(draft)?;

        let driver = match draft.driver.clone() {
            Some(snapshot) => Some(snapshot),
            None if state.policy.allow_unassigned_commit => None,
            None => Some(assignment::resolve(state, valid.detail.service_type())?),
        };

        let status = if driver.is_some() {
            BookingStatus::Assigned
        } else {
            BookingStatus::New
        };

        let booking = Booking {
            id: state.next_booking_id(),
            created_at: Utc::now(),
            status,
            client_type: valid.client_type,
            detail: valid.detail,
            time_mode: valid.time_mode,
            scheduled_time: valid.scheduled_time,
            driver,
            follow_up: false,
            version: 1,
        };

        state.bookings.insert(booking.id.clone(), booking.clone());
        Ok::<_, AppError>(booking)
    })?;

    state.metrics.drafts_active.set(state.drafts.len() as i64);
    state
        .metrics
        .transitions_total
        .with_label_values(&[booking.status.as_str()])
        .inc();

    publish(state, &booking);
    info!(booking_id = %booking.id, status = ?booking.status, "booking committed");

    Ok(booking)
}

pub fn mark_follow_up(state: &AppState, id: &str) -> Result<Booking, AppError> {
    let mut booking = get_booking_mut(state, id)?;

    if booking.status.is_terminal() {
        return Err(AppError::AlreadyTerminal(id.to_string()));
    }

    booking.follow_up = true;
    booking.version += 1;

    publish(state, &booking);
    info!(booking_id = %booking.id, "booking flagged for follow-up");

    Ok(booking.clone())
}

/// Idempotent: cancelling an already-cancelled booking returns it as-is.
/// Cancelling a completed booking is still an invalid transition.
pub fn cancel(state: &AppState, id: &str) -> Result<Booking, AppError> {
    let mut booking = get_booking_mut(state, id)?;

    if booking.status == BookingStatus::Cancelled {
        return Ok(booking.clone());
    }

    transition(state, &mut booking, BookingStatus::Cancelled)?;

    publish(state, &booking);
    info!(booking_id = %booking.id, "booking cancelled");

    Ok(booking.clone())
}

/// New -> Assigned, resolving a driver for the booking's service type.
pub fn assign_driver(state: &AppState, id: &str) -> Result<Booking, AppError> {
    let mut booking = get_booking_mut(state, id)?;

    if booking.status != BookingStatus::New {
        return Err(AppError::InvalidTransition {
            from: booking.status,
            to: BookingStatus::Assigned,
        });
    }

    let snapshot = assignment::resolve(state, booking.detail.service_type())?;
    booking.driver = Some(snapshot);
    transition(state, &mut booking, BookingStatus::Assigned)?;

    publish(state, &booking);
    info!(booking_id = %booking.id, "driver assigned to booking");

    Ok(booking.clone())
}

pub fn start(state: &AppState, id: &str) -> Result<Booking, AppError> {
    let mut booking = get_booking_mut(state, id)?;
    transition(state, &mut booking, BookingStatus::InProgress)?;

    publish(state, &booking);
    info!(booking_id = %booking.id, "booking started");

    Ok(booking.clone())
}

pub fn complete(state: &AppState, id: &str) -> Result<Booking, AppError> {
    let mut booking = get_booking_mut(state, id)?;
    transition(state, &mut booking, BookingStatus::Completed)?;

    publish(state, &booking);
    info!(booking_id = %booking.id, "booking completed");

    Ok(booking.clone())
}

// The DashMap entry lock serializes mutations per booking id; the version
// counter makes every accepted write observable to stale readers.
fn get_booking_mut<'a>(
    state: &'a AppState,
    id: &str,
) -> Result<RefMut<'a, String, Booking>, AppError> {
    state
        .bookings
        .get_mut(id)
        .ok_or_else(|| AppError::NotFound(format!("booking {id} not found")))
}

fn transition(
    state: &AppState,
    booking: &mut Booking,
    next: BookingStatus,
) -> Result<(), AppError> {
    if !booking.status.can_become(next) {
        return Err(AppError::InvalidTransition {
            from: booking.status,
            to: next,
        });
    }

    booking.status = next;
    booking.version += 1;
    state
        .metrics
        .transitions_total
        .with_label_values(&[next.as_str()])
        .inc();

    Ok(())
}

fn publish(state: &AppState, booking: &Booking) {
    let _ = state.booking_events_tx.send(BookingEvent {
        booking_id: booking.id.clone(),
        status: booking.status,
        follow_up: booking.follow_up,
        at: Utc::now(),
    });
}
