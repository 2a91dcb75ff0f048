use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use dashmap::DashMap;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::config::DispatchPolicy;
use crate::engine::drafts::DraftStore;
use crate::models::booking::{Booking, BookingEvent};
use crate::models::driver::Driver;
use crate::observability::metrics::Metrics;

pub struct AppState {
    pub drafts: DraftStore,
    pub bookings: DashMap<String, Booking>,
    pub drivers: DashMap<Uuid, Driver>,
    pub policy: DispatchPolicy,
    pub booking_events_tx: broadcast::Sender<BookingEvent>,
    pub metrics: Metrics,
    booking_seq: AtomicU64,
    rr_cursor: AtomicUsize,
}

impl AppState {
    pub fn new(policy: DispatchPolicy, event_buffer_size: usize) -> Self {
        let (booking_events_tx, _unused_rx) = broadcast::channel(event_buffer_size);

        Self {
            drafts: DraftStore::new(),
            bookings: DashMap::new(),
            drivers: DashMap::new(),
            policy,
            booking_events_tx,
            metrics: Metrics::new(),
            booking_seq: AtomicU64::new(1),
            rr_cursor: AtomicUsize::new(0),
        }
    }

    /// Human-readable booking codes: BK-0001, BK-0002, ...
    pub fn next_booking_id(&self) -> String {
        let n = self.booking_seq.fetch_add(1, Ordering::Relaxed);
        format!("BK-{n:04}")
    }

    pub fn next_round_robin_index(&self, len: usize) -> usize {
        self.rr_cursor.fetch_add(1, Ordering::Relaxed) % len
    }
}
