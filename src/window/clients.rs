//! Distinct-client tracking over a trailing window.
//!
//! Bookings are appended to a log and evicted by walking a cursor forward.
//! Because booking times are non-decreasing the stale bound only moves
//! forward, so every log entry is visited for eviction exactly once.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use tracing::{error, trace};

use super::{check_order, ClientId, StatsError, Time, WindowSpan};

/// Evicted prefix length below which the log is never compacted.
pub const COMPACTION_MIN_EVICTED: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ClientBooking {
    time: Time,
    client_id: ClientId,
}

/// Counts clients with at least one booking inside the window.
#[derive(Debug, Clone)]
pub struct ClientWindowTracker {
    span: WindowSpan,
    /// Booking history, oldest first. Entries before `cursor` are evicted.
    log: Vec<ClientBooking>,
    cursor: usize,
    /// Live bookings per client. Clients with no live booking are absent.
    active: HashMap<ClientId, u32>,
    // Invariant: distinct == active.len()
    distinct: usize,
    latest: Option<Time>,
}

impl ClientWindowTracker {
    pub fn new(span: WindowSpan) -> Self {
        Self {
            span,
            log: Vec::new(),
            cursor: 0,
            active: HashMap::new(),
            distinct: 0,
            latest: None,
        }
    }

    /// Record a booking by `client_id` at `time`, then evict stale bookings.
    pub fn record(&mut self, time: Time, client_id: ClientId) -> Result<(), StatsError> {
        check_order(self.latest, time)?;

        self.register(time, client_id);
        self.latest = Some(time);
        if let Some(stale) = self.span.stale_up_to(time) {
            self.evict_up_to(stale);
            self.compact();
        }
        Ok(())
    }

    /// Number of distinct clients with a live booking.
    #[inline]
    pub fn distinct_count_within_window(&self) -> usize {
        self.distinct
    }

    #[inline]
    pub fn latest_time(&self) -> Option<Time> {
        self.latest
    }

    #[inline]
    pub fn window_span(&self) -> WindowSpan {
        self.span
    }

    /// Bookings still inside the window.
    #[inline]
    pub fn live_bookings(&self) -> usize {
        self.log.len() - self.cursor
    }

    fn register(&mut self, time: Time, client_id: ClientId) {
        // Grow both containers before touching either so a failed
        // allocation leaves no half-registered booking behind.
        self.log.reserve(1);
        if !self.active.contains_key(&client_id) {
            self.active.reserve(1);
        }

        self.log.push(ClientBooking { time, client_id });
        let count = self.active.entry(client_id).or_insert(0);
        *count += 1;
        if *count == 1 {
            self.distinct += 1;
        }
    }

    fn evict_up_to(&mut self, stale: Time) {
        let start = self.cursor;
        while let Some(&booking) = self.log.get(self.cursor) {
            if booking.time > stale {
                break;
            }
            self.cursor += 1;
            self.unregister(booking.client_id);
        }
        if self.cursor > start {
            trace!(
                evicted = self.cursor - start,
                stale_up_to = stale,
                distinct = self.distinct,
                "evicted client bookings"
            );
        }
    }

    fn unregister(&mut self, client_id: ClientId) {
        match self.active.entry(client_id) {
            Entry::Occupied(mut entry) => {
                let count = entry.get_mut();
                *count -= 1;
                if *count == 0 {
                    entry.remove();
                    self.distinct -= 1;
                }
            }
            Entry::Vacant(_) => {
                // Every logged booking was counted on insert, so this is a bug.
                debug_assert!(false, "evicting client {} with no live bookings", client_id);
                error!(client_id, "evicting client with no live bookings");
            }
        }
    }

    /// Drop the evicted prefix once it dominates the log.
    fn compact(&mut self) {
        if self.cursor >= COMPACTION_MIN_EVICTED && self.cursor * 2 >= self.log.len() {
            self.log.drain(..self.cursor);
            self.cursor = 0;
        }
    }
}
