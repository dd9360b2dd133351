//! Booked-room volume over a trailing window.
//!
//! Bookings at the same instant are merged into one bucket, so the queue
//! holds at most one entry per distinct timestamp inside the window.

use std::collections::VecDeque;

use tracing::trace;

use super::{check_order, RoomCount, RoomTotal, StatsError, Time, WindowSpan};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RoomBucket {
    time: Time,
    rooms: RoomTotal,
}

/// Sums rooms booked inside the window.
#[derive(Debug, Clone)]
pub struct VolumeWindowTracker {
    span: WindowSpan,
    buckets: VecDeque<RoomBucket>,
    // Invariant: total == sum of bucket rooms
    total: RoomTotal,
    latest: Option<Time>,
}

impl VolumeWindowTracker {
    pub fn new(span: WindowSpan) -> Self {
        Self {
            span,
            buckets: VecDeque::new(),
            total: 0,
            latest: None,
        }
    }

    /// Record `rooms` booked at `time`, then evict stale buckets.
    pub fn record(&mut self, time: Time, rooms: RoomCount) -> Result<(), StatsError> {
        check_order(self.latest, time)?;

        let rooms = RoomTotal::from(rooms);
        match self.buckets.back_mut() {
            Some(last) if last.time == time => last.rooms += rooms,
            _ => self.buckets.push_back(RoomBucket { time, rooms }),
        }
        self.total += rooms;
        self.latest = Some(time);

        if let Some(stale) = self.span.stale_up_to(time) {
            self.evict_up_to(stale);
        }
        Ok(())
    }

    /// Rooms booked inside the window.
    #[inline]
    pub fn booked_volume_within_window(&self) -> RoomTotal {
        self.total
    }

    #[inline]
    pub fn latest_time(&self) -> Option<Time> {
        self.latest
    }

    #[inline]
    pub fn window_span(&self) -> WindowSpan {
        self.span
    }

    fn evict_up_to(&mut self, stale: Time) {
        let mut evicted = 0usize;
        while let Some(front) = self.buckets.front() {
            if front.time > stale {
                break;
            }
            self.total -= front.rooms;
            self.buckets.pop_front();
            evicted += 1;
        }
        if evicted > 0 {
            trace!(evicted, stale_up_to = stale, total = self.total, "evicted room buckets");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker(span: Time) -> VolumeWindowTracker {
        VolumeWindowTracker::new(WindowSpan::new(span).unwrap())
    }

    #[test]
    fn test_fresh_tracker_is_empty() {
        let t = tracker(5);
        assert_eq!(t.booked_volume_within_window(), 0);
        assert_eq!(t.latest_time(), None);
    }

    #[test]
    fn test_sliding_scenario() {
        let mut t = tracker(5);
        let steps = [
            (0, 10, 10),
            (2, 10, 20),
            (2, 5, 25),
            (4, 20, 45),
            (5, 2, 37),
            (9, 100, 102),
            (50, 3, 3),
        ];
        for (time, rooms, expected) in steps {
            t.record(time, rooms).unwrap();
            assert_eq!(t.booked_volume_within_window(), expected, "after t={}", time);
        }
    }

    #[test]
    fn test_same_instant_merges_into_one_bucket() {
        let mut t = tracker(10);
        for _ in 0..5 {
            t.record(3, 2).unwrap();
        }
        assert_eq!(t.buckets.len(), 1);
        assert_eq!(t.booked_volume_within_window(), 10);

        t.record(13, 1).unwrap();
        assert_eq!(t.booked_volume_within_window(), 1);
        assert_eq!(t.buckets.len(), 1);
    }

    #[test]
    fn test_event_exactly_span_old_is_evicted() {
        let mut t = tracker(10);
        t.record(0, 7).unwrap();
        t.record(9, 1).unwrap();
        assert_eq!(t.booked_volume_within_window(), 8);

        t.record(10, 1).unwrap();
        assert_eq!(t.booked_volume_within_window(), 2);
    }

    #[test]
    fn test_total_does_not_wrap_at_room_count_max() {
        let mut t = tracker(100);
        t.record(0, RoomCount::MAX).unwrap();
        t.record(1, RoomCount::MAX).unwrap();
        assert_eq!(t.booked_volume_within_window(), 2 * RoomTotal::from(RoomCount::MAX));
    }

    #[test]
    fn test_out_of_order_rejected_without_mutation() {
        let mut t = tracker(5);
        t.record(4, 3).unwrap();

        let err = t.record(1, 9).unwrap_err();
        assert_eq!(err, StatsError::OutOfOrder { latest: 4, got: 1 });
        assert_eq!(t.booked_volume_within_window(), 3);
    }

    #[test]
    fn test_zero_rooms_still_advance_window() {
        let mut t = tracker(5);
        t.record(0, 4).unwrap();
        t.record(5, 0).unwrap();
        assert_eq!(t.booked_volume_within_window(), 0);
        assert_eq!(t.latest_time(), Some(5));
    }

    #[test]
    fn test_zero_span_keeps_ordering_guard() {
        let mut t = tracker(0);
        t.record(8, 4).unwrap();
        assert_eq!(t.booked_volume_within_window(), 0);
        assert!(t.buckets.is_empty());
        assert!(t.record(7, 1).is_err());
    }

    #[test]
    fn test_booking_at_time_min_is_counted() {
        let mut t = tracker(10);
        t.record(i64::MIN, 7).unwrap();
        assert_eq!(t.booked_volume_within_window(), 7);

        t.record(i64::MIN + 9, 1).unwrap();
        assert_eq!(t.booked_volume_within_window(), 8);

        t.record(i64::MIN + 10, 1).unwrap();
        assert_eq!(t.booked_volume_within_window(), 2);

        let mut wide = tracker(i64::MAX);
        wide.record(i64::MIN, 3).unwrap();
        wide.record(-5, 4).unwrap();
        assert_eq!(wide.booked_volume_within_window(), 7);
    }
}
