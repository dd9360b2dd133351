//! Sliding-Window Trackers
//!
//! Per-hotel statistics over a trailing time window `(latest - span, latest]`.
//!
//! # Eviction Rule
//!
//! For the latest recorded time `t` and window span `W`:
//! - An event at time `e` is **live** iff `e > t - W`.
//! - An event at exactly `t - W` is **stale** and is evicted.
//!
//! Both trackers only evict on `record`; queries never mutate.
//!
//! # Ordering
//!
//! Times must be non-decreasing per tracker. A booking older than the latest
//! recorded time is rejected with [`StatsError::OutOfOrder`] before any state
//! changes, so the eviction cursor only ever moves forward.

pub mod clients;
pub mod volume;

pub use clients::ClientWindowTracker;
pub use volume::VolumeWindowTracker;

/// Integer time ticks (seconds by convention, no calendar semantics).
pub type Time = i64;

/// Client identifier as carried on the `BOOK` command.
pub type ClientId = u32;

/// Rooms booked by a single booking.
pub type RoomCount = u32;

/// Rooms booked within the window. Wider than [`RoomCount`] so sums never wrap.
pub type RoomTotal = u64;

/// Default statistics window: one day in seconds.
pub const DEFAULT_WINDOW_SPAN: Time = 24 * 60 * 60;

/// Validated, non-negative window span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WindowSpan(Time);

impl WindowSpan {
    pub fn new(span: Time) -> Result<Self, WindowSpanError> {
        if span < 0 {
            return Err(WindowSpanError::Negative(span));
        }
        Ok(Self(span))
    }

    #[inline]
    pub fn get(self) -> Time {
        self.0
    }

    /// Latest stale time for a window ending at `latest`.
    ///
    /// Everything at or before the returned value is outside the window.
    /// `None` when `latest - span` falls below `Time::MIN`: nothing is stale.
    #[inline]
    pub fn stale_up_to(self, latest: Time) -> Option<Time> {
        latest.checked_sub(self.0)
    }
}

impl Default for WindowSpan {
    fn default() -> Self {
        Self(DEFAULT_WINDOW_SPAN)
    }
}

impl TryFrom<i64> for WindowSpan {
    type Error = WindowSpanError;

    fn try_from(span: i64) -> Result<Self, Self::Error> {
        Self::new(span)
    }
}

impl std::fmt::Display for WindowSpan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Invalid window span configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowSpanError {
    Negative(Time),
}

impl std::fmt::Display for WindowSpanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Negative(span) => write!(f, "window span must be non-negative, got {}", span),
        }
    }
}

impl std::error::Error for WindowSpanError {}

/// Errors raised by recording a booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatsError {
    /// Booking time precedes the latest time already recorded.
    OutOfOrder { latest: Time, got: Time },
}

impl std::fmt::Display for StatsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OutOfOrder { latest, got } => write!(
                f,
                "out-of-order booking: time {} precedes latest recorded time {}",
                got, latest
            ),
        }
    }
}

impl std::error::Error for StatsError {}

/// Reject `time` if it is older than `latest`.
#[inline]
pub(crate) fn check_order(latest: Option<Time>, time: Time) -> Result<(), StatsError> {
    match latest {
        Some(latest) if time < latest => Err(StatsError::OutOfOrder { latest, got: time }),
        _ => Ok(()),
    }
}
