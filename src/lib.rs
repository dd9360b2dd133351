//! Hotel Booking Statistics Library
//!
//! Sliding-window booking statistics per hotel: distinct clients and booked
//! rooms over the trailing window `(latest - span, latest]`.
//!
//! # Architecture
//!
//! ```text
//! CommandInterpreter ─▶ StatsRegistry ─▶ EntityStats ─┬─▶ ClientWindowTracker
//!  (BOOK/CLIENTS/ROOMS)   (hotel index)   (per hotel)  └─▶ VolumeWindowTracker
//! ```
//!
//! Eviction happens only when a booking arrives; queries are pure reads.

pub mod config;
pub mod interpreter;
pub mod registry;
pub mod stats;
pub mod window;

pub use config::StatsConfig;
pub use interpreter::{Command, CommandError, CommandInterpreter, RunSummary};
pub use registry::{MapKind, StatsRegistry};
pub use stats::{EntityStats, EntityStatsSnapshot};
pub use window::{
    ClientId, ClientWindowTracker, RoomCount, RoomTotal, StatsError, Time, VolumeWindowTracker,
    WindowSpan, WindowSpanError, DEFAULT_WINDOW_SPAN,
};
