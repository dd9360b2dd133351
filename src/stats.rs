//! Per-hotel statistics: distinct clients and booked rooms in one window.

use serde::{Deserialize, Serialize};

use crate::window::{
    check_order, ClientId, ClientWindowTracker, RoomCount, RoomTotal, StatsError, Time,
    VolumeWindowTracker, WindowSpan,
};

/// Both window statistics for a single hotel.
#[derive(Debug, Clone)]
pub struct EntityStats {
    clients: ClientWindowTracker,
    rooms: VolumeWindowTracker,
}

/// Point-in-time view of an [`EntityStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityStatsSnapshot {
    pub distinct_clients: usize,
    pub booked_rooms: RoomTotal,
    pub latest_time: Option<Time>,
}

impl EntityStats {
    pub fn new(span: WindowSpan) -> Self {
        Self {
            clients: ClientWindowTracker::new(span),
            rooms: VolumeWindowTracker::new(span),
        }
    }

    /// Record one booking in both trackers.
    ///
    /// The ordering check runs first so either both trackers take the
    /// booking or neither does.
    pub fn record(
        &mut self,
        time: Time,
        client_id: ClientId,
        rooms: RoomCount,
    ) -> Result<(), StatsError> {
        check_order(self.latest_time(), time)?;
        self.clients.record(time, client_id)?;
        self.rooms.record(time, rooms)?;
        Ok(())
    }

    #[inline]
    pub fn distinct_client_count_within_window(&self) -> usize {
        self.clients.distinct_count_within_window()
    }

    #[inline]
    pub fn booked_volume_within_window(&self) -> RoomTotal {
        self.rooms.booked_volume_within_window()
    }

    #[inline]
    pub fn latest_time(&self) -> Option<Time> {
        self.clients.latest_time()
    }

    #[inline]
    pub fn window_span(&self) -> WindowSpan {
        self.clients.window_span()
    }

    pub fn snapshot(&self) -> EntityStatsSnapshot {
        EntityStatsSnapshot {
            distinct_clients: self.distinct_client_count_within_window(),
            booked_rooms: self.booked_volume_within_window(),
            latest_time: self.latest_time(),
        }
    }
}
