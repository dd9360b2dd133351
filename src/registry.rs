//! Booking Statistics Registry
//!
//! Maps hotel name to its [`EntityStats`]. Hotels are created on their first
//! booking and live as long as the registry. Queries never create entries:
//! an unknown hotel simply reports zero for both statistics.
//!
//! The backing map is chosen at construction via [`MapKind`]:
//! - `Hashed`: `HashMap`, expected O(1) lookup.
//! - `Ordered`: `BTreeMap`, guaranteed O(log N) even under adversarial names.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::stats::{EntityStats, EntityStatsSnapshot};
use crate::window::{ClientId, RoomCount, RoomTotal, StatsError, Time, WindowSpan};

/// Backing map used for the hotel index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapKind {
    #[default]
    Hashed,
    Ordered,
}

impl MapKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hashed => "hashed",
            Self::Ordered => "ordered",
        }
    }
}

impl std::fmt::Display for MapKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MapKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hashed" => Ok(Self::Hashed),
            "ordered" => Ok(Self::Ordered),
            other => Err(format!("unknown map kind '{}' (expected hashed or ordered)", other)),
        }
    }
}

#[derive(Debug, Clone)]
enum HotelIndex {
    Hashed(HashMap<String, EntityStats>),
    Ordered(BTreeMap<String, EntityStats>),
}

impl HotelIndex {
    fn new(kind: MapKind) -> Self {
        match kind {
            MapKind::Hashed => Self::Hashed(HashMap::new()),
            MapKind::Ordered => Self::Ordered(BTreeMap::new()),
        }
    }

    fn get(&self, name: &str) -> Option<&EntityStats> {
        match self {
            Self::Hashed(map) => map.get(name),
            Self::Ordered(map) => map.get(name),
        }
    }

    fn get_mut(&mut self, name: &str) -> Option<&mut EntityStats> {
        match self {
            Self::Hashed(map) => map.get_mut(name),
            Self::Ordered(map) => map.get_mut(name),
        }
    }

    fn insert(&mut self, name: &str, stats: EntityStats) -> &mut EntityStats {
        match self {
            Self::Hashed(map) => map.entry(name.to_owned()).or_insert(stats),
            Self::Ordered(map) => map.entry(name.to_owned()).or_insert(stats),
        }
    }

    fn len(&self) -> usize {
        match self {
            Self::Hashed(map) => map.len(),
            Self::Ordered(map) => map.len(),
        }
    }
}

/// Window statistics for every booked hotel.
#[derive(Debug, Clone)]
pub struct StatsRegistry {
    span: WindowSpan,
    kind: MapKind,
    hotels: HotelIndex,
}

impl Default for StatsRegistry {
    fn default() -> Self {
        Self::new(WindowSpan::default())
    }
}

impl StatsRegistry {
    pub fn new(span: WindowSpan) -> Self {
        Self::with_map_kind(span, MapKind::default())
    }

    pub fn with_map_kind(span: WindowSpan, kind: MapKind) -> Self {
        Self {
            span,
            kind,
            hotels: HotelIndex::new(kind),
        }
    }

    /// Record a booking, creating the hotel on first use.
    ///
    /// An out-of-order booking is rejected and, for an existing hotel, leaves
    /// its statistics untouched. A new hotel can never reject its first booking.
    pub fn record(
        &mut self,
        time: Time,
        hotel: &str,
        client_id: ClientId,
        rooms: RoomCount,
    ) -> Result<(), StatsError> {
        let span = self.span;
        let stats = match self.hotels.get_mut(hotel) {
            Some(stats) => stats,
            None => {
                debug!(hotel, span = span.get(), "tracking new hotel");
                self.hotels.insert(hotel, EntityStats::new(span))
            }
        };

        stats.record(time, client_id, rooms).map_err(|e| {
            warn!(hotel, time, error = %e, "booking rejected");
            e
        })
    }

    /// Distinct clients of `hotel` inside the window, 0 if never booked.
    pub fn distinct_client_count_within_window(&self, hotel: &str) -> usize {
        self.hotels
            .get(hotel)
            .map_or(0, EntityStats::distinct_client_count_within_window)
    }

    /// Rooms booked at `hotel` inside the window, 0 if never booked.
    pub fn booked_volume_within_window(&self, hotel: &str) -> RoomTotal {
        self.hotels
            .get(hotel)
            .map_or(0, EntityStats::booked_volume_within_window)
    }

    pub fn snapshot(&self, hotel: &str) -> Option<EntityStatsSnapshot> {
        self.hotels.get(hotel).map(EntityStats::snapshot)
    }

    pub fn contains(&self, hotel: &str) -> bool {
        self.hotels.get(hotel).is_some()
    }

    pub fn entity_count(&self) -> usize {
        self.hotels.len()
    }

    pub fn window_span(&self) -> WindowSpan {
        self.span
    }

    pub fn map_kind(&self) -> MapKind {
        self.kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HILTON: &str = "Hilton";
    const RADISSON: &str = "Radisson";

    fn registry(span: Time, kind: MapKind) -> StatsRegistry {
        StatsRegistry::with_map_kind(WindowSpan::new(span).unwrap(), kind)
    }

    #[test]
    fn test_booking_service_scenario() {
        for kind in [MapKind::Hashed, MapKind::Ordered] {
            let mut service = registry(5, kind);

            assert_eq!(service.booked_volume_within_window(HILTON), 0);
            assert_eq!(service.distinct_client_count_within_window(RADISSON), 0);

            service.record(0, HILTON, 1234, 3).unwrap();
            assert_eq!(service.booked_volume_within_window(HILTON), 3);
            assert_eq!(service.distinct_client_count_within_window(HILTON), 1);
            assert_eq!(service.booked_volume_within_window(RADISSON), 0);
            assert_eq!(service.distinct_client_count_within_window(RADISSON), 0);
        }
    }

    #[test]
    fn test_queries_do_not_create_hotels() {
        let service = StatsRegistry::default();
        assert_eq!(service.distinct_client_count_within_window("Nowhere"), 0);
        assert_eq!(service.booked_volume_within_window("Nowhere"), 0);
        assert_eq!(service.entity_count(), 0);
        assert!(service.snapshot("Nowhere").is_none());
    }

    #[test]
    fn test_default_registry_uses_one_day_window() {
        let service = StatsRegistry::default();
        assert_eq!(service.window_span().get(), 86_400);
        assert_eq!(service.map_kind(), MapKind::Hashed);
    }

    #[test]
    fn test_hotel_names_are_exact() {
        let mut service = registry(5, MapKind::Hashed);
        service.record(0, "hilton", 1, 2).unwrap();
        assert_eq!(service.booked_volume_within_window("Hilton"), 0);
        assert_eq!(service.booked_volume_within_window("hilton "), 0);
        assert_eq!(service.booked_volume_within_window("hilton"), 2);
    }

    #[test]
    fn test_hotels_slide_independently() {
        let mut service = registry(10, MapKind::Ordered);
        service.record(0, HILTON, 1, 5).unwrap();
        service.record(100, RADISSON, 2, 7).unwrap();

        // Radisson's later booking must not evict Hilton's history.
        assert_eq!(service.booked_volume_within_window(HILTON), 5);
        assert_eq!(service.distinct_client_count_within_window(HILTON), 1);

        // Ordering is per hotel, so an earlier time is fine elsewhere.
        service.record(5, HILTON, 3, 1).unwrap();
        assert_eq!(service.distinct_client_count_within_window(HILTON), 2);
        assert_eq!(service.entity_count(), 2);
    }

    #[test]
    fn test_out_of_order_booking_rejected() {
        let mut service = registry(10, MapKind::Hashed);
        service.record(50, HILTON, 1, 5).unwrap();

        let err = service.record(49, HILTON, 2, 5).unwrap_err();
        assert_eq!(err, StatsError::OutOfOrder { latest: 50, got: 49 });
        assert_eq!(service.booked_volume_within_window(HILTON), 5);
        assert_eq!(service.distinct_client_count_within_window(HILTON), 1);
    }

    #[test]
    fn test_map_kinds_agree() {
        let mut hashed = registry(7, MapKind::Hashed);
        let mut ordered = registry(7, MapKind::Ordered);
        let hotels = ["a", "b", "c"];

        for i in 0..300i64 {
            let hotel = hotels[(i % 3) as usize];
            let client = (i * 31 % 11) as ClientId;
            let rooms = (i % 13) as RoomCount;
            hashed.record(i / 2, hotel, client, rooms).unwrap();
            ordered.record(i / 2, hotel, client, rooms).unwrap();
        }
        for hotel in hotels {
            assert_eq!(hashed.snapshot(hotel), ordered.snapshot(hotel));
        }
    }

    #[test]
    fn test_map_kind_parse() {
        assert_eq!("hashed".parse::<MapKind>(), Ok(MapKind::Hashed));
        assert_eq!("ordered".parse::<MapKind>(), Ok(MapKind::Ordered));
        assert!("sorted".parse::<MapKind>().is_err());
        assert_eq!(MapKind::Ordered.to_string(), "ordered");
    }
}
