//! Beacon RSSI cache
//!
//! Four beacons mark the corners of the play area. Every scan cycle
//! overwrites the whole cache: slots are reset to the stale sentinel first,
//! then filled with the first four service matches in discovery order, so a
//! direction not seen within a cycle reports as out-of-range.

use grouploop_hal::{Advertisement, ServiceUuid};

/// Signal value meaning "no signal observed this cycle"
pub const RSSI_SENTINEL: i8 = -128;

/// Number of beacon slots (one per cardinal direction)
pub const BEACON_SLOTS: usize = 4;

/// Cardinal direction labels, in slot order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    NorthWest,
    NorthEast,
    SouthEast,
    SouthWest,
}

impl Direction {
    /// Slot index of this direction
    pub const fn slot(self) -> usize {
        match self {
            Direction::NorthWest => 0,
            Direction::NorthEast => 1,
            Direction::SouthEast => 2,
            Direction::SouthWest => 3,
        }
    }

    /// Direction from its two-letter label
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "NW" => Some(Direction::NorthWest),
            "NE" => Some(Direction::NorthEast),
            "SE" => Some(Direction::SouthEast),
            "SW" => Some(Direction::SouthWest),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Direction::NorthWest => "NW",
            Direction::NorthEast => "NE",
            Direction::SouthEast => "SE",
            Direction::SouthWest => "SW",
        }
    }
}

/// Fixed 4-slot RSSI cache, overwritten wholesale each scan cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RssiCache {
    slots: [i8; BEACON_SLOTS],
}

impl Default for RssiCache {
    fn default() -> Self {
        Self::new()
    }
}

impl RssiCache {
    pub const fn new() -> Self {
        Self {
            slots: [RSSI_SENTINEL; BEACON_SLOTS],
        }
    }

    /// Reset every slot to the stale sentinel
    pub fn reset(&mut self) {
        self.slots = [RSSI_SENTINEL; BEACON_SLOTS];
    }

    /// Absorb one scan cycle's results
    ///
    /// All slots are reset first (including on a cycle with zero matches),
    /// then the first four advertisements carrying `service` are stored in
    /// discovery order. Returns the number of matches seen, which may
    /// exceed [`BEACON_SLOTS`].
    pub fn absorb(&mut self, adverts: &[Advertisement], service: &ServiceUuid) -> usize {
        self.reset();
        let mut matched = 0;
        for advert in adverts {
            if advert.advertises(service) {
                if matched < BEACON_SLOTS {
                    self.slots[matched] = advert.rssi;
                }
                matched += 1;
            }
        }
        matched
    }

    /// RSSI for a direction label
    pub fn get(&self, direction: Direction) -> i8 {
        self.slots[direction.slot()]
    }

    /// RSSI by slot index; out-of-range indices report the sentinel
    pub fn get_index(&self, index: usize) -> i8 {
        self.slots.get(index).copied().unwrap_or(RSSI_SENTINEL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SERVICE: ServiceUuid = [0xAB; 16];
    const OTHER: ServiceUuid = [0x01; 16];

    fn beacon(rssi: i8) -> Advertisement {
        Advertisement {
            service: Some(SERVICE),
            rssi,
        }
    }

    #[test]
    fn fills_first_four_matches_in_discovery_order() {
        let mut cache = RssiCache::new();
        let adverts = [
            Advertisement { service: None, rssi: -30 },
            beacon(-50),
            Advertisement { service: Some(OTHER), rssi: -35 },
            beacon(-60),
            beacon(-70),
            beacon(-80),
            beacon(-90), // fifth match is dropped
        ];
        let matched = cache.absorb(&adverts, &SERVICE);

        assert_eq!(matched, 5);
        assert_eq!(cache.get(Direction::NorthWest), -50);
        assert_eq!(cache.get(Direction::NorthEast), -60);
        assert_eq!(cache.get(Direction::SouthEast), -70);
        assert_eq!(cache.get(Direction::SouthWest), -80);
    }

    #[test]
    fn resets_all_slots_every_cycle() {
        let mut cache = RssiCache::new();
        cache.absorb(&[beacon(-40), beacon(-41), beacon(-42), beacon(-43)], &SERVICE);

        // Next cycle sees only one beacon: the rest must go stale
        cache.absorb(&[beacon(-55)], &SERVICE);
        assert_eq!(cache.get(Direction::NorthWest), -55);
        assert_eq!(cache.get(Direction::NorthEast), RSSI_SENTINEL);
        assert_eq!(cache.get(Direction::SouthEast), RSSI_SENTINEL);
        assert_eq!(cache.get(Direction::SouthWest), RSSI_SENTINEL);

        // A cycle with zero matches leaves everything stale
        cache.absorb(&[], &SERVICE);
        for i in 0..BEACON_SLOTS {
            assert_eq!(cache.get_index(i), RSSI_SENTINEL);
        }
    }

    #[test]
    fn out_of_range_index_reports_sentinel() {
        let cache = RssiCache::new();
        assert_eq!(cache.get_index(17), RSSI_SENTINEL);
    }

    #[test]
    fn labels_round_trip() {
        for dir in [
            Direction::NorthWest,
            Direction::NorthEast,
            Direction::SouthEast,
            Direction::SouthWest,
        ] {
            assert_eq!(Direction::from_label(dir.label()), Some(dir));
        }
        assert_eq!(Direction::from_label("XX"), None);
    }
}
