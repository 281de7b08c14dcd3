//! Availability summary cache
//!
//! Short-TTL cache for the read-heavy zone availability dashboard, keyed by
//! (date, time, party_size). Cached results are advisory only: the
//! transaction manager never consults this cache — its conflict check always
//! re-reads live state inside the booking transaction.

use dashmap::DashMap;
use std::time::{Duration, Instant};

use super::availability::ZoneAvailability;

#[derive(Clone)]
struct CachedEntry {
    zones: Vec<ZoneAvailability>,
    inserted_at: Instant,
}

/// TTL cache over zone availability projections
pub struct AvailabilityCache {
    entries: DashMap<(String, String, i64), CachedEntry>,
    ttl: Duration,
}

impl AvailabilityCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    /// Fresh cached projection for the slot, if any
    pub fn get(&self, date: &str, time: &str, party_size: i64) -> Option<Vec<ZoneAvailability>> {
        let key = (date.to_string(), time.to_string(), party_size);
        let entry = self.entries.get(&key)?;
        if entry.inserted_at.elapsed() > self.ttl {
            drop(entry);
            self.entries.remove(&key);
            return None;
        }
        Some(entry.zones.clone())
    }

    pub fn insert(&self, date: &str, time: &str, party_size: i64, zones: Vec<ZoneAvailability>) {
        self.entries.insert(
            (date.to_string(), time.to_string(), party_size),
            CachedEntry {
                zones,
                inserted_at: Instant::now(),
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone(id: i64) -> ZoneAvailability {
        ZoneAvailability {
            zone_id: id,
            zone_name: format!("Zone {id}"),
            table_count: 2,
            total_capacity: 8,
        }
    }

    #[test]
    fn returns_fresh_entries() {
        let cache = AvailabilityCache::new(Duration::from_secs(60));
        cache.insert("2024-06-01", "19:00", 4, vec![zone(1)]);
        let hit = cache.get("2024-06-01", "19:00", 4).unwrap();
        assert_eq!(hit.len(), 1);
        assert_eq!(hit[0].zone_id, 1);
    }

    #[test]
    fn misses_on_different_key() {
        let cache = AvailabilityCache::new(Duration::from_secs(60));
        cache.insert("2024-06-01", "19:00", 4, vec![zone(1)]);
        assert!(cache.get("2024-06-01", "20:00", 4).is_none());
        assert!(cache.get("2024-06-01", "19:00", 2).is_none());
    }

    #[test]
    fn expires_after_ttl() {
        let cache = AvailabilityCache::new(Duration::ZERO);
        cache.insert("2024-06-01", "19:00", 4, vec![zone(1)]);
        assert!(cache.get("2024-06-01", "19:00", 4).is_none());
    }
}
