use crate::models::Coordinates;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeocodeCacheEntry {
    pub coordinates: Coordinates,
    pub cached_at: Instant,
}

/// Size-bounded LRU of resolved addresses with optional expiry.
///
/// Keys are stored exactly as given; callers normalise (trim) before lookup.
#[derive(Debug)]
pub struct GeocodeCache {
    entries: LruCache<String, GeocodeCacheEntry>,
    ttl: Option<Duration>,
}

impl GeocodeCache {
    pub fn new(capacity: usize, ttl: Option<Duration>) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
            ttl,
        }
    }

    /// Fresh coordinates for `key`. An expired entry is dropped and reported absent.
    pub fn get(&mut self, key: &str, now: Instant) -> Option<Coordinates> {
        let ttl = self.ttl;
        let entry = *self.entries.get(key)?;

        if is_expired(&entry, ttl, now) {
            self.entries.pop(key);
            return None;
        }
        Some(entry.coordinates)
    }

    /// Insert or overwrite the entry for `key`
    pub fn insert(&mut self, key: String, coordinates: Coordinates, now: Instant) {
        self.entries.put(
            key,
            GeocodeCacheEntry {
                coordinates,
                cached_at: now,
            },
        );
    }

    /// Remove every expired entry, returning how many were dropped
    pub fn sweep_expired(&mut self, now: Instant) -> usize {
        let ttl = self.ttl;
        let stale: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| is_expired(entry, ttl, now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &stale {
            self.entries.pop(key);
        }
        stale.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

fn is_expired(entry: &GeocodeCacheEntry, ttl: Option<Duration>, now: Instant) -> bool {
    match ttl {
        Some(ttl) => now.saturating_duration_since(entry.cached_at) >= ttl,
        None => false,
    }
}
