//! Bounded reverse geocoding cache
//!
//! Keys are coordinates rounded to 4 decimal places (~11 m). Entries live in
//! an LRU behind a mutex: lookups promote recency and inserting past capacity
//! evicts the least recently used entry. Every operation takes the lock once
//! and never across an await point.

use crate::constants::cache::KEY_PRECISION;
use crate::coord::Coordinate;
use crate::geo::GeocodingResult;
use lru::LruCache;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// Rounded-coordinate cache key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    lat: i64,
    lng: i64,
}

impl CacheKey {
    /// Bucket a coordinate, or None when either axis is not finite
    pub fn from_coordinate(c: Coordinate) -> Option<Self> {
        if !c.lat.is_finite() || !c.lng.is_finite() {
            return None;
        }
        let factor = 10f64.powi(KEY_PRECISION);
        Some(Self {
            lat: (c.lat * factor).round() as i64,
            lng: (c.lng * factor).round() as i64,
        })
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let factor = 10f64.powi(KEY_PRECISION);
        write!(
            f,
            "{:.4},{:.4}",
            self.lat as f64 / factor,
            self.lng as f64 / factor
        )
    }
}

/// Cache introspection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub size: usize,
    pub max_size: usize,
    pub enabled: bool,
}

/// Thread-safe LRU of geocoding results
#[derive(Debug)]
pub struct GeocodeCache {
    entries: Option<Mutex<LruCache<CacheKey, GeocodingResult>>>,
    capacity: usize,
}

impl GeocodeCache {
    /// Create a cache holding at most `capacity` entries.
    ///
    /// A capacity of 0 yields a disabled cache.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: NonZeroUsize::new(capacity).map(|c| Mutex::new(LruCache::new(c))),
            capacity,
        }
    }

    /// A cache that stores nothing but still reports its configured capacity
    pub fn disabled(capacity: usize) -> Self {
        Self {
            entries: None,
            capacity,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.entries.is_some()
    }

    fn lock(&self) -> Option<MutexGuard<'_, LruCache<CacheKey, GeocodingResult>>> {
        self.entries
            .as_ref()
            .map(|m| m.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Look up a key, marking it most recently used
    pub fn get(&self, key: &CacheKey) -> Option<GeocodingResult> {
        self.lock()?.get(key).cloned()
    }

    /// Insert or replace an entry, evicting the least recently used one when full
    pub fn put(&self, key: CacheKey, value: GeocodingResult) {
        let Some(mut entries) = self.lock() else {
            return;
        };
        if let Some((evicted, _)) = entries.push(key, value) {
            if evicted != key {
                debug!(key = %evicted, "evicted geocoding cache entry");
            }
        }
    }

    pub fn len(&self) -> usize {
        self.lock().map_or(0, |entries| entries.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        if let Some(mut entries) = self.lock() {
            entries.clear();
        }
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            size: self.len(),
            max_size: self.capacity,
            enabled: self.is_enabled(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn result(lat: f64, lng: f64) -> GeocodingResult {
        GeocodingResult::failure(Coordinate::new(lat, lng), "test")
    }

    fn key(lat: f64, lng: f64) -> CacheKey {
        CacheKey::from_coordinate(Coordinate::new(lat, lng)).unwrap()
    }

    #[test]
    fn test_key_rounding() {
        assert_eq!(key(5.36001, -4.00834), key(5.36004, -4.00826));
        assert_ne!(key(5.3600, -4.0083), key(5.3601, -4.0083));
        assert_eq!(key(5.36, -4.0083).to_string(), "5.3600,-4.0083");
    }

    #[test]
    fn test_non_finite_has_no_key() {
        let nan = Coordinate::new(f64::NAN, f64::NAN);
        assert!(CacheKey::from_coordinate(nan).is_none());
        assert!(CacheKey::from_coordinate(Coordinate::new(5.0, f64::INFINITY)).is_none());
        assert!(CacheKey::from_coordinate(Coordinate::new(0.0, 0.0)).is_some());
    }

    #[test]
    fn test_capacity_plus_one_keeps_capacity() {
        let cache = GeocodeCache::new(3);
        for i in 0..4 {
            cache.put(key(5.0 + i as f64 * 0.01, -4.0), result(5.0, -4.0));
        }
        assert_eq!(cache.len(), 3);
        assert_eq!(cache.stats(), CacheStats { size: 3, max_size: 3, enabled: true });
    }

    #[test]
    fn test_evicts_least_recently_used() {
        let cache = GeocodeCache::new(2);
        cache.put(key(1.0, 1.0), result(1.0, 1.0));
        cache.put(key(2.0, 2.0), result(2.0, 2.0));

        // Touch the first entry so the second becomes the eviction candidate
        assert!(cache.get(&key(1.0, 1.0)).is_some());
        cache.put(key(3.0, 3.0), result(3.0, 3.0));

        assert!(cache.get(&key(1.0, 1.0)).is_some());
        assert!(cache.get(&key(2.0, 2.0)).is_none());
        assert!(cache.get(&key(3.0, 3.0)).is_some());
    }

    #[test]
    fn test_replacing_key_does_not_grow() {
        let cache = GeocodeCache::new(2);
        cache.put(key(1.0, 1.0), result(1.0, 1.0));
        cache.put(key(1.0, 1.0), result(1.0, 1.0));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_clear() {
        let cache = GeocodeCache::new(5);
        cache.put(key(1.0, 1.0), result(1.0, 1.0));
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.stats().max_size, 5);
    }

    #[test]
    fn test_disabled_cache_stores_nothing() {
        let cache = GeocodeCache::disabled(25);
        cache.put(key(1.0, 1.0), result(1.0, 1.0));
        assert!(cache.get(&key(1.0, 1.0)).is_none());
        assert_eq!(cache.stats(), CacheStats { size: 0, max_size: 25, enabled: false });
        assert!(!GeocodeCache::new(0).is_enabled());
    }

    #[test]
    fn test_concurrent_inserts_stay_bounded() {
        let cache = Arc::new(GeocodeCache::new(50));
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || {
                    for i in 0..100 {
                        let lat = t as f64 + i as f64 * 0.001;
                        cache.put(key(lat, 0.0), result(lat, 0.0));
                        cache.get(&key(lat, 0.0));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(cache.len(), 50);
    }
}
