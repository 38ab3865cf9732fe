// src/news/cache.rs
//! Single-slot, time-boxed memory cache for the world-headlines panel.
//!
//! The slot is replaced wholesale, never merged. A `Mutex` keeps one writer
//! visible at a time; it is never held across an `.await`.

use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::clock::Clock;
use crate::news::types::{CacheStatus, CachedResult};

#[derive(Debug, Clone)]
struct Slot {
    data: CachedResult,
    stored_at: DateTime<Utc>,
}

pub struct NewsCache {
    slot: Mutex<Option<Slot>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl NewsCache {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            slot: Mutex::new(None),
            ttl,
            clock,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    fn is_fresh(&self, stored_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        // A slot stamped in the future (clock stepped back) is treated as age 0.
        let age = (now - stored_at).to_std().unwrap_or(Duration::ZERO);
        age < self.ttl
    }

    /// Fresh data, annotated as cache-sourced. `None` when empty or expired.
    pub fn get(&self) -> Option<CachedResult> {
        let now = self.clock.now();
        let guard = self.slot.lock().expect("news cache mutex poisoned");
        guard
            .as_ref()
            .filter(|s| self.is_fresh(s.stored_at, now))
            .map(|s| CachedResult {
                from_cache: true,
                stale: false,
                ..s.data.clone()
            })
    }

    /// Last stored data regardless of age, annotated as a stale cache read.
    pub fn stale(&self) -> Option<CachedResult> {
        let guard = self.slot.lock().expect("news cache mutex poisoned");
        guard.as_ref().map(|s| CachedResult {
            from_cache: true,
            stale: true,
            ..s.data.clone()
        })
    }

    /// Replace the slot with a freshly generated result.
    pub fn store(&self, data: CachedResult) {
        let stored_at = self.clock.now();
        let mut guard = self.slot.lock().expect("news cache mutex poisoned");
        *guard = Some(Slot { data, stored_at });
    }

    /// Empty the slot; the next read must go upstream.
    pub fn clear(&self) {
        let mut guard = self.slot.lock().expect("news cache mutex poisoned");
        *guard = None;
        tracing::info!("news cache cleared");
    }

    pub fn status(&self) -> CacheStatus {
        let now = self.clock.now();
        let guard = self.slot.lock().expect("news cache mutex poisoned");
        let ttl_minutes = self.ttl.as_secs() / 60;
        match guard.as_ref() {
            Some(s) => CacheStatus {
                has_cached_data: true,
                cache_timestamp: Some(s.stored_at),
                cache_age_minutes: Some(age_minutes(now - s.stored_at)),
                cache_valid: self.is_fresh(s.stored_at, now),
                ttl_minutes,
            },
            None => CacheStatus {
                has_cached_data: false,
                cache_timestamp: None,
                cache_age_minutes: None,
                cache_valid: false,
                ttl_minutes,
            },
        }
    }
}

/// Whole minutes, rounded half away from zero.
fn age_minutes(age: chrono::Duration) -> i64 {
    (age.num_seconds() as f64 / 60.0).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use chrono::TimeZone;

    fn setup(ttl_secs: u64) -> (NewsCache, ManualClock) {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap());
        let cache = NewsCache::new(Duration::from_secs(ttl_secs), Arc::new(clock.clone()));
        (cache, clock)
    }

    fn result(now: DateTime<Utc>) -> CachedResult {
        CachedResult {
            total_source_articles: 7,
            unique_after_filtering: 6,
            ..CachedResult::empty(now)
        }
    }

    #[test]
    fn fresh_within_ttl_then_expires() {
        let (cache, clock) = setup(3600);
        assert!(cache.get().is_none());

        cache.store(result(cache.now()));
        let hit = cache.get().expect("fresh hit");
        assert!(hit.from_cache);
        assert!(!hit.stale);
        assert_eq!(hit.total_source_articles, 7);

        clock.advance(chrono::Duration::minutes(59));
        assert!(cache.get().is_some());

        clock.advance(chrono::Duration::minutes(1));
        assert!(cache.get().is_none(), "age == ttl is expired");

        let old = cache.stale().expect("stale still available");
        assert!(old.from_cache && old.stale);
    }

    #[test]
    fn clear_empties_regardless_of_age() {
        let (cache, _clock) = setup(3600);
        cache.store(result(cache.now()));
        cache.clear();
        assert!(cache.get().is_none());
        assert!(cache.stale().is_none());
        assert!(!cache.status().has_cached_data);
    }

    #[test]
    fn status_reports_age_and_validity() {
        let (cache, clock) = setup(1800);
        let empty = cache.status();
        assert_eq!(empty.ttl_minutes, 30);
        assert!(!empty.cache_valid);

        cache.store(result(cache.now()));
        clock.advance(chrono::Duration::minutes(12));
        let st = cache.status();
        assert!(st.has_cached_data && st.cache_valid);
        assert_eq!(st.cache_age_minutes, Some(12));

        clock.advance(chrono::Duration::minutes(30));
        assert!(!cache.status().cache_valid);
    }

    #[test]
    fn status_age_rounds_to_nearest_minute() {
        let (cache, clock) = setup(3600);
        cache.store(result(cache.now()));

        clock.advance(chrono::Duration::seconds(29));
        assert_eq!(cache.status().cache_age_minutes, Some(0));
        clock.advance(chrono::Duration::seconds(1));
        assert_eq!(cache.status().cache_age_minutes, Some(1));
        clock.advance(chrono::Duration::seconds(59));
        assert_eq!(cache.status().cache_age_minutes, Some(1));
        clock.advance(chrono::Duration::seconds(1));
        assert_eq!(cache.status().cache_age_minutes, Some(2));
    }

    #[test]
    fn store_replaces_wholesale() {
        let (cache, clock) = setup(60);
        cache.store(result(cache.now()));
        clock.advance(chrono::Duration::seconds(10));
        cache.store(CachedResult::empty(cache.now()));
        let hit = cache.get().unwrap();
        assert_eq!(hit.total_source_articles, 0);
        assert_eq!(cache.status().cache_age_minutes, Some(0));
    }
}
