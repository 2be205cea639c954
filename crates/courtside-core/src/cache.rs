//! TTL (Time-To-Live) cache with an injectable clock.
//!
//! [`TimedCache`] keeps values for a fixed window after insertion. Time comes
//! from a [`Clock`] so expiry can be driven deterministically in tests with
//! [`ManualClock`].

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use tracing::{debug, trace};

/// A source of the current time.
pub trait Clock: Send + Sync + fmt::Debug {
    /// Returns the current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// A shared, dynamically dispatched clock.
pub type SharedClock = Arc<dyn Clock>;

/// The wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same underlying time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    /// Creates a clock frozen at `start`.
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    /// Moves the clock forward.
    pub fn advance(&self, by: Duration) {
        let delta = TimeDelta::from_std(by).unwrap_or(TimeDelta::MAX);
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += delta;
    }

    /// Sets the clock to `at`.
    pub fn set(&self, at: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = at;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    inserted_at: DateTime<Utc>,
}

/// A key/value cache whose entries expire a fixed TTL after insertion.
///
/// All operations are synchronous; the internal lock is never held across an
/// await point. Two callers that miss on the same key concurrently may both
/// fetch and both insert; the last write wins.
pub struct TimedCache<K, V> {
    ttl: Duration,
    ttl_delta: TimeDelta,
    clock: SharedClock,
    entries: Mutex<HashMap<K, CacheEntry<V>>>,
}

impl<K, V> fmt::Debug for TimedCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimedCache")
            .field("ttl", &self.ttl)
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

impl<K, V> TimedCache<K, V>
where
    K: Eq + Hash + fmt::Debug,
    V: Clone,
{
    /// Default TTL: 5 minutes.
    pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

    /// Creates an empty cache.
    pub fn new(ttl: Duration, clock: SharedClock) -> Self {
        Self {
            ttl,
            ttl_delta: TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX),
            clock,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Creates an empty cache driven by the wall clock.
    pub fn with_system_clock(ttl: Duration) -> Self {
        Self::new(ttl, Arc::new(SystemClock))
    }

    /// Returns the TTL.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<K, CacheEntry<V>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_fresh(&self, entry: &CacheEntry<V>, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(entry.inserted_at) < self.ttl_delta
    }

    /// Returns a clone of the value for `key` if present and not expired.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + fmt::Debug + ?Sized,
    {
        let now = self.clock.now();
        let entries = self.entries();
        match entries.get(key) {
            Some(entry) if self.is_fresh(entry, now) => {
                trace!(key = ?key, "cache hit");
                Some(entry.value.clone())
            }
            Some(_) => {
                trace!(key = ?key, "cache entry expired");
                None
            }
            None => None,
        }
    }

    /// Inserts or replaces the value for `key`, restarting its TTL.
    pub fn insert(&self, key: K, value: V) {
        let inserted_at = self.clock.now();
        debug!(key = ?key, ttl_secs = self.ttl.as_secs(), "cached value");
        self.entries().insert(key, CacheEntry { value, inserted_at });
    }

    /// Removes the entry for `key`, returning its value if it was still fresh.
    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let now = self.clock.now();
        self.entries()
            .remove(key)
            .filter(|entry| self.is_fresh(entry, now))
            .map(|entry| entry.value)
    }

    /// Removes every entry.
    pub fn clear(&self) {
        let mut entries = self.entries();
        let count = entries.len();
        entries.clear();
        debug!(count, "cleared cache");
    }

    /// Removes expired entries and returns how many were dropped.
    pub fn evict_expired(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|_, entry| self.is_fresh(entry, now));
        let evicted = before - entries.len();
        if evicted > 0 {
            debug!(evicted, "evicted expired cache entries");
        }
        evicted
    }

    /// Returns the number of stored entries, expired or not.
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn cache(clock: &ManualClock) -> TimedCache<String, u32> {
        TimedCache::new(Duration::from_secs(300), Arc::new(clock.clone()))
    }

    #[test]
    fn manual_clock_advances() {
        let clock = ManualClock::new(start());
        clock.advance(Duration::from_secs(90));
        assert_eq!(clock.now(), start() + TimeDelta::seconds(90));

        clock.set(start());
        assert_eq!(clock.now(), start());
    }

    #[test]
    fn insert_and_get() {
        let clock = ManualClock::new(start());
        let cache = cache(&clock);

        cache.insert("a".to_string(), 1);
        assert_eq!(cache.get("a"), Some(1));
        assert_eq!(cache.get("b"), None);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn entries_expire_at_ttl() {
        let clock = ManualClock::new(start());
        let cache = cache(&clock);
        cache.insert("a".to_string(), 1);

        clock.advance(Duration::from_secs(299));
        assert_eq!(cache.get("a"), Some(1));

        clock.advance(Duration::from_secs(1));
        assert_eq!(cache.get("a"), None);
    }

    #[test]
    fn reinsert_restarts_ttl() {
        let clock = ManualClock::new(start());
        let cache = cache(&clock);
        cache.insert("a".to_string(), 1);

        clock.advance(Duration::from_secs(200));
        cache.insert("a".to_string(), 2);

        clock.advance(Duration::from_secs(200));
        assert_eq!(cache.get("a"), Some(2));
    }

    #[test]
    fn clear_drops_everything() {
        let clock = ManualClock::new(start());
        let cache = cache(&clock);
        cache.insert("a".to_string(), 1);
        cache.insert("b".to_string(), 2);

        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.get("a"), None);
    }

    #[test]
    fn remove_returns_fresh_value_only() {
        let clock = ManualClock::new(start());
        let cache = cache(&clock);
        cache.insert("a".to_string(), 1);
        cache.insert("b".to_string(), 2);

        assert_eq!(cache.remove("a"), Some(1));
        clock.advance(Duration::from_secs(301));
        assert_eq!(cache.remove("b"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn evict_expired_keeps_fresh_entries() {
        let clock = ManualClock::new(start());
        let cache = cache(&clock);
        cache.insert("old".to_string(), 1);

        clock.advance(Duration::from_secs(250));
        cache.insert("new".to_string(), 2);

        clock.advance(Duration::from_secs(100));
        assert_eq!(cache.evict_expired(), 1);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("new"), Some(2));
    }

    #[test]
    fn default_ttl_is_five_minutes() {
        assert_eq!(
            TimedCache::<String, bool>::DEFAULT_TTL,
            Duration::from_secs(300)
        );
        let cache: TimedCache<String, bool> = TimedCache::with_system_clock(Duration::from_secs(1));
        assert_eq!(cache.ttl(), Duration::from_secs(1));
    }
}
