//! Time-windowed caches
//!
//! Two roles share one expiry rule:
//! - [`TtlCache`]: keyed memoization of upstream calls and rankings
//! - [`Published`]: single-slot hand-off of the poller's latest snapshot
//!
//! An entry is visible while `now - inserted_at <= ttl` and is a miss
//! afterwards; expired values are never served.

mod published;

pub use published::Published;

use parking_lot::RwLock;
use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::time::Duration;
use tokio::time::Instant;

/// A stored value with its insertion time and lifetime
#[derive(Debug, Clone)]
pub(crate) struct Entry<V> {
    value: V,
    inserted_at: Instant,
    ttl: Duration,
}

impl<V> Entry<V> {
    pub(crate) fn new(value: V, ttl: Duration) -> Self {
        Self {
            value,
            inserted_at: Instant::now(),
            ttl,
        }
    }

    pub(crate) fn is_live(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.inserted_at) <= self.ttl
    }

    pub(crate) fn value(&self) -> &V {
        &self.value
    }

    pub(crate) fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.inserted_at)
    }
}

/// Concurrent key-value store with per-entry expiry
pub struct TtlCache<K, V> {
    default_ttl: Duration,
    entries: RwLock<HashMap<K, Entry<V>>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    /// Create an empty cache whose inserts live for `default_ttl`
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            default_ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Get a live value, or `None` if absent or expired
    pub fn get(&self, key: &K) -> Option<V> {
        let now = Instant::now();
        let entries = self.entries.read();
        entries
            .get(key)
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.value.clone())
    }

    /// Insert with the default TTL, replacing any previous entry
    pub fn insert(&self, key: K, value: V) {
        self.insert_with_ttl(key, value, self.default_ttl);
    }

    /// Insert with an explicit TTL.
    ///
    /// Expired entries are evicted on every insert, so the map holds at most
    /// the keys written within the longest TTL.
    pub fn insert_with_ttl(&self, key: K, value: V, ttl: Duration) {
        let now = Instant::now();
        let mut entries = self.entries.write();
        entries.retain(|_, entry| entry.is_live(now));
        entries.insert(key, Entry::new(value, ttl));
    }

    /// Number of live entries
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .read()
            .values()
            .filter(|entry| entry.is_live(now))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of stored entries, expired ones included
    #[cfg(test)]
    pub(crate) fn stored_len(&self) -> usize {
        self.entries.read().len()
    }

    /// Return the cached value or compute, store and return it.
    ///
    /// Failed computations are not cached. Concurrent misses for the same
    /// key each run `fetch`; the last insert wins.
    pub async fn get_or_try_insert_with<F, Fut, E>(&self, key: K, fetch: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(&key) {
            return Ok(value);
        }

        let value = fetch().await?;
        self.insert(key, value.clone());
        Ok(value)
    }
}
