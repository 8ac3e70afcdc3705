//! Shared Cache Module
//!
//! Thread-safe cache handle. Every operation takes one lock over the whole
//! store, so index and recency list always change together.

use std::borrow::Borrow;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::cache::{CacheBuilder, CacheStats, CacheStore};
use crate::error::Result;
use crate::tasks::SweepHandle;

// == Cache ==
/// Bounded LRU cache with optional sliding TTL, safe to share across threads.
///
/// Wrap it in an [`Arc`] to share ownership. When a TTL is configured a
/// background sweep purges expired entries until [`stop_cleanup`] is called
/// or the cache is dropped.
///
/// ```
/// use combined_cache::Cache;
///
/// let cache = Cache::new(2, None).unwrap();
/// cache.put("a", 1);
/// cache.put("b", 2);
/// cache.put("c", 3);
///
/// assert_eq!(cache.get("a"), None);
/// assert_eq!(cache.get("b"), Some(2));
/// assert_eq!(cache.get("c"), Some(3));
/// ```
///
/// [`stop_cleanup`]: Cache::stop_cleanup
pub struct Cache<K, V> {
    store: Arc<Mutex<CacheStore<K, V>>>,
    sweeper: Mutex<Option<SweepHandle>>,
}

impl<K, V> Cache<K, V>
where
    K: Eq + Hash + Clone + Send + 'static,
    V: Clone + Send + 'static,
{
    // == Constructor ==
    /// Creates a cache holding at most `capacity` entries.
    ///
    /// A non-zero `ttl` enables sliding expiration and starts a sweep
    /// thread that runs once per TTL.
    ///
    /// # Errors
    /// [`CacheError::ZeroCapacity`](crate::CacheError::ZeroCapacity) if
    /// `capacity` is zero.
    pub fn new(capacity: usize, ttl: Option<Duration>) -> Result<Self> {
        let builder = CacheBuilder::new(capacity);
        match ttl {
            Some(ttl) => builder.ttl(ttl).build(),
            None => builder.build(),
        }
    }
}

impl<K, V> Cache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub(crate) fn from_parts(
        store: Arc<Mutex<CacheStore<K, V>>>,
        sweeper: Option<SweepHandle>,
    ) -> Self {
        Self {
            store,
            sweeper: Mutex::new(sweeper),
        }
    }

    // == Put ==
    /// Inserts or updates a value, evicting the least recently used entry
    /// if a new key arrives while the cache is full.
    pub fn put(&self, key: K, value: V) {
        self.store.lock().put(key, value);
    }

    // == Get ==
    /// Returns a clone of the value and marks it most recently used.
    ///
    /// Expired entries are removed and reported as `None`.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.store.lock().get(key)
    }

    // == Peek ==
    /// Returns a clone of a live value without affecting recency or TTL.
    pub fn peek<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.store.lock().peek(key)
    }

    /// True if `key` maps to a live entry. Recency is left untouched.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.store.lock().contains(key)
    }

    // == Remove ==
    /// Removes a key, returning its value if it was live.
    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.store.lock().remove(key)
    }

    /// Time left before a live entry expires, if the cache has a TTL.
    pub fn ttl_remaining<Q>(&self, key: &Q) -> Option<Duration>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.store.lock().ttl_remaining(key)
    }

    // == Remove Expired ==
    /// Runs one sweep pass now and returns the number of purged entries.
    pub fn remove_expired(&self) -> usize {
        self.store.lock().remove_expired()
    }

    // == Clear ==
    /// Drops every entry. Statistics are kept.
    pub fn clear(&self) {
        self.store.lock().clear();
    }

    // == Stats ==
    /// Snapshot of the counters, with `total_entries` set to the current size.
    pub fn stats(&self) -> CacheStats {
        self.store.lock().stats()
    }

    // == Size ==
    /// Number of stored entries, including expired ones not yet purged.
    pub fn len(&self) -> usize {
        self.store.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.lock().is_empty()
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.store.lock().capacity()
    }

    /// Sliding TTL, or `None` when entries never expire.
    pub fn ttl(&self) -> Option<Duration> {
        self.store.lock().ttl()
    }

    // == Stop Cleanup ==
    /// Halts the background sweep.
    ///
    /// Idempotent, and a no-op for caches without a TTL. Expired entries
    /// are still dropped lazily when read.
    pub fn stop_cleanup(&self) {
        if let Some(mut sweeper) = self.sweeper.lock().take() {
            sweeper.stop();
        }
    }

    /// True while the background sweep is running.
    pub fn is_sweeping(&self) -> bool {
        self.sweeper
            .lock()
            .as_ref()
            .is_some_and(SweepHandle::is_active)
    }
}
