//! Cache Store Module
//!
//! Main cache engine combining a hash index with the recency list and
//! sliding TTL expiration. Not thread-safe on its own; [`Cache`] wraps it
//! in a single lock.
//!
//! The `*_at` methods take the current instant explicitly so expiry can be
//! driven deterministically. The plain variants read the clock.
//!
//! [`Cache`]: crate::cache::Cache

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::cache::{CacheEntry, CacheStats, Handle, LruList};
use crate::error::{CacheError, Result};

// == Cache Store ==
/// Bounded key-value store with LRU eviction and optional TTL.
#[derive(Debug)]
pub struct CacheStore<K, V> {
    /// Key to list node
    index: HashMap<K, Handle>,
    /// Entries from most to least recently used
    order: LruList<CacheEntry<K, V>>,
    /// Activity counters
    stats: CacheStats,
    /// Maximum number of live entries
    capacity: usize,
    /// Sliding expiry window, None = entries never expire by time
    ttl: Option<Duration>,
}

impl<K, V> CacheStore<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    // == Constructor ==
    /// Creates a new store with the given capacity and optional TTL.
    ///
    /// A zero TTL is treated as no TTL.
    ///
    /// # Errors
    /// [`CacheError::ZeroCapacity`] if `capacity` is zero.
    pub fn new(capacity: usize, ttl: Option<Duration>) -> Result<Self> {
        if capacity == 0 {
            return Err(CacheError::ZeroCapacity);
        }
        Ok(Self {
            index: HashMap::new(),
            order: LruList::new(),
            stats: CacheStats::new(),
            capacity,
            ttl: ttl.filter(|ttl| !ttl.is_zero()),
        })
    }

    // == Put ==
    /// Stores a key-value pair as the most recently used entry.
    ///
    /// An existing key is updated in place and never triggers eviction.
    /// A new key evicts the least recently used entry when the store is full.
    pub fn put(&mut self, key: K, value: V) {
        self.put_at(key, value, Instant::now());
    }

    pub fn put_at(&mut self, key: K, value: V, now: Instant) {
        if let Some(&handle) = self.index.get(&key) {
            if let Some(entry) = self.order.get_mut(handle) {
                entry.value = value;
                entry.touch(now);
            }
            self.order.move_to_front(handle);
            return;
        }

        if self.index.len() >= self.capacity {
            self.evict();
        }

        let handle = self
            .order
            .push_front(CacheEntry::new(key.clone(), value, now));
        self.index.insert(key, handle);
    }

    // == Get ==
    /// Retrieves a value and marks it most recently used.
    ///
    /// A successful read restarts the entry's TTL window. An expired entry
    /// is removed and reported as absent.
    pub fn get<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get_at(key, Instant::now())
    }

    pub fn get_at<Q>(&mut self, key: &Q, now: Instant) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let Some(&handle) = self.index.get(key) else {
            self.stats.record_miss();
            return None;
        };

        if self.is_expired(handle, now) {
            self.unlink(handle);
            self.stats.record_expirations(1);
            self.stats.record_miss();
            debug!("Lazily expired entry on read");
            return None;
        }

        let value = match self.order.get_mut(handle) {
            Some(entry) => {
                entry.touch(now);
                entry.value.clone()
            }
            None => {
                self.stats.record_miss();
                return None;
            }
        };
        self.order.move_to_front(handle);
        self.stats.record_hit();
        Some(value)
    }

    // == Peek ==
    /// Reads a live value without touching recency, TTL or counters.
    pub fn peek<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.peek_at(key, Instant::now())
    }

    pub fn peek_at<Q>(&self, key: &Q, now: Instant) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.live_entry(key, now).map(|entry| entry.value.clone())
    }

    /// Checks for a live entry without touching recency, TTL or counters.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.contains_at(key, Instant::now())
    }

    pub fn contains_at<Q>(&self, key: &Q, now: Instant) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.live_entry(key, now).is_some()
    }

    // == Time To Live ==
    /// Time left before a live entry expires.
    ///
    /// None if the key is absent or expired, or if the store has no TTL.
    pub fn ttl_remaining<Q>(&self, key: &Q) -> Option<Duration>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.ttl_remaining_at(key, Instant::now())
    }

    pub fn ttl_remaining_at<Q>(&self, key: &Q, now: Instant) -> Option<Duration>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let ttl = self.ttl?;
        self.live_entry(key, now)
            .map(|entry| entry.ttl_remaining(ttl, now))
    }

    // == Remove ==
    /// Removes an entry by key, returning its value if it was live.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.remove_at(key, Instant::now())
    }

    pub fn remove_at<Q>(&mut self, key: &Q, now: Instant) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let handle = *self.index.get(key)?;
        let expired = self.is_expired(handle, now);
        let entry = self.unlink(handle)?;
        if expired {
            self.stats.record_expirations(1);
            None
        } else {
            Some(entry.value)
        }
    }

    // == Remove Expired ==
    /// Removes every entry whose TTL has elapsed.
    ///
    /// Returns the number of entries removed. No-op without a TTL.
    pub fn remove_expired(&mut self) -> usize {
        self.remove_expired_at(Instant::now())
    }

    pub fn remove_expired_at(&mut self, now: Instant) -> usize {
        let Some(ttl) = self.ttl else {
            return 0;
        };

        let expired: Vec<Handle> = self
            .order
            .iter_rev()
            .filter(|(_, entry)| entry.is_expired(ttl, now))
            .map(|(handle, _)| handle)
            .collect();

        let count = expired.len();
        for handle in expired {
            self.unlink(handle);
        }

        self.stats.record_expirations(count);
        count
    }

    /// Drops every entry. Counters are kept.
    pub fn clear(&mut self) {
        self.index.clear();
        self.order.clear();
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            total_entries: self.index.len(),
            ..self.stats.clone()
        }
    }

    // == Size ==
    /// Number of stored entries, expired or not.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    // == Evict ==
    /// Drops the least recently used entry. No-op when empty.
    fn evict(&mut self) {
        if let Some(entry) = self.order.pop_back() {
            self.index.remove(&entry.key);
            self.stats.record_eviction();
            debug!(capacity = self.capacity, "Evicted least recently used entry");
        }
    }

    /// Removes a node from both the list and the index.
    fn unlink(&mut self, handle: Handle) -> Option<CacheEntry<K, V>> {
        let entry = self.order.remove(handle)?;
        self.index.remove(&entry.key);
        Some(entry)
    }

    fn is_expired(&self, handle: Handle, now: Instant) -> bool {
        match (self.ttl, self.order.get(handle)) {
            (Some(ttl), Some(entry)) => entry.is_expired(ttl, now),
            _ => false,
        }
    }

    fn live_entry<Q>(&self, key: &Q, now: Instant) -> Option<&CacheEntry<K, V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let handle = *self.index.get(key)?;
        if self.is_expired(handle, now) {
            return None;
        }
        self.order.get(handle)
    }

    /// Keys from most to least recently used.
    #[cfg(test)]
    pub(crate) fn keys_by_recency(&self) -> Vec<K> {
        self.order.iter().map(|entry| entry.key.clone()).collect()
    }

    /// Panics if the index and the recency list disagree.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        let forward = self.order.iter().count();
        let backward = self.order.iter_rev().count();
        assert_eq!(forward, self.index.len(), "front-to-back walk disagrees with index");
        assert_eq!(backward, self.index.len(), "back-to-front walk disagrees with index");
        assert_eq!(self.order.len(), self.index.len());
        assert!(self.index.len() <= self.capacity, "capacity exceeded");

        for (key, &handle) in &self.index {
            let entry = self.order.get(handle).expect("index points at a vacant slot");
            assert!(entry.key == *key, "index handle points at another key");
        }
    }
}
