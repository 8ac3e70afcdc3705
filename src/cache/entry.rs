//! Cache Entry Module
//!
//! Defines a single cached key-value pair and its sliding-expiry timestamp.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// Represents a single cache entry with value and recency metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry<K, V> {
    /// Key the entry is indexed under
    pub key: K,
    /// The stored value
    pub value: V,
    /// Last insertion, update or successful read
    last_touched: Instant,
}

impl<K, V> CacheEntry<K, V> {
    // == Constructor ==
    /// Creates a new entry touched at `now`.
    pub fn new(key: K, value: V, now: Instant) -> Self {
        Self {
            key,
            value,
            last_touched: now,
        }
    }

    #[cfg(test)]
    pub fn last_touched(&self) -> Instant {
        self.last_touched
    }

    // == Touch ==
    /// Refreshes the sliding TTL window.
    ///
    /// The timestamp never moves backwards, even if `now` was sampled
    /// before the previous touch on another thread.
    pub fn touch(&mut self, now: Instant) {
        if now > self.last_touched {
            self.last_touched = now;
        }
    }

    // == Is Expired ==
    /// Checks if the entry has outlived `ttl` as of `now`.
    ///
    /// Boundary condition: an entry whose age equals the TTL exactly is
    /// already expired.
    pub fn is_expired(&self, ttl: Duration, now: Instant) -> bool {
        now.saturating_duration_since(self.last_touched) >= ttl
    }

    // == Time To Live ==
    /// Returns the time left before expiry, `Duration::ZERO` once expired.
    pub fn ttl_remaining(&self, ttl: Duration, now: Instant) -> Duration {
        ttl.saturating_sub(now.saturating_duration_since(self.last_touched))
    }
}
