//! Cache Builder Module
//!
//! Configures capacity, TTL and where the background sweep runs.

use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle as RuntimeHandle;

use crate::cache::{Cache, CacheStore};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::tasks::{spawn_sweep_task, spawn_sweep_thread};

// == Cache Builder ==
/// Builder for [`Cache`].
///
/// ```
/// use std::time::Duration;
/// use combined_cache::{Cache, CacheBuilder};
///
/// let cache: Cache<String, u32> = CacheBuilder::new(128)
///     .ttl(Duration::from_secs(30))
///     .sweep_interval(Duration::from_secs(5))
///     .build()
///     .unwrap();
/// cache.put("answer".to_string(), 42);
/// assert_eq!(cache.get("answer"), Some(42));
/// cache.stop_cleanup();
/// ```
#[derive(Debug, Clone)]
pub struct CacheBuilder {
    capacity: usize,
    ttl: Option<Duration>,
    sweep_interval: Option<Duration>,
    runtime: Option<RuntimeHandle>,
}

impl CacheBuilder {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            ttl: None,
            sweep_interval: None,
            runtime: None,
        }
    }

    /// Seeds a builder from environment-derived configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            capacity: config.capacity,
            ttl: config.ttl(),
            sweep_interval: config.sweep_interval(),
            runtime: None,
        }
    }

    /// Enables sliding expiration. A zero TTL disables it again.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Period between sweep passes. Defaults to the TTL.
    pub fn sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = Some(interval);
        self
    }

    /// Runs the sweep as a task on `runtime` instead of a dedicated thread.
    pub fn runtime(mut self, runtime: RuntimeHandle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    // == Build ==
    /// Creates the cache and, when a TTL is set, starts the sweep.
    ///
    /// # Errors
    /// - [`CacheError::ZeroCapacity`] for a zero capacity
    /// - [`CacheError::ZeroSweepInterval`] for a zero sweep interval
    /// - [`CacheError::SweeperSpawn`] if the sweep thread cannot start
    pub fn build<K, V>(self) -> Result<Cache<K, V>>
    where
        K: Eq + Hash + Clone + Send + 'static,
        V: Clone + Send + 'static,
    {
        if self.sweep_interval.is_some_and(|interval| interval.is_zero()) {
            return Err(CacheError::ZeroSweepInterval);
        }

        let store = Arc::new(Mutex::new(CacheStore::new(self.capacity, self.ttl)?));

        let ttl = store.lock().ttl();
        let sweeper = match ttl {
            Some(ttl) => {
                let interval = self.sweep_interval.unwrap_or(ttl);
                let weak = Arc::downgrade(&store);
                Some(match &self.runtime {
                    Some(runtime) => spawn_sweep_task(weak, interval, runtime),
                    None => spawn_sweep_thread(weak, interval)?,
                })
            }
            None => None,
        };

        Ok(Cache::from_parts(store, sweeper))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_without_ttl_has_no_sweep() {
        let cache: Cache<String, i32> = CacheBuilder::new(4).build().unwrap();

        assert_eq!(cache.capacity(), 4);
        assert_eq!(cache.ttl(), None);
        assert!(!cache.is_sweeping());
    }

    #[test]
    fn test_build_with_ttl_starts_sweep() {
        let cache: Cache<String, i32> = CacheBuilder::new(4)
            .ttl(Duration::from_secs(60))
            .build()
            .unwrap();

        assert_eq!(cache.ttl(), Some(Duration::from_secs(60)));
        assert!(cache.is_sweeping());
        cache.stop_cleanup();
        assert!(!cache.is_sweeping());
    }

    #[test]
    fn test_build_zero_ttl_has_no_sweep() {
        let cache: Cache<String, i32> = CacheBuilder::new(4)
            .ttl(Duration::ZERO)
            .build()
            .unwrap();

        assert_eq!(cache.ttl(), None);
        assert!(!cache.is_sweeping());
    }

    #[test]
    fn test_build_rejects_zero_capacity() {
        let result = CacheBuilder::new(0).build::<String, i32>();
        assert!(matches!(result, Err(CacheError::ZeroCapacity)));
    }

    #[test]
    fn test_build_rejects_zero_sweep_interval() {
        let result = CacheBuilder::new(4)
            .ttl(Duration::from_secs(1))
            .sweep_interval(Duration::ZERO)
            .build::<String, i32>();
        assert!(matches!(result, Err(CacheError::ZeroSweepInterval)));
    }

    #[test]
    fn test_from_config() {
        let config = Config {
            capacity: 8,
            ttl_secs: 0,
            sweep_interval_secs: Some(2),
        };

        let cache: Cache<String, i32> = CacheBuilder::from_config(&config).build().unwrap();

        assert_eq!(cache.capacity(), 8);
        assert_eq!(cache.ttl(), None);
        assert!(!cache.is_sweeping());
    }

    #[tokio::test]
    async fn test_build_on_runtime() {
        let cache: Cache<String, i32> = CacheBuilder::new(4)
            .ttl(Duration::from_secs(60))
            .runtime(RuntimeHandle::current())
            .build()
            .unwrap();

        assert!(cache.is_sweeping());
        cache.stop_cleanup();
        assert!(!cache.is_sweeping());
    }
}
