//! Configuration Module
//!
//! Loads cache parameters from environment variables.

use std::env;
use std::time::Duration;

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of entries the cache can hold
    pub capacity: usize,
    /// Entry time-to-live in seconds, 0 = entries never expire
    pub ttl_secs: u64,
    /// Seconds between background sweep passes, None = sweep every TTL
    pub sweep_interval_secs: Option<u64>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Maximum cache entries (default: 1000)
    /// - `CACHE_TTL_SECS` - Entry TTL in seconds, 0 disables expiry (default: 300)
    /// - `CACHE_SWEEP_INTERVAL_SECS` - Sweep period in seconds (default: the TTL)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            capacity: parse_var("CACHE_CAPACITY").unwrap_or(defaults.capacity),
            ttl_secs: parse_var("CACHE_TTL_SECS").unwrap_or(defaults.ttl_secs),
            sweep_interval_secs: parse_var("CACHE_SWEEP_INTERVAL_SECS")
                .or(defaults.sweep_interval_secs),
        }
    }

    /// TTL as a duration, or None when expiration is disabled.
    pub fn ttl(&self) -> Option<Duration> {
        (self.ttl_secs > 0).then(|| Duration::from_secs(self.ttl_secs))
    }

    pub fn sweep_interval(&self) -> Option<Duration> {
        self.sweep_interval_secs.map(Duration::from_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: 1000,
            ttl_secs: 300,
            sweep_interval_secs: None,
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}
