//! Error types for the cache
//!
//! Only construction can fail. Lookups signal absence through `Option`.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for cache construction.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Capacity must be at least one entry
    #[error("Cache capacity must be greater than zero")]
    ZeroCapacity,

    /// Sweep interval must be a positive duration
    #[error("Sweep interval must be greater than zero")]
    ZeroSweepInterval,

    /// The background sweep thread could not be started
    #[error("Failed to spawn sweep thread: {0}")]
    SweeperSpawn(#[from] std::io::Error),
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
