//! Combined Cache - A bounded in-memory key-value cache
//!
//! Least-recently-used eviction over an arena-backed recency list, with
//! optional sliding TTL expiration and a background sweep.

pub mod cache;
pub mod config;
pub mod error;
mod tasks;

pub use cache::{Cache, CacheBuilder, CacheStats};
pub use config::Config;
pub use error::{CacheError, Result};
