//! Cache Module
//!
//! Bounded in-memory caching with LRU eviction and sliding TTL expiration.
//!
//! Only [`Cache`], [`CacheBuilder`] and [`CacheStats`] are public. The store
//! and its recency list stay behind the cache's lock:
//!
//! ```compile_fail
//! use combined_cache::cache::CacheStore;
//! ```
//!
//! ```compile_fail
//! use combined_cache::cache::{Handle, LruList};
//! ```

mod builder;
mod entry;
mod lru;
mod shared;
mod stats;
mod store;


// Re-export public types
pub use builder::CacheBuilder;
pub use shared::Cache;
pub use stats::CacheStats;

pub(crate) use entry::CacheEntry;
pub(crate) use lru::{Handle, LruList};
pub(crate) use store::CacheStore;
