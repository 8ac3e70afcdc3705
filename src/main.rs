//! Combined Cache - demo binary
//!
//! Walks a cache through insert, read and expiry using the configured
//! capacity and TTL.

use std::time::Duration;

use anyhow::Context;
use tokio::runtime::Handle;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use combined_cache::{Cache, CacheBuilder, Config};

/// Longest TTL the demo is willing to sleep through.
const MAX_DEMO_WAIT: Duration = Duration::from_secs(5);

/// Entry point for the cache demo.
///
/// # Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Build the cache with its sweep on the tokio runtime
/// 4. Store and read back a key
/// 5. Wait out the TTL (when short) and read again
/// 6. Print statistics and stop the sweep
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "combined_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    info!(
        "Configuration loaded: capacity={}, ttl={}s, sweep_interval={:?}",
        config.capacity, config.ttl_secs, config.sweep_interval_secs
    );

    let cache: Cache<String, i64> = CacheBuilder::from_config(&config)
        .runtime(Handle::current())
        .build()
        .context("failed to build cache")?;

    cache.put("key1".to_string(), 1);
    info!("get(key1) = {:?}", cache.get("key1"));

    match cache.ttl() {
        Some(ttl) if ttl <= MAX_DEMO_WAIT => {
            let wait = ttl + Duration::from_millis(100);
            info!("Waiting {:?} for key1 to expire", wait);
            tokio::time::sleep(wait).await;
            info!("get(key1) = {:?}", cache.get("key1"));
        }
        Some(ttl) => warn!("TTL of {:?} is too long to wait out, skipping expiry demo", ttl),
        None => info!("No TTL configured, entries never expire"),
    }

    let stats = serde_json::to_string_pretty(&cache.stats()).context("failed to encode stats")?;
    println!("{stats}");

    cache.stop_cleanup();
    info!("Demo complete");
    Ok(())
}
