//! Integration Tests for the Cache API
//!
//! Exercises the public contract end to end, including real-time expiry
//! and concurrent access from several threads.

use std::sync::Arc;
use std::thread::{self, sleep};
use std::time::Duration;

use combined_cache::{Cache, CacheBuilder, CacheError};
use tokio::runtime::Handle;

// == Construction ==

#[test]
fn test_zero_capacity_is_rejected() {
    let result = Cache::<String, i32>::new(0, None);
    assert!(matches!(result, Err(CacheError::ZeroCapacity)));
}

// == Eviction ==

#[test]
fn test_capacity_two_scenario() {
    let cache = Cache::new(2, None).unwrap();

    cache.put("a".to_string(), 1);
    cache.put("b".to_string(), 2);
    cache.put("c".to_string(), 3);

    assert_eq!(cache.get("a"), None);
    assert_eq!(cache.get("b"), Some(2));
    assert_eq!(cache.get("c"), Some(3));
}

#[test]
fn test_read_protects_from_eviction() {
    let cache = Cache::new(3, None).unwrap();

    cache.put("a".to_string(), 1);
    cache.put("b".to_string(), 2);
    cache.put("c".to_string(), 3);
    assert_eq!(cache.get("a"), Some(1));
    cache.put("d".to_string(), 4);

    assert!(cache.contains("a"));
    assert!(!cache.contains("b"), "b was least recently used");
    assert_eq!(cache.len(), 3);
    assert_eq!(cache.stats().evictions, 1);
}

#[test]
fn test_update_moves_to_front_without_growing() {
    let cache = Cache::new(2, None).unwrap();

    cache.put("a".to_string(), 1);
    cache.put("b".to_string(), 2);
    cache.put("a".to_string(), 10);
    cache.put("c".to_string(), 3);

    assert_eq!(cache.get("a"), Some(10));
    assert_eq!(cache.get("b"), None);
    assert_eq!(cache.len(), 2);
}

// == Expiration ==

#[test]
fn test_ttl_expiry_scenario() {
    let cache = Cache::new(2, Some(Duration::from_secs(1))).unwrap();

    cache.put("a".to_string(), 1);
    assert_eq!(cache.get("a"), Some(1));

    sleep(Duration::from_secs(2));

    assert_eq!(cache.get("a"), None);
    cache.stop_cleanup();
}

#[test]
fn test_sliding_ttl_extends_on_read() {
    let cache: Cache<String, i32> = CacheBuilder::new(4)
        .ttl(Duration::from_millis(400))
        .sweep_interval(Duration::from_millis(50))
        .build()
        .unwrap();

    cache.put("a".to_string(), 1);

    sleep(Duration::from_millis(250));
    assert_eq!(cache.get("a"), Some(1));

    // 500ms after insertion, 250ms after the read
    sleep(Duration::from_millis(250));
    assert_eq!(cache.get("a"), Some(1));

    sleep(Duration::from_millis(600));
    assert_eq!(cache.get("a"), None);
}

#[test]
fn test_background_sweep_purges_without_reads() {
    let cache: Cache<String, i32> = CacheBuilder::new(10)
        .ttl(Duration::from_millis(100))
        .sweep_interval(Duration::from_millis(50))
        .build()
        .unwrap();

    cache.put("a".to_string(), 1);
    cache.put("b".to_string(), 2);
    sleep(Duration::from_millis(400));

    assert!(cache.is_empty());
    let stats = cache.stats();
    assert_eq!(stats.expirations, 2);
    assert_eq!(stats.misses, 0);
}

#[test]
fn test_stop_cleanup_is_idempotent() {
    let cache = Cache::new(4, Some(Duration::from_millis(100))).unwrap();
    assert!(cache.is_sweeping());

    cache.stop_cleanup();
    cache.stop_cleanup();
    cache.stop_cleanup();
    assert!(!cache.is_sweeping());

    cache.put("a".to_string(), 1);
    assert_eq!(cache.get("a"), Some(1));

    sleep(Duration::from_millis(250));
    assert_eq!(cache.len(), 1, "Entry lingers until read once the sweep is stopped");
    assert_eq!(cache.get("a"), None);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_sweep_on_tokio_runtime() {
    let cache: Cache<String, i32> = CacheBuilder::new(10)
        .ttl(Duration::from_millis(100))
        .sweep_interval(Duration::from_millis(50))
        .runtime(Handle::current())
        .build()
        .unwrap();

    cache.put("a".to_string(), 1);
    tokio::time::sleep(Duration::from_millis(400)).await;

    assert!(cache.is_empty());
    cache.stop_cleanup();
    assert!(!cache.is_sweeping());
}

// == Concurrency ==

#[test]
fn test_concurrent_put_get() {
    let cache: Arc<Cache<String, i32>> = Arc::new(Cache::new(64, None).unwrap());
    let mut handles = Vec::new();

    for t in 0..8 {
        let cache = Arc::clone(&cache);
        handles.push(thread::spawn(move || {
            for i in 0..1_000 {
                let key = format!("k{}", (t * 31 + i) % 128);
                cache.put(key.clone(), i);
                let _ = cache.get(&key);
                assert!(cache.len() <= 64);
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(cache.len(), 64);
    let stats = cache.stats();
    assert_eq!(stats.hits + stats.misses, 8_000);
}

#[test]
fn test_concurrent_access_with_sweep() {
    let cache: Arc<Cache<String, u32>> = Arc::new(
        CacheBuilder::new(32)
            .ttl(Duration::from_millis(20))
            .sweep_interval(Duration::from_millis(5))
            .build()
            .unwrap(),
    );
    let mut handles = Vec::new();

    for t in 0..4 {
        let cache = Arc::clone(&cache);
        handles.push(thread::spawn(move || {
            for i in 0..500u32 {
                cache.put(format!("t{t}-{}", i % 40), i);
                if let Some(value) = cache.get(format!("t{t}-{}", i % 40).as_str()) {
                    assert_eq!(value, i);
                }
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    assert!(cache.len() <= 32);
    cache.stop_cleanup();
}

#[test]
fn test_drop_stops_sweep() {
    let cache: Cache<String, i32> = Cache::new(4, Some(Duration::from_millis(10))).unwrap();
    assert!(cache.is_sweeping());
    // Dropping joins the sweep thread; the test would hang if it did not stop.
    drop(cache);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_drop_stops_sweep_on_tokio_runtime() {
    let metrics = Handle::current().metrics();
    let baseline = metrics.num_alive_tasks();

    let cache: Cache<String, i32> = CacheBuilder::new(4)
        .ttl(Duration::from_millis(10))
        .runtime(Handle::current())
        .build()
        .unwrap();
    assert!(cache.is_sweeping());
    assert_eq!(metrics.num_alive_tasks(), baseline + 1);

    drop(cache);

    let mut alive = metrics.num_alive_tasks();
    for _ in 0..100 {
        if alive == baseline {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
        alive = metrics.num_alive_tasks();
    }
    assert_eq!(alive, baseline, "Sweep task should exit once the cache is dropped");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_huge_ttl_on_tokio_runtime() {
    let cache: Cache<String, i32> = CacheBuilder::new(4)
        .ttl(Duration::from_secs(u64::MAX))
        .runtime(Handle::current())
        .build()
        .unwrap();

    cache.put("a".to_string(), 1);
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert!(cache.is_sweeping(), "Sweep task should still be waiting");
    assert_eq!(cache.get("a"), Some(1));
    cache.stop_cleanup();
}
