//! TTL Sweep Task
//!
//! Background activity that periodically removes expired cache entries.
//! Runs either on a dedicated thread or as a task on a tokio runtime.

use std::hash::Hash;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Weak;
use std::thread;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle as RuntimeHandle;
use tokio::sync::oneshot;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::cache::CacheStore;
use crate::error::Result;

/// Name given to the sweep thread.
const SWEEP_THREAD_NAME: &str = "cache-sweeper";

/// Longest period the task backend waits between passes. Longer intervals
/// are clamped so timer deadlines stay representable.
const MAX_TASK_PERIOD: Duration = Duration::from_secs(60 * 60 * 24 * 365);

enum Worker {
    Thread {
        stop: mpsc::Sender<()>,
        handle: thread::JoinHandle<()>,
    },
    Task {
        stop: oneshot::Sender<()>,
        handle: tokio::task::JoinHandle<()>,
    },
}

// == Sweep Handle ==
/// Owns a running sweep and halts it on [`stop`](Self::stop) or drop.
pub struct SweepHandle {
    worker: Option<Worker>,
}

impl SweepHandle {
    /// Halts the sweep. Safe to call any number of times.
    ///
    /// The thread backend is joined before returning. The task backend is
    /// signalled and exits at its next poll without starting another pass.
    pub fn stop(&mut self) {
        match self.worker.take() {
            Some(Worker::Thread { stop, handle }) => {
                // The receiver may already be gone if the thread exited on its own.
                let _ = stop.send(());
                if handle.join().is_err() {
                    warn!("TTL sweep thread panicked");
                }
            }
            Some(Worker::Task { stop, .. }) => {
                // Fails only if the task already exited on its own.
                let _ = stop.send(());
                debug!("TTL sweep task signalled to stop");
            }
            None => {}
        }
    }

    /// Returns true while the sweep is still running.
    pub fn is_active(&self) -> bool {
        match &self.worker {
            Some(Worker::Thread { handle, .. }) => !handle.is_finished(),
            Some(Worker::Task { handle, .. }) => !handle.is_finished(),
            None => false,
        }
    }
}

impl Drop for SweepHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Spawns a thread that purges expired entries every `interval`.
///
/// The thread holds only a weak reference to the store and exits once the
/// store is dropped, even without an explicit stop.
///
/// # Errors
/// [`CacheError::SweeperSpawn`](crate::error::CacheError::SweeperSpawn) if
/// the OS refuses to create the thread.
pub fn spawn_sweep_thread<K, V>(
    store: Weak<Mutex<CacheStore<K, V>>>,
    interval: Duration,
) -> Result<SweepHandle>
where
    K: Eq + Hash + Clone + Send + 'static,
    V: Clone + Send + 'static,
{
    let (stop, stop_rx) = mpsc::channel::<()>();

    let handle = thread::Builder::new()
        .name(SWEEP_THREAD_NAME.to_string())
        .spawn(move || {
            info!("Starting TTL sweep thread with interval of {:?}", interval);

            loop {
                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {}
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
                if !sweep_once(&store) {
                    break;
                }
            }

            info!("TTL sweep thread stopped");
        })?;

    Ok(SweepHandle {
        worker: Some(Worker::Thread { stop, handle }),
    })
}

/// Spawns a tokio task on `runtime` that purges expired entries every `interval`.
///
/// The first pass runs one full interval after spawning. Intervals beyond
/// a year are clamped to a year. The loop races every tick against a stop
/// signal, so a stopped task never starts another pass.
pub fn spawn_sweep_task<K, V>(
    store: Weak<Mutex<CacheStore<K, V>>>,
    interval: Duration,
    runtime: &RuntimeHandle,
) -> SweepHandle
where
    K: Eq + Hash + Clone + Send + 'static,
    V: Clone + Send + 'static,
{
    let (stop, mut stop_rx) = oneshot::channel::<()>();
    let period = interval.min(MAX_TASK_PERIOD);

    let handle = runtime.spawn(async move {
        info!("Starting TTL sweep task with interval of {:?}", period);

        let now = tokio::time::Instant::now();
        let start = now.checked_add(period).unwrap_or(now);
        let mut ticker = tokio::time::interval_at(start, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                // A dropped sender counts as a stop request too.
                _ = &mut stop_rx => break,
                _ = ticker.tick() => {
                    if !sweep_once(&store) {
                        break;
                    }
                }
            }
        }

        info!("TTL sweep task stopped");
    });

    SweepHandle {
        worker: Some(Worker::Task { stop, handle }),
    }
}

/// Runs one pass under the store lock. Returns false once the store is gone.
fn sweep_once<K, V>(store: &Weak<Mutex<CacheStore<K, V>>>) -> bool
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    let Some(store) = store.upgrade() else {
        return false;
    };

    let removed = store.lock().remove_expired();

    if removed > 0 {
        info!("TTL sweep: removed {} expired entries", removed);
    } else {
        debug!("TTL sweep: no expired entries found");
    }
    true
}
