//! Background Tasks Module
//!
//! Contains background tasks that run periodically while a cache is alive.
//!
//! # Tasks
//! - TTL Sweep: Removes expired cache entries at a fixed interval

mod cleanup;

pub(crate) use cleanup::{spawn_sweep_task, spawn_sweep_thread, SweepHandle};
