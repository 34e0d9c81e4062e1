//! Expired Entry Sweep Task
//!
//! Background task that periodically deletes expired cache entries. The cache
//! itself has no timers and expires lazily; this only keeps the store tidy.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::TtlCache;

/// Spawns a background task that periodically sweeps expired cache entries.
///
/// The task runs in an infinite loop, sleeping for the specified interval
/// between sweeps. Each sweep runs on the blocking pool since the store may
/// write to disk.
///
/// # Arguments
/// * `cache` - Shared cache to sweep
/// * `sweep_interval_secs` - Interval in seconds between sweeps
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
pub fn spawn_sweep_task(cache: Arc<TtlCache>, sweep_interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(sweep_interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting expired-entry sweep task with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            let sweeper = cache.clone();
            let sweep = tokio::task::spawn_blocking(move || sweeper.sweep_expired());
            let removed = match sweep.await {
                Ok(removed) => removed,
                Err(e) => {
                    warn!("Cache sweep task failed: {}", e);
                    continue;
                }
            };

            if removed > 0 {
                info!("Cache sweep: removed {} expired entries", removed);
            } else {
                debug!("Cache sweep: no expired entries found");
            }
        }
    })
}
