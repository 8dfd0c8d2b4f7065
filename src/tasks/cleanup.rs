//! Cleanup Task
//!
//! Background task that periodically purges expired cache entries and
//! forgets rate limiter state for clients that have gone quiet.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::api::AppState;

/// Spawns a background task that runs a cleanup pass every `interval_secs`.
///
/// Returns the task's JoinHandle so shutdown can abort it.
pub fn spawn_cleanup_task(state: AppState, interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(interval_secs);

    tokio::spawn(async move {
        info!("Starting cleanup task with interval of {} seconds", interval_secs);

        loop {
            tokio::time::sleep(interval).await;

            let removed = state.cache.purge_expired().await;
            let tracked = state.limiter.prune();

            if removed > 0 {
                info!("Cleanup: removed {} expired cache entries", removed);
            }
            debug!("Cleanup: tracking {} rate-limited clients", tracked);
        }
    })
}
