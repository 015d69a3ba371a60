//! TTL Sweep Task
//!
//! Background task that periodically purges expired entries from the
//! in-memory backend. Expired entries are otherwise only dropped lazily when
//! a read touches them, so a long-idle store would hold dead entries forever
//! without this.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::store::MemoryStore;

/// Spawns a task that purges expired entries every `interval_secs` seconds.
///
/// Returns the JoinHandle so the caller can abort the sweep during shutdown.
pub fn spawn_sweep_task(store: Arc<MemoryStore>, interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(interval_secs);

    tokio::spawn(async move {
        info!(interval_secs, "starting TTL sweep task");

        loop {
            tokio::time::sleep(interval).await;

            let removed = store.purge_expired();
            if removed > 0 {
                info!(removed, "TTL sweep purged expired entries");
            } else {
                debug!("TTL sweep found nothing to purge");
            }
        }
    })
}
