//! Periodic eviction of idle live sessions.
//!
//! A client that walks away from an in-progress workout leaves its live
//! context in the registry. This job drops contexts that have not been
//! mutated within the configured idle window. Their last edit was already
//! autosaved, so nothing is lost.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::engine::live_sessions::LiveSessionRegistry;

/// How often the registry is swept.
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(300); // 5 minutes

/// Run the eviction loop until `cancel` is triggered.
pub async fn run(registry: Arc<LiveSessionRegistry>, max_idle: Duration, cancel: CancellationToken) {
    tracing::info!(
        max_idle_secs = max_idle.as_secs(),
        interval_secs = SWEEP_INTERVAL.as_secs(),
        "Idle session sweeper started"
    );

    let mut interval = tokio::time::interval(SWEEP_INTERVAL);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Idle session sweeper stopping");
                break;
            }
            _ = interval.tick() => {
                let evicted = registry.evict_idle(max_idle).await;
                if evicted > 0 {
                    tracing::info!(evicted, "Idle session sweep: evicted sessions");
                } else {
                    tracing::debug!("Idle session sweep: nothing to evict");
                }
            }
        }
    }
}
