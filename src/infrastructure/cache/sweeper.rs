//! Periodic purge of expired strict-TTL entries

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info};

use super::store::CacheStore;

/// Sweep period for a store whose entries live for `ttl`
///
/// Always strictly shorter than the TTL; the divisor is clamped to at least 2.
pub fn sweep_interval(ttl: Duration, divisor: u32) -> Duration {
    (ttl / divisor.max(2)).max(Duration::from_millis(1))
}

/// Handle to a running sweeper; dropping it leaves the task running
#[derive(Debug)]
pub struct SweeperHandle {
    task: JoinHandle<()>,
}

impl SweeperHandle {
    pub fn shutdown(self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Spawns a task that calls `sweep_expired` on `store` every `period`
///
/// Each pass runs in its own task so a panicking pass is logged and the next
/// tick tries again.
pub fn spawn_sweeper<V>(store: CacheStore<V>, period: Duration) -> SweeperHandle
where
    V: Send + Sync + 'static,
{
    let task = tokio::spawn(async move {
        info!(
            store = store.name(),
            period_ms = period.as_millis() as u64,
            "Starting cache sweeper"
        );

        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            let pass = store.clone();
            match tokio::spawn(async move { pass.sweep_expired().await }).await {
                Ok(0) => {}
                Ok(removed) => debug!(store = store.name(), removed, "Swept expired cache entries"),
                Err(e) => error!(store = store.name(), error = %e, "Cache sweep failed"),
            }
        }
    });

    SweeperHandle { task }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CachePolicy;

    #[test]
    fn test_sweep_interval_shorter_than_ttl() {
        let ttl = Duration::from_secs(3600);

        assert_eq!(sweep_interval(ttl, 12), Duration::from_secs(300));
        assert_eq!(sweep_interval(ttl, 0), Duration::from_secs(1800));
        assert_eq!(sweep_interval(Duration::ZERO, 12), Duration::from_millis(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_entry_absent_after_sweep() {
        let store = CacheStore::new("metadata", CachePolicy::StrictTtl, 100);
        let ttl = Duration::from_secs(60);
        store.set("photo.jpg", 1u32, ttl, Vec::<String>::new()).await;

        let handle = spawn_sweeper(store.clone(), sweep_interval(ttl, 12));

        tokio::time::sleep(ttl + Duration::from_secs(6)).await;

        assert_eq!(store.state("photo.jpg").await, None);
        assert!(store.is_empty());

        handle.shutdown();
    }

    #[tokio::test(start_paused = true)]
    async fn test_fresh_entries_survive_sweeps() {
        let store = CacheStore::new("metadata", CachePolicy::StrictTtl, 100);
        store.set("photo.jpg", 1u32, Duration::from_secs(600), Vec::<String>::new()).await;

        let handle = spawn_sweeper(store.clone(), Duration::from_secs(5));
        tokio::time::sleep(Duration::from_secs(30)).await;

        assert!(store.get("photo.jpg").await.is_some());
        handle.shutdown();
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops_task() {
        let store: CacheStore<u32> = CacheStore::new("metadata", CachePolicy::StrictTtl, 100);
        let handle = spawn_sweeper(store, Duration::from_secs(1));
        let task = handle.task;

        task.abort();
        let err = task.await.unwrap_err();
        assert!(err.is_cancelled());
    }
}
