use std::{sync::Arc, time::Duration};

use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use tokio::{
    task::JoinHandle,
    time::{Instant, interval_at},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use tick_model::ResourceKey;

use crate::metrics::Metrics;

/// Spawn the periodic worker for one resource.
///
/// The key and interval are resolved here and moved into the task; a
/// changed declaration is applied by cancelling this worker and
/// spawning a replacement, never by mutating shared state the task
/// reads later.
///
/// The first fire lands one full `interval` after start. Cancellation
/// wins over a due tick and ends the task with no further side effects.
pub fn spawn_ticker(
    key: ResourceKey,
    interval: Duration,
    token: CancellationToken,
    metrics: Arc<dyn Metrics>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + interval, interval);
        debug!(key = %key, interval_s = interval.as_secs(), "ticker started");

        loop {
            tokio::select! {
                biased;
                _ = token.cancelled() => {
                    debug!(key = %key, "ticker stopped");
                    return;
                }
                _ = ticker.tick() => {
                    fire(&key, metrics.as_ref());
                }
            }
        }
    })
}

fn fire(key: &ResourceKey, metrics: &dyn Metrics) {
    let now = OffsetDateTime::now_utc();
    let stamp = now
        .format(&Rfc3339)
        .unwrap_or_else(|_| now.unix_timestamp().to_string());

    info!(key = %key, "tick at {stamp}");
    metrics.ticker_fired(key, now.unix_timestamp());
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU64, Ordering};

    use tokio::time::advance;

    use super::*;

    #[derive(Default)]
    struct FireCounter {
        fires: AtomicU64,
    }

    impl Metrics for FireCounter {
        fn runner_started(&self) {}
        fn runner_stopped(&self) {}
        fn ticker_fired(&self, _key: &ResourceKey, _unix_ts: i64) {
            self.fires.fetch_add(1, Ordering::SeqCst);
        }
    }

    async fn settle() {
        for _ in 0..16 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn first_fire_waits_one_full_period() {
        let counter = Arc::new(FireCounter::default());
        let token = CancellationToken::new();
        let _ticker = spawn_ticker(
            ResourceKey::new("ns", "a"),
            Duration::from_secs(2),
            token.clone(),
            counter.clone(),
        );
        settle().await;
        assert_eq!(counter.fires.load(Ordering::SeqCst), 0);

        advance(Duration::from_millis(1999)).await;
        settle().await;
        assert_eq!(counter.fires.load(Ordering::SeqCst), 0);

        advance(Duration::from_millis(1)).await;
        settle().await;
        assert_eq!(counter.fires.load(Ordering::SeqCst), 1);

        token.cancel();
    }

    #[tokio::test(start_paused = true)]
    async fn fires_once_per_period() {
        let counter = Arc::new(FireCounter::default());
        let token = CancellationToken::new();
        let _ticker = spawn_ticker(
            ResourceKey::new("ns", "a"),
            Duration::from_secs(3),
            token.clone(),
            counter.clone(),
        );

        for expected in 1..=4 {
            advance(Duration::from_secs(3)).await;
            settle().await;
            assert_eq!(counter.fires.load(Ordering::SeqCst), expected);
        }

        token.cancel();
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_stops_all_side_effects() {
        let counter = Arc::new(FireCounter::default());
        let token = CancellationToken::new();
        let handle = spawn_ticker(
            ResourceKey::new("ns", "a"),
            Duration::from_secs(2),
            token.clone(),
            counter.clone(),
        );

        advance(Duration::from_secs(2)).await;
        settle().await;
        assert_eq!(counter.fires.load(Ordering::SeqCst), 1);

        token.cancel();
        handle.await.expect("ticker task should exit cleanly");

        advance(Duration::from_secs(20)).await;
        settle().await;
        assert_eq!(counter.fires.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_before_first_tick_never_fires() {
        let counter = Arc::new(FireCounter::default());
        let token = CancellationToken::new();
        let handle = spawn_ticker(
            ResourceKey::new("ns", "a"),
            Duration::from_secs(5),
            token.clone(),
            counter.clone(),
        );

        token.cancel();
        handle.await.expect("ticker task should exit cleanly");

        advance(Duration::from_secs(30)).await;
        settle().await;
        assert_eq!(counter.fires.load(Ordering::SeqCst), 0);
    }
}
