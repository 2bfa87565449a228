use std::{sync::Arc, time::Duration};

use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

use tick_model::{Condition, ConditionKind, ResourceKey, TickerResource};

use crate::{
    error::ReconcileError,
    metrics::Metrics,
    registry::{RunnerHandle, RunnerRegistry},
    store::StateStore,
    ticker::spawn_ticker,
};

const REASON_STARTED: &str = "Started";
const REASON_RESTARTED: &str = "Restarted";
const REASON_INVALID_INTERVAL: &str = "InvalidInterval";

/// Drives declared resources onto live runners: one runner per declared
/// key, started, restarted on interval change, stopped on deletion.
///
/// The reconciler owns the runner registry and is the only component
/// mutating it. Runner state is authoritative and in-memory only; the
/// status written back to the store is best-effort.
pub struct Reconciler<S> {
    store: S,
    registry: RunnerRegistry,
    metrics: Arc<dyn Metrics>,
    shutdown: CancellationToken,
}

impl<S: StateStore> Reconciler<S> {
    pub fn new(store: S, metrics: Arc<dyn Metrics>) -> Self {
        Self {
            store,
            registry: RunnerRegistry::new(),
            metrics,
            shutdown: CancellationToken::new(),
        }
    }

    /// Number of live runners.
    pub fn active(&self) -> usize {
        self.registry.len()
    }

    /// Bring the running state for `key` in line with its declared state.
    ///
    /// Called at least once per observed change and possibly redundantly;
    /// reconciling unchanged state is a no-op. Calls for the same key
    /// must not run concurrently — the trigger source serializes per
    /// key — while different keys are fully independent.
    ///
    /// A missing resource is a normal stop path, not an error. Errors
    /// are recoverable store failures and mean the caller should retry
    /// the key later.
    #[instrument(level = "debug", skip(self), fields(key = %key))]
    pub async fn reconcile(&self, key: &ResourceKey) -> Result<(), ReconcileError> {
        let snapshot = self.store.get(key).await.map_err(ReconcileError::Fetch)?;

        let Some(resource) = snapshot else {
            if self.stop_runner(key) {
                info!(key = %key, "runner stopped, resource deleted");
            }
            return Ok(());
        };

        if let Err(reason) = resource.spec.validate() {
            if self.stop_runner(key) {
                warn!(key = %key, "runner stopped, declared spec is invalid");
            }
            return self.report_invalid(key, resource, reason.to_string()).await;
        }

        let interval_s = resource.spec.interval_seconds;
        let interval = Duration::from_secs(u64::from(interval_s));

        let restarted = match self.registry.interval_of(key) {
            // Declared and running intervals agree: nothing to do.
            Some(current) if current == interval => return Ok(()),
            Some(_) => {
                // The running ticker closed over its original interval;
                // an interval change is a restart, not a live mutation.
                self.stop_runner(key);
                true
            }
            None => false,
        };

        self.start_runner(key.clone(), interval);
        info!(key = %key, interval_s, restarted, "runner started");

        self.report_running(key, resource, interval_s, restarted).await
    }

    /// Cancel every live runner. Idempotent; used on process shutdown.
    /// Returns how many runners were stopped.
    pub fn shutdown(&self) -> usize {
        self.shutdown.cancel();
        let stopped = self.registry.drain();
        for _ in 0..stopped {
            self.metrics.runner_stopped();
        }
        if stopped > 0 {
            info!(stopped, "all runners stopped");
        }
        stopped
    }

    /// Cancel and deregister the runner for `key`, if one exists.
    fn stop_runner(&self, key: &ResourceKey) -> bool {
        match self.registry.remove(key) {
            Some(handle) => {
                handle.cancel();
                self.metrics.runner_stopped();
                true
            }
            None => false,
        }
    }

    fn start_runner(&self, key: ResourceKey, interval: Duration) {
        let token = self.shutdown.child_token();
        let handle = RunnerHandle::new(token.clone(), interval);
        spawn_ticker(key.clone(), interval, token, Arc::clone(&self.metrics));
        self.registry.insert(key, handle);
        self.metrics.runner_started();
    }

    async fn report_running(
        &self,
        key: &ResourceKey,
        resource: TickerResource,
        interval_s: u32,
        restarted: bool,
    ) -> Result<(), ReconcileError> {
        let now = rfc3339_now();
        let mut status = resource.status;
        status.stamp_start_time(now.clone());

        let reason = if restarted { REASON_RESTARTED } else { REASON_STARTED };
        status.upsert_condition(Condition::new(
            ConditionKind::Running,
            true,
            reason,
            format!("firing every {interval_s}s"),
            now,
        ));

        self.store
            .update_status(key, status)
            .await
            .map_err(ReconcileError::Status)
    }

    async fn report_invalid(
        &self,
        key: &ResourceKey,
        resource: TickerResource,
        message: String,
    ) -> Result<(), ReconcileError> {
        let mut status = resource.status;
        status.upsert_condition(Condition::new(
            ConditionKind::Running,
            false,
            REASON_INVALID_INTERVAL,
            message,
            rfc3339_now(),
        ));

        self.store
            .update_status(key, status)
            .await
            .map_err(ReconcileError::Status)
    }
}

fn rfc3339_now() -> String {
    let now = OffsetDateTime::now_utc();
    now.format(&Rfc3339)
        .unwrap_or_else(|_| now.unix_timestamp().to_string())
}
