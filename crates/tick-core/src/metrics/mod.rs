use tick_model::ResourceKey;

/// Observability sink for runner lifecycle and ticker firings.
///
/// Implementations must be callable from any task: per-key signals are
/// updated concurrently by independent tickers, and the lifecycle
/// signals by the reconciler.
pub trait Metrics: Send + Sync + 'static {
    /// A runner came up; the active-runner count grows by one.
    fn runner_started(&self);
    /// A runner went away; the active-runner count shrinks by one.
    fn runner_stopped(&self);
    /// The ticker for `key` fired at `unix_ts` (seconds since epoch).
    fn ticker_fired(&self, key: &ResourceKey, unix_ts: i64);
}

/// Sink that discards every signal.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopMetrics;

impl Metrics for NoopMetrics {
    fn runner_started(&self) {}
    fn runner_stopped(&self) {}
    fn ticker_fired(&self, _key: &ResourceKey, _unix_ts: i64) {}
}
