use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

use tokio_util::sync::CancellationToken;

use tick_model::ResourceKey;

/// Cancellation capability and last-applied configuration for one live
/// runner.
///
/// At most one handle exists per key; the registry enforces this on
/// insert. Cancelling is idempotent and cannot fail.
#[derive(Debug)]
pub struct RunnerHandle {
    token: CancellationToken,
    interval: Duration,
}

impl RunnerHandle {
    pub fn new(token: CancellationToken, interval: Duration) -> Self {
        Self { token, interval }
    }

    /// The interval the running ticker was started with.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Signal the ticker to stop. Safe to call more than once; the
    /// ticker observes it immediately while waiting for its next tick.
    pub fn cancel(&self) {
        self.token.cancel();
    }
}

/// In-memory table of live runners, keyed by resource identity.
///
/// The registry stores handles and nothing else; all start/stop policy
/// lives in the reconciler driving it. Not persisted: it is rebuilt
/// implicitly as reconciliations occur. Each operation takes the lock
/// for a single map access and never holds it across an await point.
#[derive(Clone, Default)]
pub struct RunnerRegistry {
    inner: Arc<Mutex<HashMap<ResourceKey, RunnerHandle>>>,
}

impl RunnerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &ResourceKey) -> bool {
        let inner = self.inner.lock().unwrap();
        inner.contains_key(key)
    }

    /// The interval of the live runner for `key`, if one is registered.
    pub fn interval_of(&self, key: &ResourceKey) -> Option<Duration> {
        let inner = self.inner.lock().unwrap();
        inner.get(key).map(RunnerHandle::interval)
    }

    /// Register a freshly started runner.
    ///
    /// Panics if a handle is already registered for `key`. Reconciles
    /// for one key are serialized by the trigger source, so a double
    /// insert means that discipline was broken and the process state
    /// can no longer be trusted.
    pub fn insert(&self, key: ResourceKey, handle: RunnerHandle) {
        let mut inner = self.inner.lock().unwrap();
        if inner.insert(key.clone(), handle).is_some() {
            panic!("duplicate runner registered for {key}; per-key reconcile serialization was violated");
        }
    }

    /// Remove and return the handle for `key`, if any. Does not cancel;
    /// the caller decides what to do with the handle.
    pub fn remove(&self, key: &ResourceKey) -> Option<RunnerHandle> {
        let mut inner = self.inner.lock().unwrap();
        inner.remove(key)
    }

    /// Cancel and drop every registered handle. Returns how many
    /// runners were stopped.
    pub fn drain(&self) -> usize {
        let mut inner = self.inner.lock().unwrap();
        let stopped = inner.len();
        for handle in inner.values() {
            handle.cancel();
        }
        inner.clear();
        stopped
    }

    pub fn len(&self) -> usize {
        let inner = self.inner.lock().unwrap();
        inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle(secs: u64) -> RunnerHandle {
        RunnerHandle::new(CancellationToken::new(), Duration::from_secs(secs))
    }

    #[test]
    fn insert_and_lookup() {
        let registry = RunnerRegistry::new();
        let key = ResourceKey::new("ns", "a");

        assert!(!registry.contains(&key));
        registry.insert(key.clone(), handle(5));

        assert!(registry.contains(&key));
        assert_eq!(registry.interval_of(&key), Some(Duration::from_secs(5)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn remove_returns_handle_without_cancelling() {
        let registry = RunnerRegistry::new();
        let key = ResourceKey::new("ns", "a");
        let token = CancellationToken::new();

        registry.insert(
            key.clone(),
            RunnerHandle::new(token.clone(), Duration::from_secs(1)),
        );

        let removed = registry.remove(&key).expect("handle should exist");
        assert!(!token.is_cancelled());

        removed.cancel();
        assert!(token.is_cancelled());
        assert!(registry.is_empty());
    }

    #[test]
    fn remove_missing_is_none() {
        let registry = RunnerRegistry::new();
        assert!(registry.remove(&ResourceKey::new("ns", "ghost")).is_none());
    }

    #[test]
    #[should_panic(expected = "duplicate runner registered for ns/a")]
    fn double_insert_panics() {
        let registry = RunnerRegistry::new();
        let key = ResourceKey::new("ns", "a");

        registry.insert(key.clone(), handle(1));
        registry.insert(key, handle(2));
    }

    #[test]
    fn drain_cancels_everything() {
        let registry = RunnerRegistry::new();
        let tokens: Vec<CancellationToken> = (0..3).map(|_| CancellationToken::new()).collect();

        for (i, token) in tokens.iter().enumerate() {
            registry.insert(
                ResourceKey::new("ns", format!("task-{i}")),
                RunnerHandle::new(token.clone(), Duration::from_secs(1)),
            );
        }

        assert_eq!(registry.drain(), 3);
        assert!(registry.is_empty());
        assert!(tokens.iter().all(CancellationToken::is_cancelled));
    }

    #[test]
    fn cancel_is_idempotent() {
        let h = handle(1);
        h.cancel();
        h.cancel();
    }
}
