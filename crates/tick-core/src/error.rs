use thiserror::Error;

/// Failures talking to the declared-state store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("status update conflict: {0}")]
    Conflict(String),
}

/// Recoverable reconcile failures, surfaced to the trigger source so the
/// key is retried later.
///
/// A resource that is gone is not an error; deletion is a normal stop
/// path. Cancellation has no error variant at all: cancelling a runner
/// cannot fail.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// The declared state could not be fetched. No runner state changed.
    #[error("failed to fetch declared state: {0}")]
    Fetch(#[source] StoreError),
    /// The status write-back failed. Runner state already changed and
    /// stays as-is; only the report is retried.
    #[error("failed to write status back: {0}")]
    Status(#[source] StoreError),
}
