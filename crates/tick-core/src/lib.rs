pub mod error;
pub use error::{ReconcileError, StoreError};

pub mod metrics;
pub use metrics::{Metrics, NoopMetrics};

pub mod registry;
pub use registry::{RunnerHandle, RunnerRegistry};

pub mod ticker;
pub use ticker::spawn_ticker;

pub mod store;
pub use store::{MemoryStore, StateStore};

pub mod reconciler;
pub use reconciler::Reconciler;
