mod memory;
pub use memory::MemoryStore;

use async_trait::async_trait;

use tick_model::{ResourceKey, TickerResource, TickerStatus};

use crate::error::StoreError;

/// Declared-state store the reconciler reads from and reports back to.
///
/// Implementations deliver eventually-consistent snapshots: `get`
/// returning `None` means the resource is deleted or never existed,
/// which is a normal outcome rather than an error.
#[async_trait]
pub trait StateStore: Send + Sync + 'static {
    /// Fetch the current snapshot for `key`.
    async fn get(&self, key: &ResourceKey) -> Result<Option<TickerResource>, StoreError>;

    /// Replace the observed status of `key`.
    async fn update_status(
        &self,
        key: &ResourceKey,
        status: TickerStatus,
    ) -> Result<(), StoreError>;
}
