use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use async_trait::async_trait;

use tick_model::{ResourceKey, TickerResource, TickerSpec, TickerStatus};

use crate::error::StoreError;

use super::StateStore;

/// In-process declared-state store.
///
/// `apply`/`delete` are the external actor's write path; the reconciler
/// only uses the [`StateStore`] surface. Cheap to clone, all clones
/// share one table.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<HashMap<ResourceKey, TickerResource>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create or update the declared spec for `key`.
    ///
    /// An existing resource keeps its status; only the spec is replaced,
    /// the way a declarative apply works.
    pub fn apply(&self, key: ResourceKey, spec: TickerSpec) {
        let mut inner = self.inner.write().unwrap();
        inner
            .entry(key.clone())
            .and_modify(|resource| resource.spec = spec)
            .or_insert_with(|| TickerResource::new(key, spec));
    }

    /// Delete the resource for `key`. Returns whether it existed.
    pub fn delete(&self, key: &ResourceKey) -> bool {
        let mut inner = self.inner.write().unwrap();
        inner.remove(key).is_some()
    }

    /// Keys of every declared resource, in no particular order.
    pub fn keys(&self) -> Vec<ResourceKey> {
        let inner = self.inner.read().unwrap();
        inner.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        let inner = self.inner.read().unwrap();
        inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl StateStore for MemoryStore {
    async fn get(&self, key: &ResourceKey) -> Result<Option<TickerResource>, StoreError> {
        let inner = self.inner.read().unwrap();
        Ok(inner.get(key).cloned())
    }

    async fn update_status(
        &self,
        key: &ResourceKey,
        status: TickerStatus,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.write().unwrap();
        match inner.get_mut(key) {
            Some(resource) => {
                resource.status = status;
                Ok(())
            }
            None => Err(StoreError::Conflict(format!(
                "cannot update status of {key}: resource is gone"
            ))),
        }
    }
}
