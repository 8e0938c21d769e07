use std::sync::Arc;

use async_trait::async_trait;
use models::{Entity, Key};
use tokio::sync::RwLock;

use super::{state::StoreState, DocumentStore, Query};
use crate::errors::ServiceError;

/// Process-local document store. Contents are lost on restart.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<StoreState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, key: &Key) -> Result<Option<Entity>, ServiceError> {
        Ok(self.inner.read().await.get(key))
    }

    async fn put(&self, entity: &Entity) -> Result<Key, ServiceError> {
        Ok(self.inner.write().await.put(entity))
    }

    async fn delete(&self, key: &Key) -> Result<bool, ServiceError> {
        Ok(self.inner.write().await.delete(key))
    }

    async fn delete_multi(&self, keys: &[Key]) -> Result<usize, ServiceError> {
        Ok(self.inner.write().await.delete_multi(keys))
    }

    async fn query(&self, query: &Query) -> Result<Vec<Entity>, ServiceError> {
        Ok(self.inner.read().await.query(query))
    }
}
