//! Storage abstractions for service layer
//!
//! `DocumentStore` is the store client the services talk to: key-based
//! get/put/delete plus kind-scoped equality queries. Two implementations
//! share the same in-process state type.

use async_trait::async_trait;
use models::{Entity, EntityKind, Key};
use serde_json::{Map, Value};

use crate::errors::ServiceError;

pub mod state;
pub mod memory;
pub mod json_file_store;

pub use json_file_store::JsonFileStore;
pub use memory::MemoryStore;

/// Kind-scoped query. Every filter is an equality test and all must hold.
#[derive(Clone, Debug, PartialEq)]
pub struct Query {
    pub kind: EntityKind,
    pub filters: Vec<(String, Value)>,
}

impl Query {
    pub fn kind(kind: EntityKind) -> Self {
        Self { kind, filters: Vec::new() }
    }

    pub fn filter(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.filters.push((field.to_string(), value.into()));
        self
    }

    pub fn matches(&self, properties: &Map<String, Value>) -> bool {
        self.filters
            .iter()
            .all(|(field, value)| properties.get(field) == Some(value))
    }
}

/// Store client used by the services.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch by complete key; an incomplete key never matches.
    async fn get(&self, key: &Key) -> Result<Option<Entity>, ServiceError>;

    /// Insert or fully replace. An incomplete key gets a fresh id; the
    /// resulting complete key is returned.
    async fn put(&self, entity: &Entity) -> Result<Key, ServiceError>;

    /// Remove one record; returns whether it existed.
    async fn delete(&self, key: &Key) -> Result<bool, ServiceError>;

    /// Remove several records as one unit; returns how many existed.
    async fn delete_multi(&self, keys: &[Key]) -> Result<usize, ServiceError>;

    /// Unordered scan of `query.kind` with the query's equality filters.
    async fn query(&self, query: &Query) -> Result<Vec<Entity>, ServiceError>;
}
