#![cfg(test)]
use std::sync::Arc;

use models::{review, Key};
use serde_json::{json, Value};

use crate::errors::ServiceError;
use crate::storage::{DocumentStore, MemoryStore};

pub fn memory_store() -> Arc<dyn DocumentStore> {
    Arc::new(MemoryStore::new())
}

pub fn cafe_body(owner_id: i64) -> Value {
    json!({
        "name": "Cafe",
        "street_address": "1 Main St",
        "city": "Ames",
        "state": "IA",
        "zip_code": "50010",
        "owner_id": owner_id
    })
}

/// Write a review straight to the store, bypassing the service checks.
pub async fn seed_review(store: &Arc<dyn DocumentStore>, user_id: i64, business_id: i64) -> Result<Key, ServiceError> {
    let body = json!({"user_id": user_id, "business_id": business_id, "stars": 3});
    let content = body.as_object().cloned().unwrap_or_default();
    store.put(&review::new_entity(&content)).await
}
