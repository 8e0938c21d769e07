use std::sync::Arc;

use models::{business, review, validation, Entity};
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::errors::ServiceError;
use crate::storage::{DocumentStore, Query};

/// Business operations. Each call issues its store operations directly; there
/// is no transaction spanning them.
#[derive(Clone)]
pub struct BusinessService {
    store: Arc<dyn DocumentStore>,
}

impl BusinessService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self { Self { store } }

    #[instrument(skip(self, body))]
    pub async fn create(&self, body: &Value) -> Result<Entity, ServiceError> {
        let content = validation::validate_business(body)?;
        let mut entity = business::new_entity(content);
        entity.key = self.store.put(&entity).await?;
        info!(key = %entity.key, "business created");
        Ok(entity)
    }

    pub async fn list(&self) -> Result<Vec<Entity>, ServiceError> {
        self.store.query(&Query::kind(business::KIND)).await
    }

    pub async fn list_for_owner(&self, owner_id: i64) -> Result<Vec<Entity>, ServiceError> {
        let query = Query::kind(business::KIND).filter(business::OWNER_ID, owner_id);
        self.store.query(&query).await
    }

    pub async fn get(&self, id: i64) -> Result<Entity, ServiceError> {
        self.store
            .get(&business::key(id))
            .await?
            .ok_or(ServiceError::NotFound(business::KIND))
    }

    /// Replace the mutable fields. Existence is checked before the body.
    pub async fn update(&self, id: i64, body: &Value) -> Result<Entity, ServiceError> {
        let entity = self.get(id).await?;
        self.update_entity(entity, body).await
    }

    /// Same as [`update`](Self::update) for a business the caller already fetched.
    #[instrument(skip(self, entity, body), fields(key = %entity.key))]
    pub async fn update_entity(&self, mut entity: Entity, body: &Value) -> Result<Entity, ServiceError> {
        let content = validation::validate_business(body)?;
        business::apply_update(&mut entity, content);
        self.store.put(&entity).await?;
        info!("business updated");
        Ok(entity)
    }

    /// Delete the business and every review pointing at it in one store batch.
    /// Returns how many reviews went with it. A review created between the
    /// query and the batch survives as an orphan.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<usize, ServiceError> {
        let entity = self.get(id).await?;
        let reviews = self
            .store
            .query(&Query::kind(review::KIND).filter(review::BUSINESS_ID, id))
            .await?;
        let mut keys = Vec::with_capacity(reviews.len() + 1);
        keys.push(entity.key);
        keys.extend(reviews.iter().map(|r| r.key));
        debug!(reviews = reviews.len(), "cascading business delete");
        let removed = self.store.delete_multi(&keys).await?;
        let reviews_removed = removed.saturating_sub(1);
        info!(key = %entity.key, reviews_removed, "business deleted");
        Ok(reviews_removed)
    }
}
