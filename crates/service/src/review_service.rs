use std::sync::Arc;

use models::{business, review, validation, Entity};
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::errors::ServiceError;
use crate::storage::{DocumentStore, Query};

/// Review operations, including the one-review-per-user-per-business rule.
#[derive(Clone)]
pub struct ReviewService {
    store: Arc<dyn DocumentStore>,
}

impl ReviewService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self { Self { store } }

    /// Checks run in order: body shape, business exists, no earlier review by
    /// this user for this business. The duplicate check and the write are
    /// separate store calls, so two concurrent creates can both pass it.
    #[instrument(skip(self, body))]
    pub async fn create(&self, body: &Value) -> Result<Entity, ServiceError> {
        let content = validation::validate_review(body)?;
        let business_id = &content[review::BUSINESS_ID];

        // a business key id is always an integer; anything else names nothing
        let business = match business_id.as_i64() {
            Some(id) => self.store.get(&business::key(id)).await?,
            None => None,
        };
        if business.is_none() {
            debug!(%business_id, "review for unknown business");
            return Err(ServiceError::NotFound(business::KIND));
        }

        let user_id = &content[review::USER_ID];
        let existing = self.by_user(user_id.clone()).await?;
        if existing.iter().any(|r| r.get(review::BUSINESS_ID) == Some(business_id)) {
            return Err(ServiceError::Conflict(format!(
                "user {user_id} already reviewed business {business_id}"
            )));
        }

        let mut entity = review::new_entity(content);
        entity.key = self.store.put(&entity).await?;
        info!(key = %entity.key, "review created");
        Ok(entity)
    }

    pub async fn get(&self, id: i64) -> Result<Entity, ServiceError> {
        self.store
            .get(&review::key(id))
            .await?
            .ok_or(ServiceError::NotFound(review::KIND))
    }

    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<Entity>, ServiceError> {
        self.by_user(Value::from(user_id)).await
    }

    async fn by_user(&self, user_id: Value) -> Result<Vec<Entity>, ServiceError> {
        let query = Query::kind(review::KIND).filter(review::USER_ID, user_id);
        self.store.query(&query).await
    }

    /// Update stars, and review_text when supplied.
    pub async fn update(&self, id: i64, body: &Value) -> Result<Entity, ServiceError> {
        let entity = self.get(id).await?;
        self.update_entity(entity, body).await
    }

    #[instrument(skip(self, entity, body), fields(key = %entity.key))]
    pub async fn update_entity(&self, mut entity: Entity, body: &Value) -> Result<Entity, ServiceError> {
        let content = validation::validate_review_update(body)?;
        review::apply_update(&mut entity, content);
        self.store.put(&entity).await?;
        info!("review updated");
        Ok(entity)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let entity = self.get(id).await?;
        self.store.delete(&entity.key).await?;
        info!(key = %entity.key, "review deleted");
        Ok(())
    }
}
