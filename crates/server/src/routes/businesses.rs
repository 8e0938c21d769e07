use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;
use tracing::info;

use crate::{errors::ApiError, metrics, state::AppState};

fn to_json(entities: Vec<models::Entity>) -> Json<Vec<Value>> {
    Json(entities.iter().map(models::Entity::to_json).collect())
}

#[utoipa::path(
    post, path = "/businesses", tag = "businesses",
    request_body = crate::openapi::BusinessInputDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::BusinessDoc),
        (status = 400, description = "Missing attribute", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn post_business(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let Json(body) = payload?;
    let created = state.businesses.create(&body).await?;
    metrics::BUSINESSES_CREATED_TOTAL.inc();
    Ok((StatusCode::CREATED, Json(created.to_json())))
}

#[utoipa::path(
    get, path = "/businesses", tag = "businesses",
    responses((status = 200, description = "All businesses", body = [crate::openapi::BusinessDoc]))
)]
pub async fn list_businesses(State(state): State<AppState>) -> Result<Json<Vec<Value>>, ApiError> {
    let list = state.businesses.list().await?;
    info!(count = list.len(), "list businesses");
    Ok(to_json(list))
}

#[utoipa::path(
    get, path = "/owners/{owner_id}/businesses", tag = "businesses",
    params(("owner_id" = i64, Path, description = "Owner ID")),
    responses((status = 200, description = "Businesses of the owner", body = [crate::openapi::BusinessDoc]))
)]
pub async fn list_owner_businesses(
    State(state): State<AppState>,
    Path(owner_id): Path<i64>,
) -> Result<Json<Vec<Value>>, ApiError> {
    let list = state.businesses.list_for_owner(owner_id).await?;
    info!(owner_id, count = list.len(), "list businesses for owner");
    Ok(to_json(list))
}

#[utoipa::path(
    get, path = "/businesses/{business_id}", tag = "businesses",
    params(("business_id" = i64, Path, description = "Business ID")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::BusinessDoc),
        (status = 404, description = "No such business", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn get_business(
    State(state): State<AppState>,
    Path(business_id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let found = state.businesses.get(business_id).await?;
    Ok(Json(found.to_json()))
}

#[utoipa::path(
    put, path = "/businesses/{business_id}", tag = "businesses",
    params(("business_id" = i64, Path, description = "Business ID")),
    request_body = crate::openapi::BusinessInputDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::BusinessDoc),
        (status = 400, description = "Missing attribute", body = crate::openapi::ErrorDoc),
        (status = 404, description = "No such business", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn put_business(
    State(state): State<AppState>,
    Path(business_id): Path<i64>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    // a missing business outranks a bad body
    let current = state.businesses.get(business_id).await?;
    let Json(body) = payload?;
    let updated = state.businesses.update_entity(current, &body).await?;
    Ok((StatusCode::OK, Json(updated.to_json())))
}

#[utoipa::path(
    delete, path = "/businesses/{business_id}", tag = "businesses",
    params(("business_id" = i64, Path, description = "Business ID")),
    responses(
        (status = 204, description = "Deleted along with its reviews"),
        (status = 404, description = "No such business", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn delete_business(
    State(state): State<AppState>,
    Path(business_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let reviews_removed = state.businesses.delete(business_id).await?;
    metrics::REVIEWS_CASCADE_DELETED_TOTAL.inc_by(reviews_removed as u64);
    Ok(StatusCode::NO_CONTENT)
}
