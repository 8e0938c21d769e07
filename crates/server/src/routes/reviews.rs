use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;
use service::errors::ServiceError;
use tracing::info;

use crate::{errors::ApiError, metrics, state::AppState};

#[utoipa::path(
    post, path = "/reviews", tag = "reviews",
    request_body = crate::openapi::ReviewInputDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::ReviewDoc),
        (status = 400, description = "Missing attribute", body = crate::openapi::ErrorDoc),
        (status = 404, description = "No such business", body = crate::openapi::ErrorDoc),
        (status = 409, description = "Review already exists", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn post_review(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let Json(body) = payload?;
    match state.reviews.create(&body).await {
        Ok(created) => {
            metrics::REVIEWS_CREATED_TOTAL.inc();
            Ok((StatusCode::CREATED, Json(created.to_json())))
        }
        Err(e @ ServiceError::Conflict(_)) => {
            metrics::DUPLICATE_REVIEWS_TOTAL.inc();
            Err(e.into())
        }
        Err(e) => Err(e.into()),
    }
}

#[utoipa::path(
    get, path = "/reviews/{review_id}", tag = "reviews",
    params(("review_id" = i64, Path, description = "Review ID")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::ReviewDoc),
        (status = 404, description = "No such review", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn get_review(
    State(state): State<AppState>,
    Path(review_id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let found = state.reviews.get(review_id).await?;
    Ok(Json(found.to_json()))
}

#[utoipa::path(
    get, path = "/users/{user_id}/reviews", tag = "reviews",
    params(("user_id" = i64, Path, description = "User ID")),
    responses((status = 200, description = "Reviews by the user", body = [crate::openapi::ReviewDoc]))
)]
pub async fn list_user_reviews(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<Value>>, ApiError> {
    let list = state.reviews.list_for_user(user_id).await?;
    info!(user_id, count = list.len(), "list reviews for user");
    Ok(Json(list.iter().map(models::Entity::to_json).collect()))
}

#[utoipa::path(
    put, path = "/reviews/{review_id}", tag = "reviews",
    params(("review_id" = i64, Path, description = "Review ID")),
    request_body = crate::openapi::ReviewUpdateDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::ReviewDoc),
        (status = 400, description = "Missing stars", body = crate::openapi::ErrorDoc),
        (status = 404, description = "No such review", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn put_review(
    State(state): State<AppState>,
    Path(review_id): Path<i64>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    // a missing review outranks a bad body
    let current = state.reviews.get(review_id).await?;
    let Json(body) = payload?;
    let updated = state.reviews.update_entity(current, &body).await?;
    Ok((StatusCode::OK, Json(updated.to_json())))
}

#[utoipa::path(
    delete, path = "/reviews/{review_id}", tag = "reviews",
    params(("review_id" = i64, Path, description = "Review ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "No such review", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn delete_review(
    State(state): State<AppState>,
    Path(review_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.reviews.delete(review_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
