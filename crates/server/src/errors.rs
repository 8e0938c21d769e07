use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use models::EntityKind;
use service::errors::ServiceError;
use thiserror::Error;
use tracing::{debug, error};

/// Request failures, each rendered as `{"Error": <message>}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("The request body is missing at least one of the required attributes")]
    MissingAttribute,
    #[error("The request body is not valid JSON")]
    MalformedBody,
    #[error("No business with this business_id exists")]
    NoBusiness,
    #[error("No review with this review_id exists")]
    NoReview,
    #[error("You have already submitted a review for this business. You can update your previous review, or delete it and submit a new review")]
    DuplicateReview,
    #[error("Internal server error")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingAttribute | ApiError::MalformedBody => StatusCode::BAD_REQUEST,
            ApiError::NoBusiness | ApiError::NoReview => StatusCode::NOT_FOUND,
            ApiError::DuplicateReview => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(reason) => {
                debug!(%reason, "request body rejected");
                ApiError::MissingAttribute
            }
            ServiceError::NotFound(EntityKind::Businesses) => ApiError::NoBusiness,
            ServiceError::NotFound(EntityKind::Reviews) => ApiError::NoReview,
            ServiceError::Conflict(reason) => {
                debug!(%reason, "duplicate review rejected");
                ApiError::DuplicateReview
            }
            ServiceError::Store(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        debug!(error = %rejection.body_text(), "json body rejected");
        ApiError::MalformedBody
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(detail) = &self {
            error!(error = %detail, "store operation failed");
        }
        let status = self.status();
        (status, Json(serde_json::json!({"Error": self.to_string()}))).into_response()
    }
}
