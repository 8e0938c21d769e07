use axum::{
    middleware,
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::Health;

use crate::{metrics, openapi::ApiDoc, state::AppState};

pub mod businesses;
pub mod reviews;

pub const GREETING: &str =
    "Hello, this is the main pade for dburger's API. Please enjoy your CRUD operations today.";

pub async fn index() -> &'static str {
    GREETING
}

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the full application router over the given state.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let resources = Router::new()
        .route(
            "/businesses",
            get(businesses::list_businesses).post(businesses::post_business),
        )
        .route(
            "/businesses/:business_id",
            get(businesses::get_business)
                .put(businesses::put_business)
                .delete(businesses::delete_business),
        )
        .route("/owners/:owner_id/businesses", get(businesses::list_owner_businesses))
        .route("/reviews", post(reviews::post_review))
        .route(
            "/reviews/:review_id",
            get(reviews::get_review)
                .put(reviews::put_review)
                .delete(reviews::delete_review),
        )
        .route("/users/:user_id/reviews", get(reviews::list_user_reviews))
        .with_state(state);

    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/metrics", get(metrics::metrics_handler))
        .route("/api-docs/openapi.json", get(openapi_json))
        .merge(resources)
        .layer(middleware::from_fn(metrics::track_requests))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
