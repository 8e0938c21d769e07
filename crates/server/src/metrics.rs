use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use once_cell::sync::Lazy;
use prometheus::{
    register_histogram_vec, register_int_counter, register_int_counter_vec, Encoder, HistogramVec, IntCounter,
    IntCounterVec, TextEncoder,
};

// Prometheus metrics (default registry)
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "review_api_http_requests_total",
        "HTTP requests handled, by method, route and status",
        &["method", "route", "status"]
    )
    .expect("register http_requests_total")
});

pub static HTTP_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "review_api_http_request_duration_seconds",
        "Request duration in seconds",
        &["method", "route"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5]
    )
    .expect("register http_request_duration")
});

pub static BUSINESSES_CREATED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("review_api_businesses_created_total", "Businesses created")
        .expect("register businesses_created_total")
});

pub static REVIEWS_CREATED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("review_api_reviews_created_total", "Reviews created")
        .expect("register reviews_created_total")
});

pub static DUPLICATE_REVIEWS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "review_api_duplicate_reviews_total",
        "Review creations rejected because the user already reviewed the business"
    )
    .expect("register duplicate_reviews_total")
});

pub static REVIEWS_CASCADE_DELETED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "review_api_reviews_cascade_deleted_total",
        "Reviews removed together with their business"
    )
    .expect("register reviews_cascade_deleted_total")
});

/// Middleware recording count and latency per matched route.
pub async fn track_requests(req: Request, next: Next) -> Response {
    let method = req.method().to_string();
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_owned());
    let start = Instant::now();

    let response = next.run(req).await;

    let status = response.status().as_u16().to_string();
    HTTP_REQUESTS_TOTAL.with_label_values(&[method.as_str(), route.as_str(), status.as_str()]).inc();
    HTTP_REQUEST_DURATION
        .with_label_values(&[method.as_str(), route.as_str()])
        .observe(start.elapsed().as_secs_f64());
    response
}

pub fn encode_metrics() -> (StatusCode, String) {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (StatusCode::INTERNAL_SERVER_ERROR, format!("metrics encode error: {e}"));
    }
    (StatusCode::OK, String::from_utf8(buffer).unwrap_or_default())
}

pub async fn metrics_handler() -> (StatusCode, String) {
    // touch the domain counters so they are exported before first use
    Lazy::force(&BUSINESSES_CREATED_TOTAL);
    Lazy::force(&REVIEWS_CREATED_TOTAL);
    Lazy::force(&DUPLICATE_REVIEWS_TOTAL);
    Lazy::force(&REVIEWS_CASCADE_DELETED_TOTAL);
    encode_metrics()
}
