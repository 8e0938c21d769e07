use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use models::{Entity, Key};
use serde_json::{json, Value};
use service::errors::ServiceError;
use service::storage::{DocumentStore, MemoryStore, Query};
use tower::Service;

const ERROR_MISSING: &str = "The request body is missing at least one of the required attributes";
const ERROR_NO_REVIEW: &str = "No review with this review_id exists";
const ERROR_NO_BUS: &str = "No business with this business_id exists";
const ERROR_CONFLICT: &str = "You have already submitted a review for this business. You can update your previous review, or delete it and submit a new review";

fn build_app() -> Router {
    server::startup::app(Arc::new(MemoryStore::new()))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> anyhow::Result<(StatusCode, Value)> {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(b) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&b)?))?,
        None => builder.body(Body::empty())?,
    };
    let resp = app.clone().call(req).await?;
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
    let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes)? };
    Ok((status, value))
}

fn cafe(owner_id: i64) -> Value {
    json!({
        "name": "Cafe",
        "street_address": "1 Main St",
        "city": "Ames",
        "state": "IA",
        "zip_code": "50010",
        "owner_id": owner_id
    })
}

async fn create_business(app: &Router, owner_id: i64) -> anyhow::Result<i64> {
    let (status, body) = send(app, "POST", "/businesses", Some(cafe(owner_id))).await?;
    assert_eq!(status, StatusCode::CREATED);
    Ok(body["id"].as_i64().expect("integer id"))
}

async fn create_review(app: &Router, user_id: i64, business_id: i64) -> anyhow::Result<i64> {
    let (status, body) = send(
        app,
        "POST",
        "/reviews",
        Some(json!({"user_id": user_id, "business_id": business_id, "stars": 4})),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED);
    Ok(body["id"].as_i64().expect("integer id"))
}

#[tokio::test]
async fn index_returns_greeting() -> anyhow::Result<()> {
    let app = build_app();
    let req = Request::builder().uri("/").body(Body::empty())?;
    let resp = app.clone().call(req).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
    assert_eq!(std::str::from_utf8(&bytes)?, server::routes::GREETING);
    assert!(server::routes::GREETING.starts_with("Hello, this is the main pade for dburger's API."));
    Ok(())
}

#[tokio::test]
async fn health_ok() -> anyhow::Result<()> {
    let (status, body) = send(&build_app(), "GET", "/health", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn create_business_returns_all_fields_and_id() -> anyhow::Result<()> {
    let app = build_app();
    let (status, body) = send(&app, "POST", "/businesses", Some(cafe(7))).await?;
    assert_eq!(status, StatusCode::CREATED);
    for (k, v) in cafe(7).as_object().unwrap() {
        assert_eq!(&body[k], v, "field {k}");
    }
    assert!(body["id"].is_i64());

    let (_, second) = send(&app, "POST", "/businesses", Some(cafe(7))).await?;
    assert_ne!(second["id"], body["id"]);
    Ok(())
}

#[tokio::test]
async fn create_business_missing_field_is_400_and_writes_nothing() -> anyhow::Result<()> {
    let app = build_app();
    for field in ["name", "street_address", "city", "state", "zip_code", "owner_id"] {
        let mut payload = cafe(7);
        payload.as_object_mut().unwrap().remove(field);
        let (status, body) = send(&app, "POST", "/businesses", Some(payload)).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST, "without {field}");
        assert_eq!(body, json!({"Error": ERROR_MISSING}));
    }
    let (_, list) = send(&app, "GET", "/businesses", None).await?;
    assert_eq!(list, json!([]));
    Ok(())
}

#[tokio::test]
async fn malformed_json_is_400() -> anyhow::Result<()> {
    let app = build_app();
    let req = Request::builder()
        .method("POST")
        .uri("/businesses")
        .header("content-type", "application/json")
        .body(Body::from("{\"name\": "))?;
    let resp = app.clone().call(req).await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn get_unknown_business_is_404() -> anyhow::Result<()> {
    let (status, body) = send(&build_app(), "GET", "/businesses/424242", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"Error": ERROR_NO_BUS}));
    Ok(())
}

#[tokio::test]
async fn non_integer_path_id_is_rejected() -> anyhow::Result<()> {
    let app = build_app();
    let req = Request::builder().uri("/businesses/abc").body(Body::empty())?;
    let resp = app.clone().call(req).await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn list_and_filter_by_owner() -> anyhow::Result<()> {
    let app = build_app();
    let a = create_business(&app, 7).await?;
    let b = create_business(&app, 7).await?;
    let c = create_business(&app, 8).await?;

    let (status, all) = send(&app, "GET", "/businesses", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), 3);

    let (status, mine) = send(&app, "GET", "/owners/7/businesses", None).await?;
    assert_eq!(status, StatusCode::OK);
    let mut ids: Vec<i64> = mine.as_array().unwrap().iter().map(|b| b["id"].as_i64().unwrap()).collect();
    ids.sort();
    assert_eq!(ids, vec![a, b]);

    let (_, theirs) = send(&app, "GET", "/owners/8/businesses", None).await?;
    assert_eq!(theirs[0]["id"], json!(c));
    let (_, nobody) = send(&app, "GET", "/owners/9/businesses", None).await?;
    assert_eq!(nobody, json!([]));
    Ok(())
}

#[tokio::test]
async fn put_business_replaces_fields_with_200() -> anyhow::Result<()> {
    let app = build_app();
    let id = create_business(&app, 7).await?;
    let update = json!({
        "name": "Diner",
        "street_address": "2 Elm St",
        "city": "Boone",
        "state": "IA",
        "zip_code": "50036",
        "owner_id": 99
    });
    let (status, body) = send(&app, "PUT", &format!("/businesses/{id}"), Some(update)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], json!(id));
    assert_eq!(body["name"], "Diner");
    assert_eq!(body["zip_code"], "50036");
    // owner_id is fixed at creation
    assert_eq!(body["owner_id"], json!(7));

    let (_, fetched) = send(&app, "GET", &format!("/businesses/{id}"), None).await?;
    assert_eq!(fetched, body);
    Ok(())
}

#[tokio::test]
async fn put_business_errors() -> anyhow::Result<()> {
    let app = build_app();
    let (status, body) = send(&app, "PUT", "/businesses/5555", Some(json!({}))).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"Error": ERROR_NO_BUS}));

    let id = create_business(&app, 7).await?;
    let (status, body) = send(&app, "PUT", &format!("/businesses/{id}"), Some(json!({"name": "x"}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"Error": ERROR_MISSING}));
    Ok(())
}

#[tokio::test]
async fn delete_business_cascades_to_reviews() -> anyhow::Result<()> {
    let app = build_app();
    let doomed = create_business(&app, 7).await?;
    let kept = create_business(&app, 7).await?;
    let r1 = create_review(&app, 1, doomed).await?;
    let r2 = create_review(&app, 2, doomed).await?;
    let r3 = create_review(&app, 1, kept).await?;

    let (status, body) = send(&app, "DELETE", &format!("/businesses/{doomed}"), None).await?;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, _) = send(&app, "GET", &format!("/businesses/{doomed}"), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    for r in [r1, r2] {
        let (status, body) = send(&app, "GET", &format!("/reviews/{r}"), None).await?;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"Error": ERROR_NO_REVIEW}));
    }
    let (status, _) = send(&app, "GET", &format!("/reviews/{r3}"), None).await?;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, "DELETE", &format!("/businesses/{doomed}"), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"Error": ERROR_NO_BUS}));
    Ok(())
}

#[tokio::test]
async fn cafe_review_scenario() -> anyhow::Result<()> {
    let app = build_app();
    let (status, business) = send(
        &app,
        "POST",
        "/businesses",
        Some(json!({"name":"Cafe","street_address":"1 Main St","city":"Ames","state":"IA","zip_code":"50010","owner_id":7})),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(business["owner_id"], json!(7));
    let bid = business["id"].as_i64().expect("integer id");

    let review = json!({"user_id": 3, "business_id": bid, "stars": 5});
    let (status, created) = send(&app, "POST", "/reviews", Some(review.clone())).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert!(created["id"].is_i64());
    assert_eq!(created["stars"], json!(5));

    let (status, body) = send(&app, "POST", "/reviews", Some(review)).await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body, json!({"Error": ERROR_CONFLICT}));

    // the first review is unchanged and still the only one
    let (_, mine) = send(&app, "GET", "/users/3/reviews", None).await?;
    assert_eq!(mine, json!([created]));
    Ok(())
}

#[tokio::test]
async fn review_for_missing_business_is_404_before_duplicate_check() -> anyhow::Result<()> {
    let app = build_app();
    let (status, body) = send(
        &app,
        "POST",
        "/reviews",
        Some(json!({"user_id": 3, "business_id": 777777, "stars": 2})),
    )
    .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"Error": ERROR_NO_BUS}));

    let (status, body) = send(&app, "POST", "/reviews", Some(json!({"user_id": 3, "stars": 2}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"Error": ERROR_MISSING}));
    Ok(())
}

#[tokio::test]
async fn review_read_update_delete() -> anyhow::Result<()> {
    let app = build_app();
    let bid = create_business(&app, 7).await?;
    let (_, created) = send(
        &app,
        "POST",
        "/reviews",
        Some(json!({"user_id": 3, "business_id": bid, "stars": 3, "review_text": "fine"})),
    )
    .await?;
    let rid = created["id"].as_i64().unwrap();

    let (status, got) = send(&app, "GET", &format!("/reviews/{rid}"), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(got["review_text"], "fine");

    let (status, body) = send(&app, "PUT", &format!("/reviews/{rid}"), Some(json!({"review_text": "x"}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"Error": ERROR_MISSING}));

    let (status, updated) = send(&app, "PUT", &format!("/reviews/{rid}"), Some(json!({"stars": 1}))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["id"], json!(rid));
    assert_eq!(updated["stars"], json!(1));
    assert_eq!(updated["review_text"], "fine");
    assert_eq!(updated["business_id"], json!(bid));

    let (status, updated) = send(
        &app,
        "PUT",
        &format!("/reviews/{rid}"),
        Some(json!({"stars": 2, "review_text": "better"})),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["review_text"], "better");

    let (status, _) = send(&app, "DELETE", &format!("/reviews/{rid}"), None).await?;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, body) = send(&app, "DELETE", &format!("/reviews/{rid}"), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"Error": ERROR_NO_REVIEW}));

    let (status, body) = send(&app, "PUT", &format!("/reviews/{rid}"), Some(json!({"stars": 5}))).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"Error": ERROR_NO_REVIEW}));
    Ok(())
}

struct FailingStore;

#[async_trait]
impl DocumentStore for FailingStore {
    async fn get(&self, _key: &Key) -> Result<Option<Entity>, ServiceError> {
        Err(ServiceError::Store("backend unavailable".into()))
    }
    async fn put(&self, _entity: &Entity) -> Result<Key, ServiceError> {
        Err(ServiceError::Store("backend unavailable".into()))
    }
    async fn delete(&self, _key: &Key) -> Result<bool, ServiceError> {
        Err(ServiceError::Store("backend unavailable".into()))
    }
    async fn delete_multi(&self, _keys: &[Key]) -> Result<usize, ServiceError> {
        Err(ServiceError::Store("backend unavailable".into()))
    }
    async fn query(&self, _query: &Query) -> Result<Vec<Entity>, ServiceError> {
        Err(ServiceError::Store("backend unavailable".into()))
    }
}

#[tokio::test]
async fn store_failure_is_500_without_details() -> anyhow::Result<()> {
    let app = server::startup::app(Arc::new(FailingStore));
    let (status, body) = send(&app, "GET", "/businesses", None).await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"Error": "Internal server error"}));

    let (status, _) = send(&app, "POST", "/businesses", Some(cafe(1))).await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    Ok(())
}

/// Counts `get` calls and forwards everything to a `MemoryStore`.
#[derive(Default)]
struct CountingStore {
    inner: MemoryStore,
    gets: AtomicUsize,
}

#[async_trait]
impl DocumentStore for CountingStore {
    async fn get(&self, key: &Key) -> Result<Option<Entity>, ServiceError> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.inner.get(key).await
    }
    async fn put(&self, entity: &Entity) -> Result<Key, ServiceError> {
        self.inner.put(entity).await
    }
    async fn delete(&self, key: &Key) -> Result<bool, ServiceError> {
        self.inner.delete(key).await
    }
    async fn delete_multi(&self, keys: &[Key]) -> Result<usize, ServiceError> {
        self.inner.delete_multi(keys).await
    }
    async fn query(&self, query: &Query) -> Result<Vec<Entity>, ServiceError> {
        self.inner.query(query).await
    }
}

#[tokio::test]
async fn put_reads_the_record_once() -> anyhow::Result<()> {
    let store = Arc::new(CountingStore::default());
    let app = server::startup::app(store.clone());
    let business_id = create_business(&app, 7).await?;
    let review_id = create_review(&app, 3, business_id).await?;

    let before = store.gets.load(Ordering::SeqCst);
    let mut renamed = cafe(7);
    renamed["name"] = json!("Cafe Two");
    let (status, body) = send(&app, "PUT", &format!("/businesses/{business_id}"), Some(renamed)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], json!("Cafe Two"));
    assert_eq!(store.gets.load(Ordering::SeqCst) - before, 1);

    let before = store.gets.load(Ordering::SeqCst);
    let (status, body) = send(&app, "PUT", &format!("/reviews/{review_id}"), Some(json!({"stars": 1}))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stars"], json!(1));
    assert_eq!(store.gets.load(Ordering::SeqCst) - before, 1);
    Ok(())
}

#[tokio::test]
async fn metrics_and_openapi_exposed() -> anyhow::Result<()> {
    let app = build_app();
    send(&app, "GET", "/businesses", None).await?;

    let req = Request::builder().uri("/metrics").body(Body::empty())?;
    let resp = app.clone().call(req).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
    let text = String::from_utf8(bytes.to_vec())?;
    assert!(text.contains("review_api_http_requests_total"));
    assert!(text.contains("review_api_reviews_created_total"));

    let (status, doc) = send(&app, "GET", "/api-docs/openapi.json", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/reviews"].is_object());
    Ok(())
}
