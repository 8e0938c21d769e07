use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(serde::Serialize, ToSchema)]
pub struct ErrorDoc {
    #[serde(rename = "Error")]
    pub error: String,
}

#[derive(ToSchema)]
pub struct BusinessInputDoc {
    pub owner_id: i64,
    pub name: String,
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
}

#[derive(ToSchema)]
pub struct BusinessDoc {
    pub id: i64,
    pub owner_id: i64,
    pub name: String,
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
}

#[derive(ToSchema)]
pub struct ReviewInputDoc {
    pub user_id: i64,
    pub business_id: i64,
    pub stars: i64,
    pub review_text: Option<String>,
}

#[derive(ToSchema)]
pub struct ReviewUpdateDoc {
    pub stars: i64,
    pub review_text: Option<String>,
}

#[derive(ToSchema)]
pub struct ReviewDoc {
    pub id: i64,
    pub user_id: i64,
    pub business_id: i64,
    pub stars: i64,
    pub review_text: Option<String>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::businesses::post_business,
        crate::routes::businesses::list_businesses,
        crate::routes::businesses::list_owner_businesses,
        crate::routes::businesses::get_business,
        crate::routes::businesses::put_business,
        crate::routes::businesses::delete_business,
        crate::routes::reviews::post_review,
        crate::routes::reviews::get_review,
        crate::routes::reviews::list_user_reviews,
        crate::routes::reviews::put_review,
        crate::routes::reviews::delete_review,
    ),
    components(
        schemas(
            HealthResponse,
            ErrorDoc,
            BusinessInputDoc,
            BusinessDoc,
            ReviewInputDoc,
            ReviewUpdateDoc,
            ReviewDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "businesses"),
        (name = "reviews")
    )
)]
pub struct ApiDoc;
