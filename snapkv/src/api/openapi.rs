use axum::Json;
use utoipa::OpenApi;

use super::dto;
use super::handlers;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "snapkv API",
        description = "Screenshot text recognition and key-value extraction.",
    ),
    paths(handlers::extract::extract, handlers::health::health_check),
    components(schemas(
        dto::ExtractResponse,
        dto::KeyValueDto,
        dto::ErrorBody,
        dto::HealthData,
        dto::OcrStatus,
        dto::RefinementStatus,
    )),
    tags(
        (name = "extract", description = "Image to key-value extraction"),
        (name = "health", description = "Service health"),
    )
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
