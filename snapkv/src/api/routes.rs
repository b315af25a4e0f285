use std::any::Any;

use axum::{
    extract::DefaultBodyLimit,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers;
use super::openapi::openapi_json;
use super::AppState;
use crate::error::SnapError;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods(AnyOrigin)
        .allow_headers(AnyOrigin);

    let body_limit = state.config.server.max_upload_bytes;

    let api = Router::new()
        .route("/extract", post(handlers::extract))
        .route("/health", get(handlers::health_check))
        .route("/openapi.json", get(openapi_json));

    Router::new()
        .nest("/api", api)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Render a handler panic as an ordinary processing failure.
fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let details = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    SnapError::Internal(details).into_response()
}
