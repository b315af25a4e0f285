use axum::extract::State;
use axum::Json;

use crate::api::dto::{HealthData, OcrStatus, RefinementStatus};
use crate::api::state::AppState;

/// `GET /api/health`
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "health",
    responses(
        (status = 200, description = "Service health status", body = HealthData),
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthData> {
    let recognizer = state.pipeline.recognizer();
    let ocr = OcrStatus {
        status: if recognizer.is_available() {
            "ok".to_string()
        } else {
            "unavailable".to_string()
        },
        backend: recognizer.backend_name().to_string(),
    };

    let refiner = state.pipeline.refiner();
    let refinement = RefinementStatus {
        status: if refiner.is_enabled() {
            "enabled".to_string()
        } else {
            "disabled".to_string()
        },
        model: refiner.model().map(str::to_string),
    };

    // Without OCR, extraction still answers 200 with a warning.
    let status = if recognizer.is_available() {
        "ok"
    } else {
        "degraded"
    };

    Json(HealthData {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        ocr,
        refinement,
    })
}
