use axum::extract::{Multipart, State};
use axum::Json;

use crate::api::dto::{ErrorBody, ExtractResponse};
use crate::api::state::AppState;
use crate::error::{Result, SnapError};
use crate::models::RawImage;

/// `POST /api/extract`
///
/// Accepts a multipart form with a single image in the `file` field and
/// returns the recognized text plus the key-value pairs found in it.
#[utoipa::path(
    post,
    path = "/api/extract",
    tag = "extract",
    operation_id = "extract",
    request_body(content_type = "multipart/form-data", content = String, description = "Image upload in the `file` field"),
    responses(
        (status = 200, description = "Text and key-value pairs", body = ExtractResponse),
        (status = 400, description = "Missing, non-image or empty upload", body = ErrorBody),
        (status = 500, description = "Processing failed", body = ErrorBody),
    )
)]
pub async fn extract(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ExtractResponse>> {
    let mut upload: Option<RawImage> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| SnapError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| SnapError::Validation(format!("Failed to read file: {e}")))?;

        tracing::debug!(
            file_name = file_name.as_deref().unwrap_or("<unnamed>"),
            content_type = content_type.as_deref().unwrap_or("<none>"),
            bytes = bytes.len(),
            "Received upload"
        );

        upload = Some(RawImage::new(bytes.to_vec(), content_type));
        break;
    }

    let upload = upload
        .ok_or_else(|| SnapError::Validation("Missing required 'file' field".to_string()))?;

    let report = state.pipeline.run(upload).await?;
    Ok(Json(report.into()))
}
