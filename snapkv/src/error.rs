use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SnapError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Image decode error: {0}")]
    Decode(String),

    #[error("OCR error: {0}")]
    Ocr(String),

    #[error("OCR unavailable: {0}")]
    OcrUnavailable(String),

    #[error("Refinement error: {0}")]
    Refinement(String),

    #[error("Refinement disabled: {0}")]
    RefinementDisabled(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl SnapError {
    pub fn status(&self) -> StatusCode {
        match self {
            SnapError::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to API callers. Validation problems are reported verbatim,
    /// everything else is a processing failure.
    pub fn public_message(&self) -> String {
        match self {
            SnapError::Validation(msg) => msg.clone(),
            SnapError::Decode(msg)
            | SnapError::Ocr(msg)
            | SnapError::OcrUnavailable(msg)
            | SnapError::Refinement(msg)
            | SnapError::RefinementDisabled(msg)
            | SnapError::Internal(msg) => format!("Processing failed: {msg}"),
        }
    }
}

impl IntoResponse for SnapError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = Json(json!({
            "error": self.public_message(),
            "code": status.as_u16()
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, SnapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_bad_request_with_raw_message() {
        let err = SnapError::Validation("File must be an image".to_string());
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.public_message(), "File must be an image");
    }

    #[test]
    fn decode_maps_to_processing_failure() {
        let err = SnapError::Decode("unsupported format".to_string());
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            err.public_message(),
            "Processing failed: unsupported format"
        );
    }

    #[test]
    fn every_non_validation_error_is_a_processing_failure() {
        let errors = [
            SnapError::Ocr("engine crashed".to_string()),
            SnapError::OcrUnavailable("engine crashed".to_string()),
            SnapError::Refinement("engine crashed".to_string()),
            SnapError::RefinementDisabled("engine crashed".to_string()),
            SnapError::Internal("engine crashed".to_string()),
        ];
        for err in errors {
            assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(err.public_message(), "Processing failed: engine crashed");
        }
    }

    #[tokio::test]
    async fn into_response_renders_error_body() {
        let response = SnapError::Validation("Empty file uploaded".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Empty file uploaded");
        assert_eq!(body["code"], 400);
    }
}
