//! Wire types for the HTTP API.

use serde::{Deserialize, Serialize};

use crate::models::KvPair;
use crate::pipeline::ExtractionReport;

/// One extracted pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct KeyValueDto {
    pub key: String,
    pub value: String,
}

impl From<KvPair> for KeyValueDto {
    fn from(pair: KvPair) -> Self {
        Self {
            key: pair.key,
            value: pair.value,
        }
    }
}

/// Successful extraction.
///
/// `warning` is present, with empty `text` and `key_values`, when no text
/// could be read from the image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ExtractResponse {
    pub text: String,
    pub key_values: Vec<KeyValueDto>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl From<ExtractionReport> for ExtractResponse {
    fn from(report: ExtractionReport) -> Self {
        Self {
            text: report.text,
            key_values: report.pairs.into_iter().map(KeyValueDto::from).collect(),
            warning: report.warning,
        }
    }
}

/// Body of every non-success response.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ErrorBody {
    pub error: String,
    pub code: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthData {
    pub status: String,
    pub version: String,
    pub ocr: OcrStatus,
    pub refinement: RefinementStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct OcrStatus {
    pub status: String,
    pub backend: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct RefinementStatus {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}
