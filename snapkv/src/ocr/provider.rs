use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use leptess::LepTess;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::config::{parse_ocr_provider_model, OcrConfig};
use crate::error::{Result, SnapError};
use crate::models::{NormalizedImage, RawText};

use super::api::VisionOcrClient;

/// Anything that can turn a normalized image into text.
#[async_trait]
pub trait TextRecognizer: Send + Sync {
    async fn recognize(&self, image: &NormalizedImage) -> Result<RawText>;

    fn is_available(&self) -> bool {
        true
    }

    /// Short backend label for health reporting.
    fn backend_name(&self) -> &str;
}

enum OcrBackend {
    Local { tesseract: Arc<Mutex<LepTess>> },
    Api { client: VisionOcrClient },
    Unavailable { reason: String },
}

impl Clone for OcrBackend {
    fn clone(&self) -> Self {
        match self {
            OcrBackend::Local { tesseract } => OcrBackend::Local {
                tesseract: Arc::clone(tesseract),
            },
            OcrBackend::Api { client } => OcrBackend::Api {
                client: client.clone(),
            },
            OcrBackend::Unavailable { reason } => OcrBackend::Unavailable {
                reason: reason.clone(),
            },
        }
    }
}

#[derive(Clone)]
pub struct OcrProvider {
    backend: OcrBackend,
    config: OcrConfig,
}

fn create_tesseract(languages: &str) -> std::result::Result<LepTess, String> {
    LepTess::new(None, languages).map_err(|e| e.to_string())
}

impl OcrProvider {
    /// Build the backend named by `config.model`.
    ///
    /// Construction never fails: a backend that cannot start becomes
    /// `Unavailable` and every recognition reports the reason.
    pub fn new(config: &OcrConfig) -> Self {
        let (provider, _) = parse_ocr_provider_model(&config.model);

        let backend = match provider.to_lowercase().as_str() {
            "local" | "tesseract" => match create_tesseract(&config.languages) {
                Ok(lt) => {
                    info!(languages = %config.languages, "Tesseract OCR initialized");
                    OcrBackend::Local {
                        tesseract: Arc::new(Mutex::new(lt)),
                    }
                }
                Err(e) => {
                    let reason = format!("Tesseract not available: {e}");
                    warn!("{}", reason);
                    OcrBackend::Unavailable { reason }
                }
            },
            other => match VisionOcrClient::new(config) {
                Ok(client) => {
                    info!(provider = other, model = client.model(), "Vision OCR API backend initialized");
                    OcrBackend::Api { client }
                }
                Err(e) => {
                    let reason = format!("{other} OCR backend unavailable: {e}");
                    warn!("{}", reason);
                    OcrBackend::Unavailable { reason }
                }
            },
        };

        Self {
            backend,
            config: config.clone(),
        }
    }

    pub fn unavailable(reason: &str, config: &OcrConfig) -> Self {
        Self {
            backend: OcrBackend::Unavailable {
                reason: reason.to_string(),
            },
            config: config.clone(),
        }
    }

    pub fn is_available(&self) -> bool {
        !matches!(self.backend, OcrBackend::Unavailable { .. })
    }

    pub async fn ocr(&self, image: &NormalizedImage) -> Result<String> {
        let timeout_duration = Duration::from_secs(self.config.timeout_secs);

        match tokio::time::timeout(timeout_duration, self.ocr_internal(image)).await {
            Ok(inner_result) => inner_result,
            Err(_) => Err(SnapError::Ocr(format!(
                "OCR operation timed out after {} seconds",
                self.config.timeout_secs
            ))),
        }
    }

    async fn ocr_internal(&self, image: &NormalizedImage) -> Result<String> {
        match &self.backend {
            OcrBackend::Local { tesseract } => {
                let png = image.to_png()?;
                let tesseract = Arc::clone(tesseract);

                let text = tokio::task::spawn_blocking(move || {
                    let mut lt = tesseract.blocking_lock();
                    lt.set_image_from_mem(&png)
                        .map_err(|e| SnapError::Ocr(format!("Failed to set image: {e}")))?;
                    lt.get_utf8_text()
                        .map_err(|e| SnapError::Ocr(format!("Failed to extract text: {e}")))
                })
                .await
                .map_err(|e| SnapError::Ocr(format!("OCR task panicked: {e}")))??;

                Ok(text)
            }
            OcrBackend::Api { client } => client.ocr(&image.to_png()?).await,
            OcrBackend::Unavailable { reason } => Err(SnapError::OcrUnavailable(reason.clone())),
        }
    }
}

#[async_trait]
impl TextRecognizer for OcrProvider {
    async fn recognize(&self, image: &NormalizedImage) -> Result<RawText> {
        self.ocr(image).await.map(RawText::from)
    }

    fn is_available(&self) -> bool {
        OcrProvider::is_available(self)
    }

    fn backend_name(&self) -> &str {
        match &self.backend {
            OcrBackend::Local { .. } => "tesseract",
            OcrBackend::Api { .. } => "vision-api",
            OcrBackend::Unavailable { .. } => "unavailable",
        }
    }
}
