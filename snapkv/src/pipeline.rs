use std::sync::Arc;

use tracing::{info, warn};

use crate::config::Config;
use crate::error::{Result, SnapError};
use crate::extract::KeyValueExtractor;
use crate::models::{KvPair, RawImage, RawText};
use crate::ocr::{preprocess_image, OcrProvider, TextRecognizer};
use crate::refine::RefinementProvider;

pub const NO_TEXT_WARNING: &str = "No text could be extracted from the image";

/// Outcome of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionReport {
    pub text: String,
    pub pairs: Vec<KvPair>,
    pub warning: Option<String>,
}

impl ExtractionReport {
    fn no_text() -> Self {
        Self {
            text: String::new(),
            pairs: Vec::new(),
            warning: Some(NO_TEXT_WARNING.to_string()),
        }
    }
}

/// Upload -> preprocess -> recognize -> extract -> refine.
///
/// Holds no per-request state, so one instance serves concurrent runs.
pub struct ExtractionPipeline {
    recognizer: Arc<dyn TextRecognizer>,
    extractor: KeyValueExtractor,
    refiner: RefinementProvider,
}

impl ExtractionPipeline {
    pub fn new(
        recognizer: Arc<dyn TextRecognizer>,
        extractor: KeyValueExtractor,
        refiner: RefinementProvider,
    ) -> Self {
        Self {
            recognizer,
            extractor,
            refiner,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Arc::new(OcrProvider::new(&config.ocr)),
            KeyValueExtractor::default(),
            RefinementProvider::new(config.refinement.as_ref()),
        )
    }

    pub fn recognizer(&self) -> &dyn TextRecognizer {
        self.recognizer.as_ref()
    }

    pub fn refiner(&self) -> &RefinementProvider {
        &self.refiner
    }

    pub async fn run(&self, upload: RawImage) -> Result<ExtractionReport> {
        upload.validate()?;

        let size = upload.len();
        let bytes = upload.into_bytes();
        let normalized = tokio::task::spawn_blocking(move || preprocess_image(&bytes))
            .await
            .map_err(|e| SnapError::Internal(format!("Preprocessing task failed: {e}")))??;

        info!(
            bytes = size,
            width = normalized.width(),
            height = normalized.height(),
            "Image preprocessed"
        );

        let text = match self.recognizer.recognize(&normalized).await {
            Ok(text) => text,
            Err(e) => {
                warn!(
                    error = %e,
                    backend = self.recognizer.backend_name(),
                    "Text recognition failed, treating as empty"
                );
                RawText::empty()
            }
        };

        if text.is_blank() {
            return Ok(ExtractionReport::no_text());
        }

        let pairs = self.extractor.extract(&text);
        let pairs = self.refiner.refine(pairs).await;

        info!(
            chars = text.trimmed().chars().count(),
            pairs = pairs.len(),
            "Extraction complete"
        );

        Ok(ExtractionReport {
            text: text.trimmed().to_string(),
            pairs,
            warning: None,
        })
    }
}
