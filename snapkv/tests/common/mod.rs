// Common test utilities for integration tests
#![allow(dead_code)]

use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};

use async_trait::async_trait;
use image::{ImageFormat, Rgb, RgbImage};

use snapkv::config::{Config, OcrConfig, ServerConfig};
use snapkv::error::{Result, SnapError};
use snapkv::extract::KeyValueExtractor;
use snapkv::models::{NormalizedImage, RawText};
use snapkv::ocr::TextRecognizer;
use snapkv::pipeline::ExtractionPipeline;
use snapkv::refine::RefinementProvider;

static INIT: Once = Once::new();

/// Initialize tracing subscriber once for tests
pub fn init_test_logger() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}

pub const BOUNDARY: &str = "snapkv-test-boundary";

/// A small light-gray PNG.
pub fn png_bytes() -> Vec<u8> {
    let mut bytes = Vec::new();
    RgbImage::from_pixel(16, 12, Rgb([230, 230, 230]))
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .expect("encode test png");
    bytes
}

/// A single-part `multipart/form-data` body.
pub fn multipart_body(
    field: &str,
    file_name: &str,
    content_type: Option<&str>,
    data: &[u8],
) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n")
            .as_bytes(),
    );
    if let Some(content_type) = content_type {
        body.extend_from_slice(format!("Content-Type: {content_type}\r\n").as_bytes());
    }
    body.extend_from_slice(b"\r\n");
    body.extend_from_slice(data);
    body.extend_from_slice(b"\r\n");
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={BOUNDARY}")
}

pub fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            max_upload_bytes: 1024 * 1024,
        },
        ocr: OcrConfig::default(),
        refinement: None,
    }
}

/// Recognizer returning fixed text and counting its invocations.
pub struct FakeRecognizer {
    text: String,
    calls: AtomicUsize,
}

impl FakeRecognizer {
    pub fn new(text: &str) -> Arc<Self> {
        Arc::new(Self {
            text: text.to_string(),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextRecognizer for FakeRecognizer {
    async fn recognize(&self, _image: &NormalizedImage) -> Result<RawText> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(RawText::new(self.text.clone()))
    }

    fn backend_name(&self) -> &str {
        "fake"
    }
}

/// Recognizer that always fails.
pub struct FailingRecognizer;

#[async_trait]
impl TextRecognizer for FailingRecognizer {
    async fn recognize(&self, _image: &NormalizedImage) -> Result<RawText> {
        Err(SnapError::OcrUnavailable("engine not installed".to_string()))
    }

    fn is_available(&self) -> bool {
        false
    }

    fn backend_name(&self) -> &str {
        "failing"
    }
}

/// Recognizer that panics mid-request.
pub struct PanickingRecognizer;

#[async_trait]
impl TextRecognizer for PanickingRecognizer {
    async fn recognize(&self, _image: &NormalizedImage) -> Result<RawText> {
        panic!("recognizer exploded");
    }

    fn backend_name(&self) -> &str {
        "panicking"
    }
}

pub fn pipeline_with(
    recognizer: Arc<dyn TextRecognizer>,
    refiner: RefinementProvider,
) -> ExtractionPipeline {
    ExtractionPipeline::new(recognizer, KeyValueExtractor::default(), refiner)
}
