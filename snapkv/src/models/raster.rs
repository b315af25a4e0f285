use std::io::Cursor;

use image::{GrayImage, ImageFormat};

use crate::error::{Result, SnapError};

/// An uploaded image as received: undecoded bytes plus the declared MIME type.
#[derive(Debug, Clone)]
pub struct RawImage {
    bytes: Vec<u8>,
    content_type: Option<String>,
}

impl RawImage {
    pub fn new(bytes: impl Into<Vec<u8>>, content_type: Option<String>) -> Self {
        Self {
            bytes: bytes.into(),
            content_type,
        }
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Reject uploads that must never reach the pipeline.
    ///
    /// The declared type is checked before the payload, so an empty
    /// non-image upload reports the type problem.
    pub fn validate(&self) -> Result<()> {
        let is_image = self
            .content_type
            .as_deref()
            .map(|ct| ct.trim().to_ascii_lowercase().starts_with("image/"))
            .unwrap_or(false);

        if !is_image {
            return Err(SnapError::Validation("File must be an image".to_string()));
        }

        if self.bytes.is_empty() {
            return Err(SnapError::Validation("Empty file uploaded".to_string()));
        }

        Ok(())
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Grayscale, orientation-corrected, contrast-stretched and sharpened pixels.
#[derive(Debug, Clone)]
pub struct NormalizedImage {
    pixels: GrayImage,
}

impl NormalizedImage {
    pub(crate) fn new(pixels: GrayImage) -> Self {
        Self { pixels }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &GrayImage {
        &self.pixels
    }

    /// Encode as PNG for engines that take encoded images.
    pub fn to_png(&self) -> Result<Vec<u8>> {
        let mut output = Vec::new();
        self.pixels
            .write_to(&mut Cursor::new(&mut output), ImageFormat::Png)
            .map_err(|e| SnapError::Ocr(format!("Failed to encode image: {e}")))?;
        Ok(output)
    }
}
