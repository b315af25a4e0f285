//! Image cleanup and text recognition.
//!
//! Uploads are first normalized by [`preprocess_image`]: EXIF orientation is
//! applied, the image is converted to grayscale, its contrast is stretched and
//! boosted, and a sharpening filter is run over it.
//!
//! Recognition sits behind the [`TextRecognizer`] trait. [`OcrProvider`] is the
//! production implementation and selects its backend from `OcrConfig::model`:
//! - `local/tesseract`: in-process Tesseract via leptess
//! - `openai/<model>`, `mistral/<model>`: an OpenAI-compatible vision endpoint
//!
//! A backend that fails to start is kept as `Unavailable` so the service still
//! boots and reports the reason on each request.

mod api;
mod preprocessing;
mod provider;

pub use api::VisionOcrClient;
pub use preprocessing::{apply_orientation, preprocess_image, read_exif_orientation};
pub use provider::{OcrProvider, TextRecognizer};
