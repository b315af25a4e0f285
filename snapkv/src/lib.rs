//! Screenshot to key-value pairs.
//!
//! An uploaded image is normalized ([`ocr::preprocess_image`]), read by a
//! [`ocr::TextRecognizer`], split into pairs by [`extract::KeyValueExtractor`]
//! and optionally passed through [`refine::RefinementProvider`]. The
//! [`pipeline::ExtractionPipeline`] ties the stages together and [`api`]
//! serves it over HTTP.

pub mod api;
pub mod config;
pub mod error;
pub mod extract;
pub mod models;
pub mod ocr;
pub mod pipeline;
pub mod refine;
