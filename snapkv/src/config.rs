use serde::Deserialize;
use std::env;

pub const DEFAULT_REFINE_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_REFINE_MODEL: &str = "llama3-8b-8192";

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

/// Timeouts in seconds; zero is rejected like any other invalid value.
fn parse_timeout_env(var: &str, default: u64) -> u64 {
    match parse_env_or(var, default) {
        0 => {
            tracing::warn!("Invalid value '0' for {}: timeout must be positive. Using default.", var);
            default
        }
        secs => secs,
    }
}

/// Reads a variable, treating an empty or whitespace-only value as unset.
fn non_empty_env(var: &str) -> Option<String> {
    env::var(var)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub ocr: OcrConfig,
    /// `None` when no refinement credential is configured.
    pub refinement: Option<RefinementConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OcrConfig {
    pub model: String,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub languages: String,
    pub timeout_secs: u64,
}

/// Remote chat-completion settings used to refine extracted pairs.
#[derive(Debug, Clone, Deserialize)]
pub struct RefinementConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
    pub temperature: f32,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            model: "local/tesseract".to_string(),
            api_key: None,
            base_url: None,
            languages: "eng".to_string(),
            timeout_secs: 60,
        }
    }
}

impl RefinementConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_REFINE_MODEL.to_string(),
            base_url: DEFAULT_REFINE_BASE_URL.to_string(),
            timeout_secs: 30,
            temperature: 0.0,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: env::var("SNAPKV_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_env_or("SNAPKV_PORT", 8000),
                max_upload_bytes: parse_env_or("SNAPKV_MAX_UPLOAD_BYTES", 20 * 1024 * 1024),
            },
            ocr: OcrConfig {
                model: env::var("OCR_MODEL").unwrap_or_else(|_| "local/tesseract".to_string()),
                api_key: non_empty_env("OCR_API_KEY"),
                base_url: non_empty_env("OCR_BASE_URL"),
                languages: env::var("OCR_LANGUAGES").unwrap_or_else(|_| "eng".to_string()),
                timeout_secs: parse_timeout_env("OCR_TIMEOUT", 60),
            },
            refinement: non_empty_env("REFINE_API_KEY")
                .or_else(|| non_empty_env("GROQ_API_KEY"))
                .map(|api_key| RefinementConfig {
                    api_key,
                    model: env::var("REFINE_MODEL")
                        .unwrap_or_else(|_| DEFAULT_REFINE_MODEL.to_string()),
                    base_url: env::var("REFINE_BASE_URL")
                        .unwrap_or_else(|_| DEFAULT_REFINE_BASE_URL.to_string()),
                    timeout_secs: parse_timeout_env("REFINE_TIMEOUT", 30),
                    temperature: 0.0,
                }),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default()
    }
}

/// Split an OCR model name into `(provider, model)`.
///
/// Names without a slash belong to the local engine.
pub fn parse_ocr_provider_model(model: &str) -> (&str, &str) {
    match model.split_once('/') {
        Some((prefix, rest)) if !prefix.is_empty() => (prefix, rest),
        _ => ("local", model),
    }
}
