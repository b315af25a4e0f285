use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::RefinementConfig;
use crate::error::{Result, SnapError};

/// Minimal chat-completion client. One attempt per call, no retries.
#[derive(Clone, Debug)]
pub struct RefinementClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    #[serde(default)]
    content: Option<String>,
}

impl RefinementClient {
    pub fn new(config: &RefinementConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(SnapError::RefinementDisabled(
                "API key required for refinement".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SnapError::Refinement(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// Send `prompt` as a single user message and return the first choice's content.
    pub async fn complete(&self, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.temperature,
        };

        let resp = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| SnapError::Refinement(format!("API request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SnapError::Refinement(format!(
                "API call failed with status {}: {body}",
                status.as_u16()
            )));
        }

        let chat_response: ChatResponse = resp
            .json()
            .await
            .map_err(|e| SnapError::Refinement(format!("Failed to parse response: {e}")))?;

        let choice = chat_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| SnapError::Refinement("API response missing choices".to_string()))?;

        Ok(choice.message.content.unwrap_or_default())
    }
}
