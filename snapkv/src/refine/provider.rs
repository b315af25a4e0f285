use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::RefinementConfig;
use crate::error::{Result, SnapError};
use crate::models::KvPair;

use super::api::RefinementClient;
use super::prompts::refinement_prompt;

const PREVIEW_CHARS: usize = 100;

#[derive(Debug, Clone)]
pub enum RefinementBackend {
    Remote { client: RefinementClient },
    Disabled { reason: String },
}

/// Advisory cleanup of extracted pairs through a remote chat model.
///
/// Refinement never changes the pipeline outcome: every path, including a
/// successful call, hands back the pairs it was given. The remote reply is
/// only logged.
#[derive(Debug, Clone)]
pub struct RefinementProvider {
    backend: RefinementBackend,
    timeout_secs: u64,
}

impl RefinementProvider {
    pub fn new(config: Option<&RefinementConfig>) -> Self {
        let Some(config) = config else {
            return Self::disabled("No refinement API key configured");
        };

        match RefinementClient::new(config) {
            Ok(client) => {
                info!(model = client.model(), "Pair refinement enabled");
                Self {
                    backend: RefinementBackend::Remote { client },
                    timeout_secs: config.timeout_secs,
                }
            }
            Err(e) => {
                warn!(error = %e, "Pair refinement disabled");
                Self::disabled(&e.to_string())
            }
        }
    }

    pub fn disabled(reason: &str) -> Self {
        Self {
            backend: RefinementBackend::Disabled {
                reason: reason.to_string(),
            },
            timeout_secs: 0,
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self.backend, RefinementBackend::Remote { .. })
    }

    pub fn backend(&self) -> &RefinementBackend {
        &self.backend
    }

    pub fn model(&self) -> Option<&str> {
        match &self.backend {
            RefinementBackend::Remote { client } => Some(client.model()),
            RefinementBackend::Disabled { .. } => None,
        }
    }

    /// Make the remote call and return its raw reply.
    ///
    /// `Ok(None)` means no call was made: refinement is disabled or there is
    /// nothing to refine.
    pub async fn try_refine(&self, pairs: &[KvPair]) -> Result<Option<String>> {
        let client = match &self.backend {
            RefinementBackend::Remote { client } => client,
            RefinementBackend::Disabled { reason } => {
                debug!(reason = %reason, "Skipping refinement");
                return Ok(None);
            }
        };

        if pairs.is_empty() {
            return Ok(None);
        }

        let prompt = refinement_prompt(pairs);
        let timeout = Duration::from_secs(self.timeout_secs);

        match tokio::time::timeout(timeout, client.complete(&prompt)).await {
            Ok(reply) => reply.map(Some),
            Err(_) => Err(SnapError::Refinement(format!(
                "Refinement timed out after {} seconds",
                self.timeout_secs
            ))),
        }
    }

    /// Run refinement and return `pairs` unchanged whatever the outcome.
    pub async fn refine(&self, pairs: Vec<KvPair>) -> Vec<KvPair> {
        match self.try_refine(&pairs).await {
            Ok(Some(content)) => {
                let preview: String = content.chars().take(PREVIEW_CHARS).collect();
                info!(pairs = pairs.len(), preview = %preview, "Refinement successful");
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Refinement failed, keeping extracted pairs"),
        }
        pairs
    }
}
