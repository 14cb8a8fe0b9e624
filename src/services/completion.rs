//! Client for the remote completion provider.
//!
//! Speaks the Anthropic-style `/messages` API. Every failure mode collapses
//! into [`AppError::Generation`]; the detail is logged here and never
//! returned to the caller.

use anyhow::{anyhow, bail, Context};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::core::config::{ProviderConfig, MAX_OUTPUT_TOKENS};
use crate::core::error::{AppError, Result};
use crate::core::logging::get_request_id;
use crate::services::prompt::Prompt;

/// Longest provider error body kept in logs.
const MAX_LOGGED_BODY_CHARS: usize = 500;

/// One conversation turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: String,
    pub content: String,
}

/// Request body sent to the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub model: String,
    pub max_tokens: u32,
    pub messages: Vec<Turn>,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Clone)]
pub struct CompletionClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    timeout: Duration,
}

impl CompletionClient {
    pub fn new(config: &ProviderConfig, http: reqwest::Client) -> Self {
        Self {
            http,
            endpoint: format!("{}/messages", config.base_url.trim_end_matches('/')),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Build the provider request: an optional leading system turn, then
    /// the user turn.
    pub fn build_request(&self, user_prompt: &str, system_prompt: Option<&str>) -> CompletionRequest {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = system_prompt.filter(|s| !s.is_empty()) {
            messages.push(Turn {
                role: "system".to_string(),
                content: system.to_string(),
            });
        }
        messages.push(Turn {
            role: "user".to_string(),
            content: user_prompt.to_string(),
        });

        CompletionRequest {
            model: self.model.clone(),
            max_tokens: MAX_OUTPUT_TOKENS,
            messages,
        }
    }

    /// Generate text for a built prompt.
    pub async fn complete(&self, prompt: &Prompt) -> Result<String> {
        self.generate(&prompt.user_prompt, prompt.system_prompt.as_deref())
            .await
    }

    /// Send one completion and return the generated text.
    ///
    /// # Errors
    ///
    /// `AppError::Generation` on transport failure, timeout, non-2xx status,
    /// an unparseable body, or a response without text content.
    #[tracing::instrument(skip_all, fields(model = %self.model))]
    pub async fn generate(&self, user_prompt: &str, system_prompt: Option<&str>) -> Result<String> {
        let request = self.build_request(user_prompt, system_prompt);

        let outcome = tokio::time::timeout(self.timeout, self.send(&request)).await;

        match outcome {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(e)) => {
                tracing::error!(
                    request_id = %get_request_id(),
                    url = %self.endpoint,
                    error = %format!("{:#}", e),
                    "Completion provider request failed"
                );
                Err(AppError::Generation)
            }
            Err(_) => {
                tracing::error!(
                    request_id = %get_request_id(),
                    url = %self.endpoint,
                    timeout_secs = self.timeout.as_secs_f64(),
                    "Completion provider request timed out"
                );
                Err(AppError::Generation)
            }
        }
    }

    async fn send(&self, request: &CompletionRequest) -> anyhow::Result<String> {
        let response = self
            .http
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .context("HTTP request to provider failed")?;

        let status = response.status();
        tracing::debug!(
            request_id = %get_request_id(),
            status = %status,
            "Completion provider responded"
        );

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let body: String = body.chars().take(MAX_LOGGED_BODY_CHARS).collect();
            bail!("provider returned HTTP {}: {}", status, body);
        }

        let parsed: CompletionResponse = response
            .json()
            .await
            .context("provider returned an unparseable body")?;

        extract_text(parsed)
    }
}

/// Text of the first content block. Any other shape is a failure.
fn extract_text(response: CompletionResponse) -> anyhow::Result<String> {
    response
        .content
        .into_iter()
        .next()
        .and_then(|block| block.text)
        .ok_or_else(|| anyhow!("provider response has no text in its first content block"))
}
