//! HTTP client for the `/chat/completions` endpoint.
//!
//! Wraps the OpenAI-compatible chat-completion API using [`reqwest`].
//! Only non-streaming completions are used.

use std::time::{Duration, Instant};

use inmo_core::avatar::ChatTurn;
use serde::{Deserialize, Serialize};

use crate::config::LlmConfig;

/// Errors from the LLM client.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// No API key is configured.
    #[error("LLM endpoint is not configured")]
    NotConfigured,

    /// The HTTP request itself failed (network, DNS, TLS, timeout, decoding).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The endpoint returned a non-2xx status code.
    #[error("LLM API error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The endpoint answered 2xx but without any usable message.
    #[error("LLM API returned no completion")]
    EmptyCompletion,
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Chat-completion client. Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct LlmClient {
    client: reqwest::Client,
    config: LlmConfig,
}

impl std::fmt::Debug for LlmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmClient")
            .field("api_url", &self.config.api_url)
            .field("model", &self.config.model)
            .field("configured", &self.is_configured())
            .finish()
    }
}

impl LlmClient {
    /// Build a client with the configured request timeout.
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    /// Whether an API key is available.
    pub fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }

    /// Model name sent with every request.
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Send `turns` and return the assistant's reply, trimmed.
    pub async fn complete(&self, turns: &[ChatTurn]) -> Result<String, LlmError> {
        let api_key = self.config.api_key.as_deref().ok_or(LlmError::NotConfigured)?;

        let body = build_request(&self.config, turns);
        let url = format!("{}/chat/completions", self.config.api_url.trim_end_matches('/'));
        let started = Instant::now();

        let response = self
            .client
            .post(url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "Chat completion request failed"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            tracing::warn!(
                status = status.as_u16(),
                model = %self.config.model,
                body = %body,
                "Chat completion API returned an error",
            );
            return Err(LlmError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        let parsed = response.json::<CompletionResponse>().await?;
        tracing::debug!(
            model = %self.config.model,
            turns = turns.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Chat completion received",
        );
        extract_reply(parsed)
    }
}

fn build_request<'a>(config: &'a LlmConfig, turns: &'a [ChatTurn]) -> CompletionRequest<'a> {
    CompletionRequest {
        model: &config.model,
        messages: turns
            .iter()
            .map(|t| WireMessage {
                role: t.role.as_str(),
                content: &t.content,
            })
            .collect(),
        temperature: config.temperature,
        max_tokens: config.max_tokens,
    }
}

fn extract_reply(response: CompletionResponse) -> Result<String, LlmError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or(LlmError::EmptyCompletion)
}
