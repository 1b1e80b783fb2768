//! Anthropic backend — non-streaming Messages API client.
//!
//! One request per completion: the full transcript goes out, one finished
//! reply comes back. The reply text is the concatenation of the response's
//! `text` content blocks (in practice a single block).

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use mirage_core::ChatMessage;

use crate::backend::{BackendError, BackendResult, ModelBackend};

/// Default base URL for the Anthropic API.
const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";

/// API version header value.
const API_VERSION: &str = "2023-06-01";

/// Configuration for the Anthropic backend.
#[derive(Clone, Debug)]
pub struct AnthropicConfig {
    /// Model ID (e.g., `"claude-haiku-4-5-20251001"`).
    pub model: String,
    /// API key.
    pub api_key: String,
    /// Maximum output tokens per reply.
    pub max_tokens: u32,
    /// Base URL override (tests, proxies). `None` uses the public API.
    pub base_url: Option<String>,
}

/// Anthropic Messages API backend.
pub struct AnthropicBackend {
    config: AnthropicConfig,
    client: reqwest::Client,
}

/// Request body for `POST /v1/messages`.
#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: &'a [ChatMessage],
}

/// Successful response body (the fields this client consumes).
#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

/// One content block in a response.
#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    text: String,
}

/// Error response body.
#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

/// Error detail inside an error response.
#[derive(Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: String,
}

impl AnthropicBackend {
    /// Create a new backend.
    #[must_use]
    pub fn new(config: AnthropicConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// Create a new backend sharing an existing HTTP client.
    #[must_use]
    pub fn with_client(config: AnthropicConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    fn endpoint(&self) -> String {
        let base = self
            .config
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/');
        format!("{base}/v1/messages")
    }

    fn build_headers(&self) -> BackendResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        let _ = headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let _ = headers.insert("anthropic-version", HeaderValue::from_static(API_VERSION));
        let _ = headers.insert(
            "x-api-key",
            HeaderValue::from_str(&self.config.api_key).map_err(|e| BackendError::Auth {
                message: format!("invalid API key header: {e}"),
            })?,
        );
        Ok(headers)
    }

    /// Map a non-success HTTP response to a [`BackendError`].
    fn error_from_response(status: reqwest::StatusCode, body: &str) -> BackendError {
        let message = serde_json::from_str::<ApiErrorBody>(body)
            .map(|b| b.error.message)
            .unwrap_or_else(|_| body.chars().take(200).collect());

        match status.as_u16() {
            401 | 403 => BackendError::Auth { message },
            429 => BackendError::RateLimited { message },
            code => BackendError::Api {
                status: code,
                message,
                retryable: status.is_server_error(),
            },
        }
    }
}

#[async_trait]
impl ModelBackend for AnthropicBackend {
    fn model(&self) -> &str {
        &self.config.model
    }

    #[instrument(skip_all, fields(model = %self.config.model, messages = messages.len()))]
    async fn complete(&self, messages: &[ChatMessage]) -> BackendResult<String> {
        let request = MessagesRequest {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            messages,
        };

        let response = self
            .client
            .post(self.endpoint())
            .headers(self.build_headers()?)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = Self::error_from_response(status, &body);
            warn!(status = status.as_u16(), category = err.category(), "model call failed");
            return Err(err);
        }

        let parsed: MessagesResponse = response.json().await?;
        let reply: String = parsed
            .content
            .iter()
            .filter(|b| b.block_type == "text")
            .map(|b| b.text.as_str())
            .collect();

        if reply.is_empty() {
            return Err(BackendError::EmptyReply);
        }

        debug!(reply_len = reply.len(), "model call succeeded");
        Ok(reply)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
