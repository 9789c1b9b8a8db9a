use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::TextGenerator;
use crate::config::AiConfig;
use crate::error::GenerationError;
use crate::retry::{with_retry, RetryConfig};

pub const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 4096;
const OVERLOADED_STATUS: u16 = 529;
const RATE_LIMITED_STATUS: u16 = 429;

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(rename = "type")]
    kind: String,
    message: String,
}

/// Client for the Anthropic Messages API.
///
/// Transient failures (overload, rate limiting, 5xx, connection errors) are
/// retried with a fixed delay; the caller's timeout covers all attempts.
pub struct AnthropicClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    retry: RetryConfig,
}

impl AnthropicClient {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>, retry: RetryConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: base_url.into(),
            retry,
        }
    }

    pub fn from_config(api_key: impl Into<String>, ai: &AiConfig) -> Self {
        let retry = RetryConfig {
            max_attempts: ai.attempts(),
            delay: ai.retry_delay(),
        };
        Self::new(api_key, ai.base_url.clone(), retry)
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/messages", self.base_url.trim_end_matches('/'))
    }

    async fn send_once(&self, prompt: &str, model: &str) -> Result<String, GenerationError> {
        let request = MessagesRequest {
            model,
            max_tokens: MAX_TOKENS,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .http
            .post(self.endpoint())
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_failure(status.as_u16(), &body));
        }

        let parsed: MessagesResponse = response.json().await?;
        let text = parsed
            .content
            .into_iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text)
            .collect::<Vec<_>>()
            .join("");

        if text.trim().is_empty() {
            return Err(GenerationError::EmptyResponse);
        }
        Ok(text)
    }
}

fn classify_failure(status: u16, body: &str) -> GenerationError {
    let envelope = serde_json::from_str::<ErrorEnvelope>(body).ok();

    if status == OVERLOADED_STATUS
        || envelope
            .as_ref()
            .is_some_and(|e| e.error.kind == "overloaded_error")
    {
        return GenerationError::Overloaded { status };
    }
    if status == RATE_LIMITED_STATUS {
        return GenerationError::RateLimited;
    }

    let message = match envelope {
        Some(e) => e.error.message,
        None => body.trim().to_string(),
    };
    GenerationError::Api { status, message }
}

#[async_trait]
impl TextGenerator for AnthropicClient {
    async fn generate(
        &self,
        prompt: &str,
        model: &str,
        timeout: Duration,
    ) -> Result<String, GenerationError> {
        tracing::debug!("Requesting completion from {} ({} chars)", model, prompt.len());

        let attempts = with_retry("text generation", &self.retry, || {
            self.send_once(prompt, model)
        });
        match tokio::time::timeout(timeout, attempts).await {
            Ok(result) => result,
            Err(_) => Err(GenerationError::Timeout {
                secs: timeout.as_secs(),
            }),
        }
    }
}
