//! LLM Client — the single point of entry for all model calls.
//!
//! ARCHITECTURAL RULE: no other module may call the completion endpoint
//! directly. All model interactions go through this client, and the client
//! never touches JSON handling: recovering an object from noisy completion
//! text is the sanitizer's job, so the sanitizer stays unit-testable without
//! network access.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod prompts;
pub mod sanitize;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
/// The model used for all completion calls.
/// Intentionally hardcoded to prevent accidental drift.
pub const MODEL: &str = "claude-sonnet-4-5";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("model call exceeded its {budget:?} budget")]
    Timeout { budget: Duration },

    #[error("model endpoint returned status {status}")]
    Upstream { status: u16, body: String },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("model returned no text content")]
    EmptyContent,
}

/// Per-call options. Each pipeline task has its own preset; the timeout is
/// the dominant latency budget and is enforced by cancelling the in-flight
/// request at the boundary.
#[derive(Debug, Clone, Copy)]
pub struct CallOptions {
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl CallOptions {
    pub fn parse_resume() -> Self {
        Self {
            temperature: 0.15,
            max_tokens: 4096,
            timeout: Duration::from_secs(120),
        }
    }

    pub fn extract_job() -> Self {
        Self {
            temperature: 0.0,
            max_tokens: 2048,
            timeout: Duration::from_secs(60),
        }
    }

    pub fn tailor() -> Self {
        Self {
            temperature: 0.2,
            max_tokens: 4096,
            timeout: Duration::from_secs(120),
        }
    }

    pub fn tailor_with_changes() -> Self {
        Self {
            temperature: 0.15,
            max_tokens: 4096,
            timeout: Duration::from_secs(120),
        }
    }
}

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    content: Vec<ContentBlock>,
    usage: Usage,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    input_tokens: u32,
    output_tokens: u32,
}

/// The completion-endpoint client. Deliberately retry-free: a non-success
/// response surfaces immediately with its body, and retry policy stays with
/// the caller.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
}

impl LlmClient {
    pub fn new(api_key: String) -> Self {
        // No client-wide timeout: each call carries its own budget.
        Self {
            client: Client::new(),
            api_key,
        }
    }

    /// Sends one system+user prompt pair and returns the first text block of
    /// the completion verbatim. Dropping past the timeout aborts the
    /// underlying request, so a hung upstream cannot hold resources.
    pub async fn complete(
        &self,
        system: &str,
        user: &str,
        options: &CallOptions,
    ) -> Result<String, LlmError> {
        let request_body = AnthropicRequest {
            model: MODEL,
            max_tokens: options.max_tokens,
            temperature: options.temperature,
            system,
            messages: vec![AnthropicMessage {
                role: "user",
                content: user,
            }],
        };

        let call = async {
            let response = self
                .client
                .post(ANTHROPIC_API_URL)
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .header("content-type", "application/json")
                .json(&request_body)
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(LlmError::Upstream {
                    status: status.as_u16(),
                    body,
                });
            }

            let completion: CompletionResponse = response.json().await?;

            debug!(
                "model call succeeded: input_tokens={}, output_tokens={}",
                completion.usage.input_tokens, completion.usage.output_tokens
            );

            completion
                .content
                .into_iter()
                .find(|block| block.block_type == "text")
                .and_then(|block| block.text)
                .ok_or(LlmError::EmptyContent)
        };

        match tokio::time::timeout(options.timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(LlmError::Timeout {
                budget: options.timeout,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_response_text_extraction() {
        let json = r#"{
            "content": [
                {"type": "thinking", "text": null},
                {"type": "text", "text": "{\"ok\": true}"}
            ],
            "usage": {"input_tokens": 10, "output_tokens": 5}
        }"#;
        let response: CompletionResponse = serde_json::from_str(json).unwrap();
        let text = response
            .content
            .into_iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text);
        assert_eq!(text.as_deref(), Some("{\"ok\": true}"));
    }

    #[test]
    fn test_call_options_budgets() {
        assert_eq!(CallOptions::parse_resume().timeout, Duration::from_secs(120));
        assert_eq!(CallOptions::extract_job().timeout, Duration::from_secs(60));
        assert!(CallOptions::extract_job().temperature < f32::EPSILON);
    }
}
