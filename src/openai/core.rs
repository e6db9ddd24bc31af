//! Client for an OpenAI compatible chat completion API. The provider
//! is treated as an opaque request/response capability: the full
//! transcript goes in, one assistant message comes out.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Value, json};

use crate::error::CompletionError;
use crate::tutor::{Message, Role};

/// Fixed per-session request configuration. `max_tokens` bounds the
/// response length and `timeout` bounds the request itself so a stalled
/// provider can't hold a turn open forever.
#[derive(Clone, Debug)]
pub struct CompletionConfig {
    pub api_hostname: String,
    pub api_key: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub presence_penalty: Option<f32>,
    pub frequency_penalty: Option<f32>,
    pub timeout: Duration,
}

/// The seam between the session controller and the completion
/// provider. Implemented by `OpenAiCompletion` in production and by
/// in-memory stubs in tests.
#[async_trait]
pub trait CompletionAdapter: Send + Sync {
    async fn complete(&self, messages: &[Message]) -> Result<String, CompletionError>;
}

/// Only `role` and `content` cross the wire. Timestamps, word counts,
/// and latency stay local to the transcript.
#[derive(Serialize)]
struct WireMessage<'a> {
    role: Role,
    content: &'a str,
}

pub struct OpenAiCompletion {
    config: CompletionConfig,
    client: reqwest::Client,
}

impl OpenAiCompletion {
    pub fn new(config: CompletionConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl CompletionAdapter for OpenAiCompletion {
    async fn complete(&self, messages: &[Message]) -> Result<String, CompletionError> {
        let wire: Vec<WireMessage> = messages
            .iter()
            .map(|m| WireMessage {
                role: m.role,
                content: &m.content,
            })
            .collect();

        let mut payload = json!({
            "model": self.config.model,
            "messages": wire,
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
        });
        if let Some(presence_penalty) = self.config.presence_penalty {
            payload["presence_penalty"] = json!(presence_penalty);
        }
        if let Some(frequency_penalty) = self.config.frequency_penalty {
            payload["frequency_penalty"] = json!(frequency_penalty);
        }

        let url = format!(
            "{}/v1/chat/completions",
            self.config.api_hostname.trim_end_matches("/")
        );
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.config.api_key)
            .header("Content-Type", "application/json")
            .timeout(self.config.timeout)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CompletionError::Timeout
                } else {
                    CompletionError::Transport(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body: Value = response.json().await.unwrap_or_default();
            let message = body["error"]["message"]
                .as_str()
                .unwrap_or("unknown provider error")
                .to_string();
            return Err(CompletionError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        let body: Value = response.json().await?;
        let content = body["choices"][0]["message"]["content"]
            .as_str()
            .ok_or(CompletionError::EmptyResponse)?;
        if content.is_empty() {
            return Err(CompletionError::EmptyResponse);
        }

        Ok(content.to_string())
    }
}
