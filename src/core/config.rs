use std::env;
use std::time::Duration;

use crate::openai::CompletionConfig;
use crate::tutor::prompt::{TUTOR_GREETING, TUTOR_INSTRUCTION};

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub db_path: String,
    pub export_path: String,
    pub openai_api_hostname: String,
    pub openai_api_key: String,
    pub openai_model: String,
    pub max_response_tokens: u32,
    pub temperature: f32,
    pub presence_penalty: Option<f32>,
    pub frequency_penalty: Option<f32>,
    pub completion_timeout: Duration,
    pub system_message: String,
    pub greeting: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        let storage_path = env::var("QUILL_STORAGE_PATH").unwrap_or("./".to_string());
        let db_path = format!("{}/db", storage_path);
        let export_path = format!("{}/exports", storage_path);
        let openai_api_hostname = env::var("QUILL_LLM_HOST")
            .unwrap_or_else(|_| "https://api.openai.com".to_string());
        let openai_api_key = env::var("OPENAI_API_KEY").expect("Missing env var OPENAI_API_KEY");
        let openai_model =
            env::var("QUILL_LLM_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());
        let max_response_tokens = env::var("QUILL_MAX_RESPONSE_TOKENS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(150);
        let temperature = env::var("QUILL_TEMPERATURE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(1.0);
        let presence_penalty = env::var("QUILL_PRESENCE_PENALTY")
            .ok()
            .and_then(|v| v.parse().ok());
        let frequency_penalty = env::var("QUILL_FREQUENCY_PENALTY")
            .ok()
            .and_then(|v| v.parse().ok());
        let completion_timeout_secs = env::var("QUILL_COMPLETION_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(60);
        let system_message =
            env::var("QUILL_SYSTEM_MESSAGE").unwrap_or_else(|_| TUTOR_INSTRUCTION.to_string());
        let greeting = env::var("QUILL_GREETING").unwrap_or_else(|_| TUTOR_GREETING.to_string());

        Self {
            db_path,
            export_path,
            openai_api_hostname,
            openai_api_key,
            openai_model,
            max_response_tokens,
            temperature,
            presence_penalty,
            frequency_penalty,
            completion_timeout: Duration::from_secs(completion_timeout_secs),
            system_message,
            greeting,
        }
    }
}

impl AppConfig {
    /// The request configuration handed to the completion client. All
    /// tuning lives here so every session talks to the provider the
    /// same way.
    pub fn completion_config(&self) -> CompletionConfig {
        CompletionConfig {
            api_hostname: self.openai_api_hostname.clone(),
            api_key: self.openai_api_key.clone(),
            model: self.openai_model.clone(),
            max_tokens: self.max_response_tokens,
            temperature: self.temperature,
            presence_penalty: self.presence_penalty,
            frequency_penalty: self.frequency_penalty,
            timeout: self.completion_timeout,
        }
    }
}
