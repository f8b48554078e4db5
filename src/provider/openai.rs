use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use super::{provider_error, Provider, SamplingParams};
use crate::errors::GenError;

pub const DEFAULT_API_BASE: &str = "https://api.openai.com";

/// OpenAI-compatible chat completions. The combined instruction + request is
/// sent as a single user message, with no extra system message.
pub struct OpenAIProvider {
    model: String,
    api_key: Option<String>,
    api_base: String,
    client: Client,
    timeout_secs: u64,
}

impl OpenAIProvider {
    pub fn new(model: String, api_key: Option<String>, timeout_secs: u64, api_base: Option<String>) -> Self {
        Self {
            model,
            api_key,
            api_base: api_base.unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            client: Client::new(),
            timeout_secs,
        }
    }
}

#[derive(Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[async_trait]
impl Provider for OpenAIProvider {
    async fn complete(&self, prompt: &str, params: &SamplingParams) -> Result<String, GenError> {
        let api_key = self.api_key.as_deref().ok_or_else(GenError::missing_credentials)?;
        let url = format!("{}/v1/chat/completions", self.api_base.trim_end_matches('/'));

        let body = json!({
            "model": self.model,
            "messages": [
                {
                    "role": "user",
                    "content": prompt
                }
            ],
            "temperature": params.temperature,
            "top_p": params.top_p,
            "max_tokens": params.max_output_tokens
        });

        tracing::debug!(%url, model = %self.model, "openai: POST chat completion");

        let resp = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .timeout(Duration::from_secs(self.timeout_secs))
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;

        tracing::debug!(%status, body_bytes = text.len(), "openai: response");

        if !status.is_success() {
            return Err(provider_error("openai", status, &text));
        }

        let parsed: ChatResponse = serde_json::from_str(&text)
            .map_err(|e| GenError::Malformed(format!("failed to parse OpenAI response: {e}")))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| GenError::Malformed("openai: response has no content".into()))
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}
