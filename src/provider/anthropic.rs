use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{provider_error, Provider, SamplingParams};
use crate::errors::GenError;

pub const DEFAULT_API_BASE: &str = "https://api.anthropic.com";
pub const API_VERSION: &str = "2023-06-01";

pub struct Anthropic {
    model: String,
    api_key: Option<String>,
    api_base: String,
    timeout: Duration,
    client: Client,
}

impl Anthropic {
    pub fn new(model: String, api_key: Option<String>, timeout_secs: u64, api_base: Option<String>) -> Self {
        Self {
            model,
            api_key,
            api_base: api_base.unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            timeout: Duration::from_secs(timeout_secs),
            client: Client::new(),
        }
    }
}

#[derive(Serialize)]
struct MsgRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f64,
    top_p: f64,
    messages: Vec<Msg<'a>>,
}

#[derive(Serialize)]
struct Msg<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MsgResponse {
    content: Vec<Block>,
}

#[derive(Deserialize)]
struct Block {
    #[serde(default)]
    text: String,
    #[serde(default)]
    r#type: String,
}

#[async_trait]
impl Provider for Anthropic {
    async fn complete(&self, prompt: &str, params: &SamplingParams) -> Result<String, GenError> {
        let api_key = self.api_key.as_deref().ok_or_else(GenError::missing_credentials)?;
        let url = format!("{}/v1/messages", self.api_base.trim_end_matches('/'));
        let body = MsgRequest {
            model: &self.model,
            max_tokens: params.max_output_tokens,
            temperature: params.temperature,
            top_p: params.top_p,
            messages: vec![Msg { role: "user", content: prompt }],
        };

        tracing::debug!(%url, model = %self.model, "anthropic: POST messages");

        let resp = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .header("x-api-key", api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;

        tracing::debug!(%status, body_bytes = text.len(), "anthropic: response");

        if !status.is_success() {
            return Err(provider_error("anthropic", status, &text));
        }

        let parsed: MsgResponse = serde_json::from_str(&text)
            .map_err(|e| GenError::Malformed(format!("anthropic response parse error: {e}")))?;

        // Concatenate text blocks; long pages can arrive split.
        let content: String = parsed
            .content
            .into_iter()
            .filter(|b| b.r#type == "text")
            .map(|b| b.text)
            .collect();

        if content.is_empty() {
            return Err(GenError::Malformed("anthropic: empty content".into()));
        }
        Ok(content)
    }

    fn name(&self) -> &'static str {
        "anthropic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use mockito::Matcher;
    use serde_json::json;

    #[tokio::test]
    async fn sends_versioned_request_and_joins_text_blocks() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/messages")
            .match_header("x-api-key", "ak-test")
            .match_header("anthropic-version", API_VERSION)
            .match_body(Matcher::PartialJson(json!({
                "max_tokens": 8192,
                "temperature": 0.7,
                "top_p": 0.95,
                "messages": [{ "role": "user", "content": "page please" }]
            })))
            .with_status(200)
            .with_body(r#"{"content":[{"type":"text","text":"<html>"},{"type":"text","text":"</html>"}]}"#)
            .create_async()
            .await;

        let p = Anthropic::new("claude".into(), Some("ak-test".into()), 5, Some(server.url()));
        let out = p.complete("page please", &SamplingParams::default()).await.unwrap();
        assert_eq!(out, "<html></html>");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn missing_key_is_configuration_error() {
        let p = Anthropic::new("claude".into(), None, 5, Some("http://127.0.0.1:1".into()));
        let err = p.complete("x", &SamplingParams::default()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[tokio::test]
    async fn overloaded_is_remote_error() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/v1/messages")
            .with_status(529)
            .with_body(r#"{"type":"error","error":{"type":"overloaded_error","message":"Overloaded"}}"#)
            .create_async()
            .await;

        let p = Anthropic::new("claude".into(), Some("k".into()), 5, Some(server.url()));
        let err = p.complete("x", &SamplingParams::default()).await.unwrap_err();
        assert_eq!(err, GenError::Remote { status: 529, message: "anthropic: Overloaded".into() });
    }
}
