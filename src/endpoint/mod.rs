use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::errors::{GenError, MISSING_CREDENTIALS_MESSAGE};
use crate::wire::{GenerateRequest, GenerateResponse};

/// Anything that turns a composed prompt into raw generated text.
///
/// One call is one request; implementations must not retry internally.
#[async_trait]
pub trait Endpoint: Send + Sync {
    async fn dispatch(&self, prompt: &str) -> Result<String, GenError>;

    /// Short label for logs ("http", "openai", ...).
    fn name(&self) -> &str;
}

pub type DynEndpoint = Box<dyn Endpoint + Send + Sync>;

/// Client for the remote generation endpoint:
/// `POST {prompt}` -> `{success, html}` / `{success: false, error}`.
pub struct HttpEndpoint {
    url: String,
    client: Client,
    timeout: Duration,
}

impl HttpEndpoint {
    pub fn new(url: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            url: url.into(),
            client: Client::new(),
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Endpoint for HttpEndpoint {
    async fn dispatch(&self, prompt: &str) -> Result<String, GenError> {
        let body = GenerateRequest { prompt: prompt.to_string() };

        tracing::debug!(url = %self.url, prompt_bytes = prompt.len(), "POST generation endpoint");

        let resp = self
            .client
            .post(&self.url)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;

        tracing::debug!(%status, body_bytes = text.len(), "generation endpoint replied");

        let parsed: Result<GenerateResponse, _> = serde_json::from_str(&text);

        if !status.is_success() {
            let message = match parsed {
                Ok(GenerateResponse { error: Some(e), .. }) if !e.trim().is_empty() => e,
                _ if text.trim().is_empty() => status
                    .canonical_reason()
                    .unwrap_or("generation endpoint error")
                    .to_string(),
                _ => text,
            };
            if status.as_u16() == 500 && message == MISSING_CREDENTIALS_MESSAGE {
                return Err(GenError::missing_credentials());
            }
            return Err(GenError::Remote { status: status.as_u16(), message });
        }

        let parsed = parsed.map_err(|e| GenError::Malformed(format!("invalid endpoint JSON: {e}")))?;
        if !parsed.success {
            let message = parsed.error.unwrap_or_else(|| "generation failed".to_string());
            return Err(GenError::Remote { status: status.as_u16(), message });
        }
        match parsed.html {
            Some(html) if !html.trim().is_empty() => Ok(html),
            _ => Err(GenError::Malformed("endpoint reported success without html".into())),
        }
    }

    fn name(&self) -> &str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    #[tokio::test]
    async fn posts_prompt_and_returns_html() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/generate")
            .match_header("content-type", "application/json")
            .match_body(mockito::Matcher::Json(serde_json::json!({ "prompt": "hello" })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"success":true,"html":"<!DOCTYPE html><html></html>"}"#)
            .create_async()
            .await;

        let ep = HttpEndpoint::new(format!("{}/api/generate", server.url()), 5);
        let html = ep.dispatch("hello").await.unwrap();
        assert_eq!(html, "<!DOCTYPE html><html></html>");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn missing_credentials_is_a_configuration_error() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/")
            .with_status(500)
            .with_body(r#"{"success":false,"error":"API key not configured"}"#)
            .create_async()
            .await;

        let err = HttpEndpoint::new(server.url(), 5).dispatch("x").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert_eq!(err.to_string(), MISSING_CREDENTIALS_MESSAGE);
    }

    #[tokio::test]
    async fn other_server_errors_carry_status_and_message() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/")
            .with_status(500)
            .with_body(r#"{"success":false,"error":"model overloaded"}"#)
            .create_async()
            .await;

        let err = HttpEndpoint::new(server.url(), 5).dispatch("x").await.unwrap_err();
        assert_eq!(err, GenError::Remote { status: 500, message: "model overloaded".into() });
    }

    #[tokio::test]
    async fn non_json_error_body_is_kept() {
        let mut server = mockito::Server::new_async().await;
        let _m = server.mock("POST", "/").with_status(502).with_body("upstream down").create_async().await;

        let err = HttpEndpoint::new(server.url(), 5).dispatch("x").await.unwrap_err();
        assert_eq!(err, GenError::Remote { status: 502, message: "upstream down".into() });
    }

    #[tokio::test]
    async fn empty_error_body_falls_back_to_reason() {
        let mut server = mockito::Server::new_async().await;
        let _m = server.mock("POST", "/").with_status(400).create_async().await;

        let err = HttpEndpoint::new(server.url(), 5).dispatch("x").await.unwrap_err();
        assert_eq!(err, GenError::Remote { status: 400, message: "Bad Request".into() });
    }

    #[tokio::test]
    async fn malformed_success_body() {
        let mut server = mockito::Server::new_async().await;
        let _m = server.mock("POST", "/").with_status(200).with_body("<html>oops").create_async().await;

        let err = HttpEndpoint::new(server.url(), 5).dispatch("x").await.unwrap_err();
        assert!(matches!(err, GenError::Malformed(_)));
    }

    #[tokio::test]
    async fn success_without_html_is_malformed() {
        let mut server = mockito::Server::new_async().await;
        let _m = server.mock("POST", "/").with_status(200).with_body(r#"{"success":true}"#).create_async().await;

        let err = HttpEndpoint::new(server.url(), 5).dispatch("x").await.unwrap_err();
        assert!(matches!(err, GenError::Malformed(_)));
    }

    #[tokio::test]
    async fn connection_refused_is_transport() {
        let port = {
            let l = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            l.local_addr().unwrap().port()
        };
        let err = HttpEndpoint::new(format!("http://127.0.0.1:{port}/api/generate"), 2)
            .dispatch("x")
            .await
            .unwrap_err();
        assert!(matches!(err, GenError::Transport(_)));
    }
}
