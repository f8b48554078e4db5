//! Direct model-provider transport.
//!
//! Performs the same single-turn completion the generation endpoint does on
//! the server side, so the pipeline can run without a deployed endpoint.

use async_trait::async_trait;
use serde::Serialize;

use crate::cli::ProviderKind;
use crate::endpoint::Endpoint;
use crate::errors::GenError;

pub mod anthropic;
pub mod openai;

/// Sampling temperature: creative but controlled.
pub const TEMPERATURE: f64 = 0.7;
/// Nucleus-sampling threshold.
pub const TOP_P: f64 = 0.95;
/// Output budget large enough for a full multi-section page.
pub const MAX_OUTPUT_TOKENS: u32 = 8192;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SamplingParams {
    pub temperature: f64,
    pub top_p: f64,
    pub max_output_tokens: u32,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            temperature: TEMPERATURE,
            top_p: TOP_P,
            max_output_tokens: MAX_OUTPUT_TOKENS,
        }
    }
}

#[async_trait]
pub trait Provider: Send + Sync {
    /// Single-turn completion: `prompt` is sent as one user message.
    async fn complete(&self, prompt: &str, params: &SamplingParams) -> Result<String, GenError>;

    fn name(&self) -> &'static str;
}

pub type DynProvider = Box<dyn Provider + Send + Sync>;

impl ProviderKind {
    pub fn api_key_env(&self) -> &'static str {
        match self {
            ProviderKind::OpenAI => "OPENAI_API_KEY",
            ProviderKind::Anthropic => "ANTHROPIC_API_KEY",
        }
    }
}

/// Build a provider, reading its credential from the environment. A missing
/// key is not an error here; it surfaces as a configuration failure on the
/// first call, the same way the remote endpoint reports it.
pub fn make_provider(
    kind: ProviderKind,
    model: String,
    timeout_secs: u64,
    api_base: Option<String>,
) -> DynProvider {
    let api_key = std::env::var(kind.api_key_env()).ok().filter(|k| !k.trim().is_empty());
    match kind {
        ProviderKind::OpenAI => Box::new(openai::OpenAIProvider::new(model, api_key, timeout_secs, api_base)),
        ProviderKind::Anthropic => Box::new(anthropic::Anthropic::new(model, api_key, timeout_secs, api_base)),
    }
}

/// Turn a non-2xx provider reply into a `Remote` error, preferring the
/// provider's own `error.message` when the body has one.
pub(crate) fn provider_error(provider: &str, status: reqwest::StatusCode, text: &str) -> GenError {
    let message = serde_json::from_str::<serde_json::Value>(text)
        .ok()
        .and_then(|v| v.pointer("/error/message").and_then(|m| m.as_str()).map(String::from))
        .unwrap_or_else(|| text.trim().to_string());
    let message = if message.is_empty() {
        format!("{provider} returned {status}")
    } else {
        format!("{provider}: {message}")
    };
    GenError::Remote { status: status.as_u16(), message }
}

/// Adapts a [`Provider`] to the [`Endpoint`] seam with the fixed sampling
/// parameters.
pub struct DirectEndpoint {
    provider: DynProvider,
    params: SamplingParams,
}

impl DirectEndpoint {
    pub fn new(provider: DynProvider) -> Self {
        Self { provider, params: SamplingParams::default() }
    }
}

#[async_trait]
impl Endpoint for DirectEndpoint {
    async fn dispatch(&self, prompt: &str) -> Result<String, GenError> {
        tracing::debug!(provider = self.provider.name(), params = ?self.params, "direct provider call");
        let text = self.provider.complete(prompt, &self.params).await?;
        if text.trim().is_empty() {
            return Err(GenError::Malformed(format!("{} returned empty content", self.provider.name())));
        }
        Ok(text)
    }

    fn name(&self) -> &str {
        self.provider.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    #[test]
    fn default_params_are_the_named_constants() {
        let p = SamplingParams::default();
        assert_eq!(p.temperature, TEMPERATURE);
        assert_eq!(p.top_p, TOP_P);
        assert_eq!(p.max_output_tokens, MAX_OUTPUT_TOKENS);
    }

    #[test]
    fn provider_error_prefers_structured_message() {
        let e = provider_error(
            "openai",
            reqwest::StatusCode::TOO_MANY_REQUESTS,
            r#"{"error":{"message":"Rate limit reached","type":"requests"}}"#,
        );
        assert_eq!(e, GenError::Remote { status: 429, message: "openai: Rate limit reached".into() });

        let e = provider_error("anthropic", reqwest::StatusCode::BAD_GATEWAY, "");
        assert_eq!(e.kind(), ErrorKind::Transport);
        assert!(e.to_string().contains("502"));
    }

    struct Echo;

    #[async_trait]
    impl Provider for Echo {
        async fn complete(&self, prompt: &str, params: &SamplingParams) -> Result<String, GenError> {
            Ok(format!("{prompt}|{}|{}|{}", params.temperature, params.top_p, params.max_output_tokens))
        }
        fn name(&self) -> &'static str {
            "echo"
        }
    }

    #[tokio::test]
    async fn direct_endpoint_passes_fixed_params() {
        let ep = DirectEndpoint::new(Box::new(Echo));
        assert_eq!(ep.dispatch("p").await.unwrap(), "p|0.7|0.95|8192");
        assert_eq!(ep.name(), "echo");
    }

    #[tokio::test]
    async fn direct_endpoint_rejects_blank_content() {
        struct Blank;
        #[async_trait]
        impl Provider for Blank {
            async fn complete(&self, _: &str, _: &SamplingParams) -> Result<String, GenError> {
                Ok("  ".into())
            }
            fn name(&self) -> &'static str {
                "blank"
            }
        }
        let blank = DirectEndpoint::new(Box::new(Blank));
        assert!(matches!(blank.dispatch("p").await, Err(GenError::Malformed(_))));
    }
}
