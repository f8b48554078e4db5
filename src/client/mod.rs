//! Generation client: prompt in, validated HTML document out.
//!
//! Progress is reported as a fixed sequence of checkpoints. The remote call
//! does not expose real progress, so the jump from [`checkpoints::DISPATCHED`]
//! to [`checkpoints::VALIDATING`] covers the whole round trip; progress bars
//! built on these events should animate while waiting rather than interpolate.

use crate::endpoint::DynEndpoint;
use crate::errors::GenError;
use crate::prompt::PromptTemplate;
use crate::wire::{ComposedPrompt, GenerationRequest, GenerationResult, ProgressEvent};
use crate::document;

pub type ProgressCallback<'a> = &'a (dyn Fn(&ProgressEvent) + Send + Sync);

pub mod checkpoints {
    pub const READING: u8 = 5;
    pub const COMPOSING: u8 = 15;
    pub const DISPATCHED: u8 = 30;
    pub const VALIDATING: u8 = 90;
    pub const DONE: u8 = 100;
}

#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Reject output without opening/closing document tags as `Incomplete`.
    pub check_completeness: bool,
    /// Minimum accepted document size when the check is on.
    pub min_document_bytes: usize,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self { check_completeness: true, min_document_bytes: 0 }
    }
}

/// Holds no per-call state; `generate` can be awaited concurrently.
pub struct GenerationClient {
    endpoint: DynEndpoint,
    template: PromptTemplate,
    options: ClientOptions,
}

impl GenerationClient {
    pub fn new(endpoint: DynEndpoint) -> Self {
        Self {
            endpoint,
            template: PromptTemplate::builtin(),
            options: ClientOptions::default(),
        }
    }

    pub fn with_template(mut self, template: PromptTemplate) -> Self {
        self.template = template;
        self
    }

    pub fn with_options(mut self, options: ClientOptions) -> Self {
        self.options = options;
        self
    }

    pub fn endpoint_name(&self) -> &str {
        self.endpoint.name()
    }

    /// Extract preferences and compose the full prompt without sending it.
    pub fn prepare(&self, user_prompt: &str) -> (GenerationRequest, ComposedPrompt) {
        let request = GenerationRequest::new(user_prompt);
        let composed = self.template.compose(request.user_prompt(), request.preferences());
        (request, composed)
    }

    /// Run one generation attempt. Exactly one endpoint call is made for a
    /// non-empty prompt, none for an empty one. Never panics or returns `Err`;
    /// every failure is folded into the result.
    pub async fn generate(&self, user_prompt: &str, on_progress: Option<ProgressCallback<'_>>) -> GenerationResult {
        if user_prompt.trim().is_empty() {
            tracing::warn!("rejected empty prompt");
            return GenerationResult::failed(&GenError::EmptyPrompt);
        }

        let report = |progress: u8, message: &str| {
            if let Some(cb) = on_progress {
                cb(&ProgressEvent::new(progress, message));
            }
        };

        report(checkpoints::READING, "Reading design preferences");
        let (request, composed) = self.prepare(user_prompt);
        tracing::info!(
            colors = request.preferences().colors.as_deref().unwrap_or("default"),
            fonts = request.preferences().fonts.as_deref().unwrap_or("default"),
            "extracted design preferences"
        );

        report(checkpoints::COMPOSING, "Composing design instructions");
        let payload = composed.payload();

        report(checkpoints::DISPATCHED, "Generating page with AI");
        tracing::info!(endpoint = self.endpoint.name(), payload_bytes = payload.len(), "dispatching generation");

        let outcome = match self.endpoint.dispatch(&payload).await {
            Ok(raw) => {
                report(checkpoints::VALIDATING, "Validating document");
                self.finish(&raw)
            }
            Err(e) => Err(e),
        };

        match outcome {
            Ok(html) => {
                tracing::info!(html_bytes = html.len(), "generation succeeded");
                report(checkpoints::DONE, "Page ready");
                GenerationResult::ok(html)
            }
            Err(e) => {
                tracing::warn!(error = %e, kind = ?e.kind(), "generation failed");
                report(checkpoints::DONE, "Generation failed");
                GenerationResult::failed(&e)
            }
        }
    }

    fn finish(&self, raw: &str) -> Result<String, GenError> {
        let html = document::clean(raw);
        if html.is_empty() {
            return Err(GenError::Malformed("endpoint returned an empty document".into()));
        }
        if self.options.check_completeness {
            document::check_completeness(&html, self.options.min_document_bytes)?;
        }
        Ok(html)
    }
}
