use serde::{Deserialize, Serialize};

use crate::errors::{ErrorKind, GenError};

/// ========================================
/// Generation endpoint wire protocol
/// ========================================

/// Body of `POST <endpoint>`: the fully composed prompt text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub prompt: String,
}

/// Body of every endpoint reply, success or failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// ========================================
/// Pipeline data model
/// ========================================

/// Design hints pulled out of the free-text request.
/// `None` means "use default guidance", not "no preference".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fonts: Option<String>,
}

impl Preferences {
    pub fn is_empty(&self) -> bool {
        self.colors.is_none() && self.fonts.is_none()
    }
}

/// One generation attempt's input. Built once, never mutated.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    user_prompt: String,
    preferences: Preferences,
}

impl GenerationRequest {
    pub fn new(user_prompt: &str) -> Self {
        Self {
            user_prompt: user_prompt.to_string(),
            preferences: crate::prefs::extract(user_prompt),
        }
    }

    pub fn user_prompt(&self) -> &str {
        &self.user_prompt
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComposedPrompt {
    pub system_instruction: String,
    pub user_prompt: String,
}

impl ComposedPrompt {
    /// The exact text sent to the endpoint. Instruction first, request last.
    pub fn payload(&self) -> String {
        let mut s = String::with_capacity(
            self.system_instruction.len() + crate::prompt::PROMPT_SEPARATOR.len() + self.user_prompt.len(),
        );
        s.push_str(&self.system_instruction);
        s.push_str(crate::prompt::PROMPT_SEPARATOR);
        s.push_str(&self.user_prompt);
        s
    }
}

/// Outcome of `GenerationClient::generate`.
///
/// Only constructible through [`GenerationResult::ok`] and
/// [`GenerationResult::failed`], so a success always carries a non-empty
/// document and a failure always carries a non-empty message and no document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_kind: Option<ErrorKind>,
}

impl GenerationResult {
    /// Empty documents are rejected as malformed rather than reported as success.
    pub fn ok(html: String) -> Self {
        if html.trim().is_empty() {
            return Self::failed(&GenError::Malformed("endpoint returned an empty document".into()));
        }
        Self { success: true, html: Some(html), error: None, error_kind: None }
    }

    pub fn failed(err: &GenError) -> Self {
        let mut msg = err.to_string();
        if msg.trim().is_empty() {
            msg = "generation failed".to_string();
        }
        Self { success: false, html: None, error: Some(msg), error_kind: Some(err.kind()) }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn html(&self) -> Option<&str> {
        self.html.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.error_kind
    }

    pub fn into_html(self) -> Option<String> {
        self.html
    }
}

/// Coarse checkpoint emitted while a generation runs. Values never decrease
/// within one attempt; they are fixed milestones, not measured progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressEvent {
    pub progress: u8,
    pub message: String,
}

impl ProgressEvent {
    pub fn new(progress: u8, message: impl Into<String>) -> Self {
        Self { progress: progress.min(100), message: message.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_result_carries_html_only() {
        let r = GenerationResult::ok("<html></html>".into());
        assert!(r.is_success());
        assert_eq!(r.html(), Some("<html></html>"));
        assert!(r.error().is_none());
        assert!(r.error_kind().is_none());
    }

    #[test]
    fn empty_html_is_never_a_success() {
        let r = GenerationResult::ok("   \n".into());
        assert!(!r.is_success());
        assert!(r.html().is_none());
        assert_eq!(r.error_kind(), Some(ErrorKind::Transport));
    }

    #[test]
    fn failed_result_serializes_like_the_endpoint() {
        let r = GenerationResult::failed(&GenError::EmptyPrompt);
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["success"], false);
        assert_eq!(v["error"], "Prompt is required");
        assert_eq!(v["errorKind"], "invalid_input");
        assert!(v.get("html").is_none());
    }

    #[test]
    fn response_without_optional_fields_parses() {
        let r: GenerateResponse = serde_json::from_str(r#"{"success":false}"#).unwrap();
        assert!(!r.success);
        assert!(r.html.is_none() && r.error.is_none());
    }

    #[test]
    fn progress_is_clamped() {
        assert_eq!(ProgressEvent::new(140, "x").progress, 100);
    }
}
