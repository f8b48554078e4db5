use serde::Serialize;
use thiserror::Error;

/// Fixed message the generation endpoint answers with (HTTP 500) when the
/// model provider credential is missing on its side.
pub const MISSING_CREDENTIALS_MESSAGE: &str = "API key not configured";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenError {
    #[error("Prompt is required")] EmptyPrompt,
    #[error("{0}")] Configuration(String),
    #[error("request failed: {0}")] Transport(String),
    #[error("generation endpoint returned {status}: {message}")] Remote { status: u16, message: String },
    #[error("malformed response: {0}")] Malformed(String),
    #[error("generated document looks truncated: {0}")] Incomplete(String),
}

/// Coarse classification callers branch on (retry, show, abort).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidInput,
    Configuration,
    Transport,
    Incomplete,
}

impl GenError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GenError::EmptyPrompt => ErrorKind::InvalidInput,
            GenError::Configuration(_) => ErrorKind::Configuration,
            GenError::Transport(_) | GenError::Remote { .. } | GenError::Malformed(_) => ErrorKind::Transport,
            GenError::Incomplete(_) => ErrorKind::Incomplete,
        }
    }

    /// Whether resubmitting the same prompt can reasonably succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Transport | ErrorKind::Incomplete)
    }

    pub fn missing_credentials() -> Self {
        GenError::Configuration(MISSING_CREDENTIALS_MESSAGE.to_string())
    }
}

impl From<reqwest::Error> for GenError {
    fn from(e: reqwest::Error) -> Self {
        GenError::Transport(e.to_string())
    }
}
