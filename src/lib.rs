//! AI-assisted page generation: free-text request in, complete HTML document out.
//!
//! ```text
//! request -> prefs::extract -> prompt::compose -> client::GenerationClient -> Endpoint -> HTML
//! ```

pub mod cli;
pub mod client;
pub mod config;
pub mod document;
pub mod endpoint;
pub mod errors;
pub mod log;
pub mod prefs;
pub mod prompt;
pub mod provider;
pub mod ux;
pub mod wire;

pub use client::{GenerationClient, ProgressCallback};
pub use errors::{ErrorKind, GenError};
pub use wire::{GenerationResult, Preferences, ProgressEvent};
