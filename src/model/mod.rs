//! Generative model collaborator for the fallback rule
//!
//! The responder only sees the `Generator` trait. `HttpGenerator` talks to a
//! hosted text-generation endpoint; `OfflineGenerator` refuses every call so
//! the fallback degrades to the clarification reply.

mod http;

use thiserror::Error;

pub(crate) use http::{DEFAULT_ENDPOINT, HttpGenerator};

/// Sampling settings forwarded with every generation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct GenerationParams {
    pub(crate) max_length: u32,
    pub(crate) truncation: bool,
    pub(crate) do_sample: bool,
    /// End-of-text token id used for padding
    pub(crate) pad_token_id: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_length: 1000,
            truncation: true,
            do_sample: true,
            pad_token_id: 50256,
        }
    }
}

#[derive(Debug, Error)]
pub(crate) enum GenerateError {
    #[error("Generation disabled (offline mode)")]
    Disabled,

    #[error("Request to {endpoint} failed: {message}")]
    Http { endpoint: String, message: String },

    #[error("Model endpoint returned an error: {0}")]
    Api(String),

    #[error("Unexpected response from model endpoint: {0}")]
    Malformed(String),
}

pub(crate) trait Generator {
    /// Short label for diagnostics
    fn name(&self) -> &'static str;

    /// Generate a continuation of `prompt`. The returned text may echo the
    /// prompt; callers strip it.
    fn generate(&self, prompt: &str, params: &GenerationParams) -> Result<String, GenerateError>;
}

pub(crate) struct OfflineGenerator;

impl Generator for OfflineGenerator {
    fn name(&self) -> &'static str {
        "offline"
    }

    fn generate(&self, _prompt: &str, _params: &GenerationParams) -> Result<String, GenerateError> {
        Err(GenerateError::Disabled)
    }
}
