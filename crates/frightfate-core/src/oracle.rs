//! Narrative oracle port.
//!
//! The oracle is an external generative-text service. It is handed a
//! role-tagged prompt and returns free text that is expected, but not
//! guaranteed, to embed a single JSON value.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Author of a prompt message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptRole {
    /// Standing instructions.
    System,
    /// The request itself.
    User,
}

/// One role-tagged prompt message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptMessage {
    /// Who is speaking.
    pub role: PromptRole,
    /// Message text.
    pub content: String,
}

impl PromptMessage {
    /// A system message.
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: PromptRole::System,
            content: content.into(),
        }
    }

    /// A user message.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: PromptRole::User,
            content: content.into(),
        }
    }
}

/// Sampling parameters for one oracle call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    /// Sampling temperature.
    pub temperature: f32,
    /// Nucleus sampling cutoff.
    pub top_p: f32,
    /// Top-k sampling cutoff.
    pub top_k: u32,
    /// Upper bound on generated tokens.
    pub max_output_tokens: u32,
}

/// A complete prompt descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OracleRequest {
    /// Messages in conversation order.
    pub messages: Vec<PromptMessage>,
    /// Sampling parameters.
    pub params: GenerationParams,
}

/// Ways an oracle call can fail. All of them are recoverable: the engine
/// answers every one with its deterministic fallback.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OracleError {
    /// The call exceeded its time budget and was abandoned.
    #[error("oracle call timed out after {0:?}")]
    Timeout(Duration),

    /// The response contained no parseable JSON value, or the value lacked
    /// required fields.
    #[error("malformed oracle output: {0}")]
    MalformedOutput(String),

    /// A generated scenario parsed but failed content validation.
    #[error("invalid generated scenario: {0}")]
    InvalidScenario(String),

    /// The oracle could not be reached or refused the request.
    #[error("oracle unavailable: {0}")]
    Unavailable(String),
}

/// Generative text service.
#[async_trait]
pub trait NarrativeOracle: Send + Sync {
    /// Runs one generation and returns the raw response text.
    ///
    /// # Errors
    ///
    /// `OracleError::Unavailable` on transport or service failure.
    async fn generate(&self, request: &OracleRequest) -> Result<String, OracleError>;
}
