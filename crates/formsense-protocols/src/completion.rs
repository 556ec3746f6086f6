//! Completion-service contract.
//!
//! Three pipeline stages (container inference, field extraction, value
//! filling) issue one structured-output completion call each. The contract
//! is deliberately narrow: a request with a response schema, and a tagged
//! outcome that callers must match exhaustively instead of type-checking
//! at runtime.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Role of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Model,
}

/// One role-tagged text turn of caller-supplied context.
///
/// Treated as opaque ordered input; the pipeline never mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: TurnRole,
    pub text: String,
}

impl ChatTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Model,
            text: text.into(),
        }
    }
}

/// A single structured-output completion request.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub system_instruction: String,
    /// The sole message of the request, appended after `history`.
    pub message: String,
    pub history: Vec<ChatTurn>,
    /// Response schema the service is constrained to.
    pub response_schema: serde_json::Value,
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
}

impl CompletionRequest {
    pub fn new(system_instruction: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            system_instruction: system_instruction.into(),
            message: message.into(),
            history: Vec::new(),
            response_schema: serde_json::Value::Null,
            temperature: 0.6,
            top_p: 0.7,
            top_k: 40,
            max_output_tokens: 1024,
        }
    }

    pub fn with_history(mut self, history: Vec<ChatTurn>) -> Self {
        self.history = history;
        self
    }

    pub fn with_response_schema(mut self, schema: serde_json::Value) -> Self {
        self.response_schema = schema;
        self
    }

    pub fn with_max_output_tokens(mut self, max: u32) -> Self {
        self.max_output_tokens = max;
        self
    }
}

/// Outcome of a structured completion call.
///
/// Call sites must handle all three arms; a `Malformed` or `ServiceError`
/// outcome triggers that stage's deterministic fallback and is never
/// surfaced to the request as an error.
#[derive(Debug, Clone)]
pub enum StructuredOutcome {
    /// The service returned JSON. Schema conformance is still the
    /// caller's to verify by deserializing into its typed shape.
    Ok(serde_json::Value),
    /// The service answered, but not with parseable JSON.
    Malformed(String),
    /// The call itself failed (network, HTTP error, timeout).
    ServiceError(String),
}

/// A completion service capable of schema-constrained JSON output.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> StructuredOutcome;
}
