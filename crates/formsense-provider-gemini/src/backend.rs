//! `CompletionBackend` implementation on top of the Gemini API.

use async_trait::async_trait;
use tracing::debug;

use formsense_protocols::completion::{
    CompletionBackend, CompletionRequest, StructuredOutcome, TurnRole,
};

use crate::client::GeminiClient;
use crate::types::*;

/// Gemini completion backend.
pub struct GeminiBackend {
    client: GeminiClient,
    model: String,
}

impl GeminiBackend {
    /// Create a new backend for the given model.
    pub fn new(api_key: String, model: impl Into<String>) -> Self {
        Self {
            client: GeminiClient::new(api_key),
            model: model.into(),
        }
    }

    /// Create a backend against a custom endpoint (used by tests).
    pub fn with_base_url(api_key: String, model: impl Into<String>, base_url: String) -> Self {
        Self {
            client: GeminiClient::with_base_url(api_key, base_url),
            model: model.into(),
        }
    }

    fn convert_request(&self, request: &CompletionRequest) -> GenerateContentRequest {
        let mut contents: Vec<Content> = request
            .history
            .iter()
            .map(|turn| {
                let role = match turn.role {
                    TurnRole::User => "user",
                    TurnRole::Model => "model",
                };
                Content::text(role, turn.text.clone())
            })
            .collect();
        contents.push(Content::text("user", request.message.clone()));

        let response_schema = if request.response_schema.is_null() {
            None
        } else {
            Some(request.response_schema.clone())
        };

        GenerateContentRequest {
            contents,
            system_instruction: Some(Content::text("user", request.system_instruction.clone())),
            generation_config: Some(GenerationConfig {
                temperature: Some(f64::from(request.temperature)),
                top_p: Some(f64::from(request.top_p)),
                top_k: Some(request.top_k),
                max_output_tokens: Some(request.max_output_tokens),
                response_mime_type: Some("application/json".to_string()),
                response_schema,
            }),
        }
    }
}

#[async_trait]
impl CompletionBackend for GeminiBackend {
    async fn complete(&self, request: CompletionRequest) -> StructuredOutcome {
        debug!("Gemini complete: model={}", self.model);

        let gemini_request = self.convert_request(&request);

        match self.client.generate_content(&self.model, gemini_request).await {
            Ok(response) => match response.first_text() {
                Some(text) => match serde_json::from_str(&text) {
                    Ok(value) => StructuredOutcome::Ok(value),
                    Err(_) => StructuredOutcome::Malformed(text),
                },
                None => StructuredOutcome::Malformed(String::new()),
            },
            Err(e) => StructuredOutcome::ServiceError(e.to_string()),
        }
    }
}

#[cfg(test)]
#[path = "backend_tests.rs"]
mod tests;
