//! Generic field extraction.

use std::sync::Arc;

use tracing::{debug, warn};

use formsense_protocols::completion::{CompletionBackend, CompletionRequest, StructuredOutcome};
use formsense_protocols::field::FieldDescriptor;

use crate::heuristics;

const EXTRACT_INSTRUCTION: &str = "The message contains a CSS container selector and the HTML of \
a page with a form. Every element matching the selector is one section of the form pairing one \
label (the question text) with one input control. For each input control, return the most \
specific CSS selector that resolves to exactly that element, and the question text asked by its \
section.";

fn response_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "inputSelector": { "type": "STRING" },
                "label": { "type": "STRING" }
            },
            "required": ["inputSelector", "label"]
        }
    })
}

/// Extracts `(selector, label)` descriptors for a form, preferring the
/// completion service and falling back to DOM heuristics.
pub struct FieldExtractor {
    backend: Arc<dyn CompletionBackend>,
}

impl FieldExtractor {
    pub fn new(backend: Arc<dyn CompletionBackend>) -> Self {
        Self { backend }
    }

    /// Extract field descriptors from sanitized HTML.
    ///
    /// The service answer is accepted only when it is a non-empty array
    /// conforming to the descriptor schema; anything else triggers the
    /// DOM-heuristic fallback. Descriptors with an empty selector are
    /// filtered out before being surfaced.
    pub async fn extract(&self, html: &str, container_selector: &str) -> Vec<FieldDescriptor> {
        let message = format!("Container selector: {}\n\n{}", container_selector, html);
        let request = CompletionRequest::new(EXTRACT_INSTRUCTION, message)
            .with_response_schema(response_schema())
            .with_max_output_tokens(2048);

        let service_fields = match self.backend.complete(request).await {
            StructuredOutcome::Ok(value) => {
                match serde_json::from_value::<Vec<FieldDescriptor>>(value) {
                    Ok(fields) => Some(fields),
                    Err(e) => {
                        warn!("field extraction response did not match schema: {}", e);
                        None
                    }
                }
            }
            StructuredOutcome::Malformed(raw) => {
                warn!("field extraction returned non-JSON ({} bytes)", raw.len());
                None
            }
            StructuredOutcome::ServiceError(reason) => {
                warn!("field extraction unavailable: {}", reason);
                None
            }
        };

        let fields = match service_fields.filter(|fields| !fields.is_empty()) {
            Some(fields) => fields,
            None => {
                debug!("falling back to DOM heuristics");
                heuristics::extract_from_dom(html, container_selector)
            }
        };

        fields
            .into_iter()
            .filter(|field| !field.input_selector.trim().is_empty())
            .collect()
    }
}

#[cfg(test)]
#[path = "extract_tests.rs"]
mod tests;
