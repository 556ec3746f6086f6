//! Container-selector inference.

use std::sync::Arc;

use tracing::{debug, warn};

use formsense_protocols::completion::{CompletionBackend, CompletionRequest, StructuredOutcome};

/// Fallback selector when inference is unavailable or unusable: any
/// element under a form. Degrades extraction quality, never the request.
pub const DEFAULT_CONTAINER_SELECTOR: &str = "form *";

const DETECT_INSTRUCTION: &str = "The message contains the HTML of a page with a form. The form \
is split into repeated sections (divs, sections, spans, table rows or other elements), each \
pairing one label (the question text) with one input control. Return one CSS selector that \
matches every such section, regardless of the length of the form or the number of sections. \
Return only the selector.";

fn response_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "OBJECT",
        "properties": {
            "containerSelector": { "type": "STRING" }
        },
        "required": ["containerSelector"]
    })
}

/// Infers the repeated-block container selector for a form via one
/// completion call.
pub struct ContainerDetector {
    backend: Arc<dyn CompletionBackend>,
}

impl ContainerDetector {
    pub fn new(backend: Arc<dyn CompletionBackend>) -> Self {
        Self { backend }
    }

    /// Detect the container selector for sanitized form HTML.
    ///
    /// Any service failure or unusable answer yields
    /// [`DEFAULT_CONTAINER_SELECTOR`].
    pub async fn detect(&self, html: &str) -> String {
        let request = CompletionRequest::new(DETECT_INSTRUCTION, html)
            .with_response_schema(response_schema())
            .with_max_output_tokens(200);

        match self.backend.complete(request).await {
            StructuredOutcome::Ok(value) => {
                match value
                    .get("containerSelector")
                    .and_then(|v| v.as_str())
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                {
                    Some(selector) => {
                        debug!("inferred container selector: {}", selector);
                        selector.to_string()
                    }
                    None => {
                        warn!("container inference response missing selector field");
                        DEFAULT_CONTAINER_SELECTOR.to_string()
                    }
                }
            }
            StructuredOutcome::Malformed(raw) => {
                warn!("container inference returned non-JSON ({} bytes)", raw.len());
                DEFAULT_CONTAINER_SELECTOR.to_string()
            }
            StructuredOutcome::ServiceError(reason) => {
                warn!("container inference unavailable: {}", reason);
                DEFAULT_CONTAINER_SELECTOR.to_string()
            }
        }
    }
}

#[cfg(test)]
#[path = "detect_tests.rs"]
mod tests;
