//! Value filling.

use std::sync::Arc;

use tracing::{debug, warn};

use formsense_protocols::completion::{
    ChatTurn, CompletionBackend, CompletionRequest, StructuredOutcome,
};
use formsense_protocols::field::{FieldDescriptor, FillEnvelope, FilledField};
use formsense_protocols::platform::Platform;

const FILL_INSTRUCTION: &str = "The message contains a JSON array of form fields, each with a \
CSS selector and the question asked by the field. Using the conversation history as the source \
of information about the user, return the same array with a value answering each question. \
Leave a value empty when the history does not answer its question.";

/// Base output budget for a fill call.
const FILL_TOKEN_FLOOR: u32 = 256;
/// Additional budget per descriptor, so long forms are not truncated.
const FILL_TOKENS_PER_FIELD: u32 = 48;

fn response_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "inputSelector": { "type": "STRING" },
                "label": { "type": "STRING" },
                "value": { "type": "STRING" }
            },
            "required": ["inputSelector", "label", "value"]
        }
    })
}

/// Annotates field descriptors with values drawn from user context.
pub struct ValueFiller {
    backend: Arc<dyn CompletionBackend>,
}

impl ValueFiller {
    pub fn new(backend: Arc<dyn CompletionBackend>) -> Self {
        Self { backend }
    }

    /// Fill descriptors from the caller-supplied context turns.
    ///
    /// On any service failure, parse failure or schema mismatch the
    /// original descriptors come back with no value attached; an
    /// unfilled result is a valid, if degraded, outcome.
    pub async fn fill(
        &self,
        descriptors: Vec<FieldDescriptor>,
        context: Vec<ChatTurn>,
    ) -> Vec<FilledField> {
        if descriptors.is_empty() {
            return Vec::new();
        }

        let message = serde_json::to_string(&descriptors).unwrap_or_default();
        let budget = FILL_TOKEN_FLOOR + FILL_TOKENS_PER_FIELD * descriptors.len() as u32;
        let request = CompletionRequest::new(FILL_INSTRUCTION, message)
            .with_history(context)
            .with_response_schema(response_schema())
            .with_max_output_tokens(budget);

        match self.backend.complete(request).await {
            StructuredOutcome::Ok(value) => {
                match serde_json::from_value::<Vec<FilledField>>(value) {
                    Ok(filled) if !filled.is_empty() => {
                        debug!("filled {} fields", filled.len());
                        // Never return more fields than were asked for.
                        let mut filled = filled;
                        filled.truncate(descriptors.len());
                        filled
                    }
                    Ok(_) => {
                        warn!("fill response was empty, returning unfilled descriptors");
                        Self::unfilled(descriptors)
                    }
                    Err(e) => {
                        warn!("fill response did not match schema: {}", e);
                        Self::unfilled(descriptors)
                    }
                }
            }
            StructuredOutcome::Malformed(raw) => {
                warn!("fill returned non-JSON ({} bytes)", raw.len());
                Self::unfilled(descriptors)
            }
            StructuredOutcome::ServiceError(reason) => {
                warn!("fill unavailable: {}", reason);
                Self::unfilled(descriptors)
            }
        }
    }

    fn unfilled(descriptors: Vec<FieldDescriptor>) -> Vec<FilledField> {
        descriptors.into_iter().map(FilledField::unfilled).collect()
    }
}

/// Wrap fill output in the delivery envelope for the platform.
pub fn wrap(platform: Platform, domain: &str, fill_json: Vec<FilledField>) -> FillEnvelope {
    FillEnvelope {
        delivery: platform.delivery(),
        domain: domain.to_string(),
        fill_json,
    }
}

#[cfg(test)]
#[path = "fill_tests.rs"]
mod tests;
