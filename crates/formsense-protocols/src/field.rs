//! Form field descriptors and fill output shapes.

use serde::{Deserialize, Serialize};

/// One form input identified on a page: a CSS selector that resolves to a
/// single input-capable element, and the human-readable question text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    pub input_selector: String,
    /// Question text for the field. Empty only as a last resort.
    #[serde(default)]
    pub label: String,
}

impl FieldDescriptor {
    pub fn new(input_selector: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            input_selector: input_selector.into(),
            label: label.into(),
        }
    }
}

/// A field descriptor annotated with a filled value.
///
/// `value` is absent when the filler could not produce one; serialization
/// drops the key entirely so downstream consumers see the bare descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilledField {
    pub input_selector: String,
    #[serde(default)]
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl FilledField {
    /// Wrap a descriptor without a value.
    pub fn unfilled(descriptor: FieldDescriptor) -> Self {
        Self {
            input_selector: descriptor.input_selector,
            label: descriptor.label,
            value: None,
        }
    }
}

/// How the caller should apply filled values to the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillDelivery {
    /// Assign values directly to the DOM elements.
    Direct,
    /// Type the value and commit with a simulated Enter keystroke.
    Enter,
}

/// Tagged envelope returned to the caller after extraction and filling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FillEnvelope {
    #[serde(rename = "type")]
    pub delivery: FillDelivery,
    pub domain: String,
    #[serde(rename = "fillJSON")]
    pub fill_json: Vec<FilledField>,
}

#[cfg(test)]
#[path = "field_tests.rs"]
mod tests;
