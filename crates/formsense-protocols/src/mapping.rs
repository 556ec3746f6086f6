//! Persisted per-domain form mapping.

use serde::{Deserialize, Serialize};

/// Selector mapping produced by container inference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerMapping {
    /// Selector matching every repeated label/input block of the form.
    pub container_selector: String,
}

/// One record per domain, created on first successful selector inference.
///
/// Immutable after creation except for `verified`, which is maintained
/// outside the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormMapping {
    pub domain: String,
    pub mapping: ContainerMapping,
    pub parent_container: String,
    #[serde(default)]
    pub verified: bool,
}

impl FormMapping {
    /// Build the record persisted after a first-time detection.
    pub fn detected(domain: impl Into<String>, container_selector: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            mapping: ContainerMapping {
                container_selector: container_selector.into(),
            },
            parent_container: "form".to_string(),
            verified: false,
        }
    }
}
