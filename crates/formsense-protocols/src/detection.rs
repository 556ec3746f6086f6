//! Persisted per-domain detection record.

use serde::{Deserialize, Serialize};

/// One detection record per domain, written by the crawler-facing
/// surface rather than the pipeline. `form: false` marks the domain as
/// a known false positive so clients stop offering autofill there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormDetection {
    /// URL the detection was made on.
    pub url: String,
    /// Whether the form is served by a known platform provider.
    pub provider: bool,
    pub domain: String,
    /// Selector of the iframe hosting the form, empty when top-level.
    pub iframe: String,
    pub form: bool,
}

impl FormDetection {
    /// Build a top-level detection for a URL.
    pub fn new(url: impl Into<String>, domain: impl Into<String>, form: bool) -> Self {
        Self {
            url: url.into(),
            provider: false,
            domain: domain.into(),
            iframe: String::new(),
            form,
        }
    }
}
