//! Platform dispatch.
//!
//! A closed set of platform variants resolved once per request, replacing
//! ad-hoc substring checks scattered through the pipeline. Adding a
//! platform means adding a variant here.

use crate::field::FillDelivery;

/// Known form platforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// Typeform serializes its form model as an embedded script object
    /// instead of static form markup.
    Typeform,
    /// Any site with standard form controls.
    Generic,
}

impl Platform {
    /// Resolve the platform for a request domain.
    pub fn resolve(domain: &str) -> Self {
        let domain = domain.to_ascii_lowercase();
        if domain == "typeform.com" || domain.ends_with(".typeform.com") {
            Platform::Typeform
        } else {
            Platform::Generic
        }
    }

    /// Whether the form definition lives in embedded script data rather
    /// than in the sanitized DOM.
    pub fn has_embedded_form(self) -> bool {
        matches!(self, Platform::Typeform)
    }

    /// Delivery mode for filled values on this platform.
    pub fn delivery(self) -> FillDelivery {
        match self {
            // Typeform widgets commit a value on a keystroke.
            Platform::Typeform => FillDelivery::Enter,
            Platform::Generic => FillDelivery::Direct,
        }
    }
}

#[cfg(test)]
#[path = "platform_tests.rs"]
mod tests;
