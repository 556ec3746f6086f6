//! # FormSense Provider - Gemini
//!
//! Google Gemini completion backend with structured (schema-constrained)
//! JSON output.

mod backend;
mod client;
mod types;

pub use backend::GeminiBackend;
pub use types::*;
