//! # FormSense Pipeline
//!
//! Turns a page's DOM into form-field descriptors and filled values.
//!
//! The pipeline composes, in order: HTML sanitization, container-selector
//! inference (completion service with a fixed fallback), field extraction
//! (completion service with a DOM-heuristic fallback), an embedded-JSON
//! extractor for platforms that ship their form model as script data, and
//! value filling. Mapping lookups are cached and persisted per domain so
//! selector inference runs at most once per domain.

pub mod cache;
pub mod detect;
pub mod embedded;
pub mod extract;
pub mod fill;
pub mod heuristics;
pub mod orchestrator;
pub mod sanitize;

#[cfg(test)]
pub(crate) mod testing;

pub use cache::{CacheConfig, TtlCache};
pub use detect::{ContainerDetector, DEFAULT_CONTAINER_SELECTOR};
pub use embedded::{parse_embedded_form, EmbeddedParse};
pub use extract::FieldExtractor;
pub use fill::ValueFiller;
pub use orchestrator::{FormPipeline, FormRequest, PipelineOutput};
pub use sanitize::{sanitize, sanitize_with, SanitizeOptions};
