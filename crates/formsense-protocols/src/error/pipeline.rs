//! Pipeline errors.
//!
//! Completion-service failures are absorbed in-stage by fallbacks and
//! never appear here. The variants below are the only request-fatal
//! conditions.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// No persisted mapping and no DOM supplied; nothing to work with.
    #[error("No form mapping found for domain: {0}")]
    MappingNotFound(String),

    /// Every extraction path yielded zero descriptors.
    #[error("No form fields could be extracted for domain: {0}")]
    ExtractionEmpty(String),

    /// Any other internal failure.
    #[error("Internal error: {0}")]
    Internal(String),
}
