//! # FormSense Protocols
//!
//! Shared type and trait definitions for the FormSense pipeline.
//! Contains the data model, the completion-service contract, and the
//! persistence trait - no implementations.

pub mod completion;
pub mod detection;
pub mod error;
pub mod field;
pub mod mapping;
pub mod platform;
pub mod store;

pub use completion::{ChatTurn, CompletionBackend, CompletionRequest, StructuredOutcome, TurnRole};
pub use detection::FormDetection;
pub use error::{PipelineError, ProviderError, StoreError};
pub use field::{FieldDescriptor, FillDelivery, FillEnvelope, FilledField};
pub use mapping::{ContainerMapping, FormMapping};
pub use platform::Platform;
pub use store::{DetectionStore, MappingStore};
