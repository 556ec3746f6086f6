//! # FormSense Store
//!
//! Persistence backends behind the
//! [`MappingStore`](formsense_protocols::store::MappingStore) and
//! [`DetectionStore`](formsense_protocols::store::DetectionStore)
//! traits: in-memory maps for tests and single-process deployments,
//! and SQLite backends for durable per-domain records.

pub mod memory;
pub mod schema;
pub mod sqlite;

pub use memory::{MemoryDetectionStore, MemoryMappingStore};
pub use sqlite::{SqliteDetectionStore, SqliteMappingStore};
