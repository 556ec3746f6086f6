//! Persistence traits.

use async_trait::async_trait;

use crate::detection::FormDetection;
use crate::error::StoreError;
use crate::mapping::FormMapping;

/// Persistence for per-domain form mappings.
///
/// `save` has find-or-insert semantics keyed by domain: when a record for
/// the domain already exists it is returned unchanged and the new one is
/// discarded. Concurrent first-time saves for the same domain must not
/// create duplicates; backends enforce this atomically.
#[async_trait]
pub trait MappingStore: Send + Sync {
    /// Look up the mapping for a domain.
    async fn find(&self, domain: &str) -> Result<Option<FormMapping>, StoreError>;

    /// Insert the mapping unless one already exists for its domain, and
    /// return the persisted record either way.
    async fn save(&self, mapping: FormMapping) -> Result<FormMapping, StoreError>;
}

/// Persistence for per-domain detection records.
///
/// Unlike mappings, `save` upserts: a later record for the same domain
/// replaces the stored one, so a false-positive verdict can be revised.
#[async_trait]
pub trait DetectionStore: Send + Sync {
    /// Look up the detection record for a domain.
    async fn find(&self, domain: &str) -> Result<Option<FormDetection>, StoreError>;

    /// Insert or replace the record for the detection's domain.
    async fn save(&self, detection: FormDetection) -> Result<FormDetection, StoreError>;
}
