//! In-memory stores.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use formsense_protocols::detection::FormDetection;
use formsense_protocols::error::StoreError;
use formsense_protocols::mapping::FormMapping;
use formsense_protocols::store::{DetectionStore, MappingStore};

/// Mapping store over a process-local map. Nothing survives a restart;
/// useful for tests and deployments that can re-infer on boot.
#[derive(Default)]
pub struct MemoryMappingStore {
    records: RwLock<HashMap<String, FormMapping>>,
}

impl MemoryMappingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MappingStore for MemoryMappingStore {
    async fn find(&self, domain: &str) -> Result<Option<FormMapping>, StoreError> {
        Ok(self.records.read().await.get(domain).cloned())
    }

    async fn save(&self, mapping: FormMapping) -> Result<FormMapping, StoreError> {
        let mut records = self.records.write().await;
        // The write guard spans check and insert, so concurrent
        // first-time saves serialize on the same entry.
        Ok(records
            .entry(mapping.domain.clone())
            .or_insert(mapping)
            .clone())
    }
}

/// Detection store over a process-local map.
#[derive(Default)]
pub struct MemoryDetectionStore {
    records: RwLock<HashMap<String, FormDetection>>,
}

impl MemoryDetectionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DetectionStore for MemoryDetectionStore {
    async fn find(&self, domain: &str) -> Result<Option<FormDetection>, StoreError> {
        Ok(self.records.read().await.get(domain).cloned())
    }

    async fn save(&self, detection: FormDetection) -> Result<FormDetection, StoreError> {
        let mut records = self.records.write().await;
        records.insert(detection.domain.clone(), detection.clone());
        Ok(detection)
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
