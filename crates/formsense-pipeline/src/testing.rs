//! Test support: a scripted completion backend and an in-memory store.

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use parking_lot::Mutex;

use formsense_protocols::completion::{CompletionBackend, CompletionRequest, StructuredOutcome};
use formsense_protocols::error::StoreError;
use formsense_protocols::mapping::FormMapping;
use formsense_protocols::store::MappingStore;

/// Completion backend that replays a fixed sequence of outcomes and
/// records the requests it received.
pub(crate) struct StubBackend {
    outcomes: Mutex<VecDeque<StructuredOutcome>>,
    pub requests: Mutex<Vec<CompletionRequest>>,
}

impl StubBackend {
    pub fn new(outcomes: Vec<StructuredOutcome>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait]
impl CompletionBackend for StubBackend {
    async fn complete(&self, request: CompletionRequest) -> StructuredOutcome {
        self.requests.lock().push(request);
        self.outcomes
            .lock()
            .pop_front()
            .unwrap_or_else(|| StructuredOutcome::ServiceError("stub exhausted".to_string()))
    }
}

/// Mapping store over a plain map, with an optional always-fail mode.
pub(crate) struct StubStore {
    records: Mutex<HashMap<String, FormMapping>>,
    fail: bool,
}

impl StubStore {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
            fail: true,
        }
    }

    pub fn insert(&self, mapping: FormMapping) {
        self.records.lock().insert(mapping.domain.clone(), mapping);
    }

    pub fn get(&self, domain: &str) -> Option<FormMapping> {
        self.records.lock().get(domain).cloned()
    }
}

#[async_trait]
impl MappingStore for StubStore {
    async fn find(&self, domain: &str) -> Result<Option<FormMapping>, StoreError> {
        if self.fail {
            return Err(StoreError::Connection("stub store offline".to_string()));
        }
        Ok(self.records.lock().get(domain).cloned())
    }

    async fn save(&self, mapping: FormMapping) -> Result<FormMapping, StoreError> {
        if self.fail {
            return Err(StoreError::Connection("stub store offline".to_string()));
        }
        let mut records = self.records.lock();
        Ok(records
            .entry(mapping.domain.clone())
            .or_insert(mapping)
            .clone())
    }
}
