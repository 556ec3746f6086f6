//! Shared application state.

use std::sync::Arc;

use formsense_pipeline::FormPipeline;
use formsense_protocols::store::{DetectionStore, MappingStore};

/// State shared by all handlers.
///
/// The mapping store handle is the same one the pipeline uses; handlers
/// that only need a lookup go through it directly. Detection records
/// live in their own store and never reach the pipeline.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<FormPipeline>,
    pub store: Arc<dyn MappingStore>,
    pub detections: Arc<dyn DetectionStore>,
}

impl AppState {
    pub fn new(
        pipeline: Arc<FormPipeline>,
        store: Arc<dyn MappingStore>,
        detections: Arc<dyn DetectionStore>,
    ) -> Self {
        Self {
            pipeline,
            store,
            detections,
        }
    }
}
