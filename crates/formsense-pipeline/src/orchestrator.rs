//! Pipeline orchestration.
//!
//! One entry point per form request. The orchestrator resolves the
//! platform, obtains field descriptors through the cheapest path that
//! works (embedded payload, persisted mapping, fresh inference), fills
//! them from caller context and wraps the result in a delivery envelope.
//! Selector inference runs at most once per domain; the inferred mapping
//! is persisted and cached for every later request.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use formsense_protocols::completion::{ChatTurn, CompletionBackend};
use formsense_protocols::error::PipelineError;
use formsense_protocols::field::{FillEnvelope, FilledField};
use formsense_protocols::mapping::FormMapping;
use formsense_protocols::platform::Platform;
use formsense_protocols::store::MappingStore;

use crate::cache::{CacheConfig, TtlCache};
use crate::detect::ContainerDetector;
use crate::embedded;
use crate::extract::FieldExtractor;
use crate::fill::{self, ValueFiller};
use crate::sanitize::{sanitize_with, SanitizeOptions};

/// One form request.
#[derive(Debug, Clone)]
pub struct FormRequest {
    pub domain: String,
    /// Raw page HTML. Absent means a mapping-only lookup.
    pub dom: Option<String>,
    pub user_prompt: Option<String>,
    pub custom_command: Option<String>,
}

/// What a request resolves to.
///
/// Serializes untagged: a mapping-only lookup returns the bare record, a
/// request with a DOM returns the fill envelope.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum PipelineOutput {
    Mapping(FormMapping),
    Fill(FillEnvelope),
}

/// End-to-end form pipeline.
pub struct FormPipeline {
    detector: ContainerDetector,
    extractor: FieldExtractor,
    filler: ValueFiller,
    store: Arc<dyn MappingStore>,
    mapping_cache: TtlCache<String, FormMapping>,
    sanitize_options: SanitizeOptions,
}

impl FormPipeline {
    pub fn new(
        backend: Arc<dyn CompletionBackend>,
        store: Arc<dyn MappingStore>,
        cache_config: CacheConfig,
    ) -> Self {
        Self {
            detector: ContainerDetector::new(backend.clone()),
            extractor: FieldExtractor::new(backend.clone()),
            filler: ValueFiller::new(backend),
            store,
            mapping_cache: TtlCache::new(cache_config),
            sanitize_options: SanitizeOptions { strip_head: true },
        }
    }

    /// Process one form request.
    ///
    /// Without a DOM this is a mapping lookup: the persisted record or
    /// [`PipelineError::MappingNotFound`]. With a DOM, descriptors are
    /// obtained (embedded payload first on platforms that carry one, then
    /// extraction under the domain's container selector), filled from the
    /// request context and returned as an envelope. Zero descriptors from
    /// every path is [`PipelineError::ExtractionEmpty`].
    pub async fn process(&self, request: FormRequest) -> Result<PipelineOutput, PipelineError> {
        let domain = request.domain.trim().to_string();
        let platform = Platform::resolve(&domain);
        let context = context_turns(&request);

        let Some(dom) = request.dom.filter(|dom| !dom.trim().is_empty()) else {
            return match self.lookup_mapping(&domain).await {
                Some(mapping) => Ok(PipelineOutput::Mapping(mapping)),
                None => Err(PipelineError::MappingNotFound(domain)),
            };
        };

        let mut descriptors = if platform.has_embedded_form() {
            embedded::extract_embedded_fields(&dom)
        } else {
            Vec::new()
        };

        if descriptors.is_empty() {
            if platform.has_embedded_form() {
                debug!("no embedded fields for {}, using generic extraction", domain);
            }
            let sanitized = sanitize_with(&dom, &self.sanitize_options);
            let selector = match self.lookup_mapping(&domain).await {
                Some(mapping) => mapping.mapping.container_selector,
                None => self.detect_and_persist(&domain, &sanitized).await,
            };
            descriptors = self.extractor.extract(&sanitized, &selector).await;
        }

        if descriptors.is_empty() {
            return Err(PipelineError::ExtractionEmpty(domain));
        }

        let filled = if context.is_empty() {
            descriptors.into_iter().map(FilledField::unfilled).collect()
        } else {
            self.filler.fill(descriptors, context).await
        };

        Ok(PipelineOutput::Fill(fill::wrap(platform, &domain, filled)))
    }

    /// Cached then persisted mapping lookup. Store failures degrade to a
    /// miss; the request proceeds with fresh inference.
    async fn lookup_mapping(&self, domain: &str) -> Option<FormMapping> {
        if let Some(mapping) = self.mapping_cache.get(&domain.to_string()) {
            debug!("mapping cache hit for {}", domain);
            return Some(mapping);
        }
        match self.store.find(domain).await {
            Ok(Some(mapping)) => {
                self.mapping_cache.set(domain.to_string(), mapping.clone());
                Some(mapping)
            }
            Ok(None) => None,
            Err(e) => {
                warn!("mapping lookup failed for {}: {}", domain, e);
                None
            }
        }
    }

    /// Run selector inference once and persist the result. The store's
    /// find-or-insert keeps a concurrent first request from clobbering an
    /// earlier record; whatever it returns is what gets cached and used.
    async fn detect_and_persist(&self, domain: &str, sanitized: &str) -> String {
        let selector = self.detector.detect(sanitized).await;
        match self.store.save(FormMapping::detected(domain, selector.clone())).await {
            Ok(saved) => {
                self.mapping_cache.set(domain.to_string(), saved.clone());
                saved.mapping.container_selector
            }
            Err(e) => {
                warn!("could not persist mapping for {}: {}", domain, e);
                selector
            }
        }
    }
}

/// Collect the caller-supplied context into ordered user turns.
fn context_turns(request: &FormRequest) -> Vec<ChatTurn> {
    [&request.user_prompt, &request.custom_command]
        .into_iter()
        .filter_map(|text| text.as_deref())
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(ChatTurn::user)
        .collect()
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
