//! Application state for shared services

use std::sync::Arc;

use crate::domain::KeyValueStore;
use crate::infrastructure::observability::MetricsRecorder;
use crate::infrastructure::services::{CacheOrchestrator, SemanticCache};

/// Application state shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<CacheOrchestrator>,
    pub semantic_cache: Arc<SemanticCache>,
    pub metrics: Arc<MetricsRecorder>,
    pub store: Arc<dyn KeyValueStore>,
}

impl AppState {
    pub fn new(
        orchestrator: Arc<CacheOrchestrator>,
        semantic_cache: Arc<SemanticCache>,
        metrics: Arc<MetricsRecorder>,
        store: Arc<dyn KeyValueStore>,
    ) -> Self {
        Self {
            orchestrator,
            semantic_cache,
            metrics,
            store,
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("semantic_enabled", &self.semantic_cache.is_enabled())
            .finish_non_exhaustive()
    }
}
