//! Infrastructure services - the two cache levels and their orchestration

mod exact_cache;
mod orchestrator;
mod semantic_cache;

pub use exact_cache::{ExactCache, DEFAULT_EXACT_NAMESPACE};
pub use orchestrator::{Answer, CacheOrchestrator, OrchestratorConfig, ASK_ROUTE};
pub use semantic_cache::{SemanticCache, DEFAULT_EMBED_TIMEOUT};
