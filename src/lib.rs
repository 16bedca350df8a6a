//! Answer cache
//!
//! A two-level cache in front of a chat model:
//! - Exact cache keyed by a SHA-256 of the question, with a TTL
//! - Semantic cache matching paraphrases by cosine similarity of embeddings
//! - Prometheus and JSON metrics for hits, misses, tokens and cost

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use tracing::info;

use api::state::AppState;
use infrastructure::embedding::EmbeddingProviderFactory;
use infrastructure::llm::LlmProviderFactory;
use infrastructure::observability::MetricsRecorder;
use infrastructure::services::{CacheOrchestrator, ExactCache, OrchestratorConfig, SemanticCache};
use infrastructure::store::StoreFactory;

/// Wire the store, providers, caches and metrics from configuration
pub async fn build_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let store_config = config.store.store_config()?;
    info!("Store backend: {}", store_config.store_type);
    let store = StoreFactory::new().create(&store_config).await?;

    let llm = LlmProviderFactory::create(&config.llm)?;
    let embedder = EmbeddingProviderFactory::create(&config.llm, &config.semantic_cache)?;
    info!(
        provider = llm.provider_name(),
        model = llm.model(),
        embedding_model = embedder.model(),
        "Providers configured"
    );

    let metrics = Arc::new(MetricsRecorder::new(&config.metrics.namespace)?);

    let exact = Arc::new(
        ExactCache::new(store.clone()).with_namespace(config.exact_cache.namespace.clone()),
    );
    let semantic = Arc::new(
        SemanticCache::new(store.clone(), embedder, config.semantic_cache.clone())
            .with_embed_timeout(config.llm.timeout()),
    );

    let orchestrator_config = OrchestratorConfig::default()
        .with_exact_ttl(config.exact_cache.ttl())
        .with_llm_timeout(config.llm.timeout());
    let orchestrator = Arc::new(CacheOrchestrator::new(
        exact,
        semantic.clone(),
        llm,
        metrics.clone(),
        orchestrator_config,
    ));

    Ok(AppState::new(orchestrator, semantic, metrics, store))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AnswerSource;

    #[tokio::test]
    async fn test_default_config_builds_offline_state() {
        let state = build_app_state(&AppConfig::default()).await.unwrap();

        assert!(state.semantic_cache.is_enabled());
        state.store.ping().await.unwrap();

        let answer = state.orchestrator.answer("What is Redis?").await.unwrap();
        assert_eq!(answer.source, AnswerSource::Llm);
        assert!(answer.answer.starts_with("(mock) You asked: What is Redis?"));
        assert_eq!(answer.cost_usd, 0.0);

        let again = state.orchestrator.answer("What is Redis?").await.unwrap();
        assert_eq!(again.source, AnswerSource::ExactCache);
        assert_eq!(state.metrics.summary().requests, 2);
    }

    #[tokio::test]
    async fn test_unreachable_redis_still_builds_and_answers() {
        let mut config = AppConfig::default();
        config.store.redis_url = Some("redis://127.0.0.1:1/0".to_string());
        config.store.connect_timeout_secs = 1;
        config.semantic_cache.enabled = false;

        let state = build_app_state(&config).await.unwrap();
        assert!(state.store.ping().await.is_err());

        let answer = state.orchestrator.answer("What is Redis?").await.unwrap();
        assert_eq!(answer.source, AnswerSource::Llm);
    }

    #[tokio::test]
    async fn test_invalid_store_backend_fails() {
        let mut config = AppConfig::default();
        config.store.backend = Some("memcached".to_string());

        assert!(build_app_state(&config).await.is_err());
    }

    #[tokio::test]
    async fn test_openai_without_key_fails() {
        let mut config = AppConfig::default();
        config.llm.provider = crate::infrastructure::llm::ProviderKind::OpenAi;

        assert!(build_app_state(&config).await.is_err());
    }
}
