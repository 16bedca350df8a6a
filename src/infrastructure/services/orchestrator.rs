//! Request-time cache orchestration
//!
//! Exact cache, then semantic cache, then the chat model; fresh answers are
//! written back to both levels.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::domain::cache::{AnswerSource, CacheRecord};
use crate::domain::llm::{ChatCompletion, LlmProvider};
use crate::domain::semantic_cache::usage_metadata;
use crate::domain::DomainError;
use crate::infrastructure::observability::{CacheKind, MetricsRecorder};

use super::exact_cache::ExactCache;
use super::semantic_cache::SemanticCache;

/// Route label used for request metrics
pub const ASK_ROUTE: &str = "/ask";

/// Result of answering a question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub question: String,
    pub answer: String,
    pub source: AnswerSource,
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub cost_usd: f64,
    pub cache_hit: bool,
}

impl Answer {
    fn from_record(question: &str, record: CacheRecord) -> Self {
        Self {
            question: question.to_string(),
            answer: record.answer,
            source: AnswerSource::ExactCache,
            prompt_tokens: record.prompt_tokens,
            completion_tokens: record.completion_tokens,
            cost_usd: record.cost_usd,
            cache_hit: true,
        }
    }

    fn from_completion(question: &str, completion: ChatCompletion) -> Self {
        Self {
            question: question.to_string(),
            answer: completion.answer,
            source: AnswerSource::Llm,
            prompt_tokens: completion.prompt_tokens,
            completion_tokens: completion.completion_tokens,
            cost_usd: completion.cost_usd,
            cache_hit: false,
        }
    }
}

/// Orchestrator settings
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// TTL for exact-cache entries
    pub exact_ttl: Duration,
    /// Upper bound for one chat model call
    pub llm_timeout: Duration,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            exact_ttl: Duration::from_secs(3600),
            llm_timeout: Duration::from_secs(60),
        }
    }
}

impl OrchestratorConfig {
    pub fn with_exact_ttl(mut self, ttl: Duration) -> Self {
        self.exact_ttl = ttl;
        self
    }

    pub fn with_llm_timeout(mut self, timeout: Duration) -> Self {
        self.llm_timeout = timeout;
        self
    }
}

#[derive(Debug)]
pub struct CacheOrchestrator {
    exact: Arc<ExactCache>,
    semantic: Arc<SemanticCache>,
    llm: Arc<dyn LlmProvider>,
    metrics: Arc<MetricsRecorder>,
    config: OrchestratorConfig,
}

impl CacheOrchestrator {
    pub fn new(
        exact: Arc<ExactCache>,
        semantic: Arc<SemanticCache>,
        llm: Arc<dyn LlmProvider>,
        metrics: Arc<MetricsRecorder>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            exact,
            semantic,
            llm,
            metrics,
            config,
        }
    }

    /// Answer a question from cache or the chat model
    pub async fn answer(&self, question: &str) -> Result<Answer, DomainError> {
        if question.trim().is_empty() {
            return Err(DomainError::invalid_input("question must not be empty"));
        }

        let start = Instant::now();
        self.metrics.record_request(ASK_ROUTE);

        let result = self.resolve(question).await;
        self.metrics.observe_latency(ASK_ROUTE, start.elapsed());

        result
    }

    async fn resolve(&self, question: &str) -> Result<Answer, DomainError> {
        if let Some(record) = self.exact.get(question).await {
            self.metrics.record_hit(CacheKind::Exact);
            debug!("Answered from exact cache");
            return Ok(Answer::from_record(question, record));
        }
        self.metrics.record_miss(CacheKind::Exact);

        if self.semantic.is_enabled() {
            let threshold = self.semantic.config().threshold();

            match self.semantic.search_similar(question, threshold).await? {
                Some(matched) => {
                    self.metrics.record_hit(CacheKind::Semantic);
                    debug!(
                        id = matched.id,
                        similarity = matched.similarity,
                        "Answered from semantic cache"
                    );

                    return Ok(Answer {
                        question: question.to_string(),
                        prompt_tokens: matched.prompt_tokens(),
                        completion_tokens: matched.completion_tokens(),
                        cost_usd: matched.cost_usd(),
                        answer: matched.answer,
                        source: AnswerSource::SemanticCache,
                        cache_hit: true,
                    });
                }
                None => self.metrics.record_miss(CacheKind::Semantic),
            }
        }

        let completion = self.call_model(question).await?;
        self.metrics.record_usage(
            completion.prompt_tokens,
            completion.completion_tokens,
            completion.cost_usd,
        );

        info!(
            provider = self.llm.provider_name(),
            model = %self.llm.model(),
            prompt_tokens = completion.prompt_tokens,
            completion_tokens = completion.completion_tokens,
            "Answered by chat model"
        );

        self.exact
            .set(
                question,
                &CacheRecord::from_completion(&completion),
                self.config.exact_ttl,
            )
            .await;

        if self.semantic.is_enabled() {
            let metadata = usage_metadata(
                completion.prompt_tokens,
                completion.completion_tokens,
                completion.cost_usd,
            );

            if let Err(e) = self
                .semantic
                .upsert(question, &completion.answer, metadata)
                .await
            {
                self.metrics.record_semantic_write_failure();
                warn!(error = %e, "Semantic cache write-back failed");
            }
        }

        Ok(Answer::from_completion(question, completion))
    }

    async fn call_model(&self, question: &str) -> Result<ChatCompletion, DomainError> {
        tokio::time::timeout(self.config.llm_timeout, self.llm.chat(question))
            .await
            .map_err(|_| {
                DomainError::model_provider(
                    self.llm.provider_name(),
                    format!("Chat completion timed out after {:?}", self.config.llm_timeout),
                )
            })?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::embedding::MockEmbeddingProvider;
    use crate::domain::llm::MockLlmProvider;
    use crate::domain::semantic_cache::SemanticCacheConfig;
    use crate::domain::store::{KeyValueStore, MockStore};
    use crate::infrastructure::store::InMemoryStore;

    struct Harness {
        orchestrator: CacheOrchestrator,
        semantic: Arc<SemanticCache>,
        llm: Arc<MockLlmProvider>,
        metrics: Arc<MetricsRecorder>,
    }

    fn harness(
        store: Arc<dyn KeyValueStore>,
        embedder: MockEmbeddingProvider,
        semantic_config: SemanticCacheConfig,
        llm: MockLlmProvider,
    ) -> Harness {
        let exact = Arc::new(ExactCache::new(store.clone()));
        let semantic = Arc::new(SemanticCache::new(store, Arc::new(embedder), semantic_config));
        let llm = Arc::new(llm);
        let metrics = Arc::new(MetricsRecorder::new("test").unwrap());

        let orchestrator = CacheOrchestrator::new(
            exact,
            semantic.clone(),
            llm.clone(),
            metrics.clone(),
            OrchestratorConfig::default(),
        );

        Harness {
            orchestrator,
            semantic,
            llm,
            metrics,
        }
    }

    fn default_harness() -> Harness {
        harness(
            Arc::new(InMemoryStore::new()),
            MockEmbeddingProvider::new(8),
            SemanticCacheConfig::new().with_dimension(8),
            MockLlmProvider::new(),
        )
    }

    #[tokio::test]
    async fn test_first_call_hits_model_then_exact_cache() {
        let h = default_harness();

        let first = h.orchestrator.answer("What is Redis?").await.unwrap();
        assert_eq!(first.source, AnswerSource::Llm);
        assert!(!first.cache_hit);
        assert_eq!(first.answer, "[fake answer] What is Redis?");
        assert_eq!(first.prompt_tokens, 4);
        assert_eq!(first.completion_tokens, 8);

        let second = h.orchestrator.answer("What is Redis?").await.unwrap();
        assert_eq!(second.source, AnswerSource::ExactCache);
        assert!(second.cache_hit);
        assert_eq!(second.answer, first.answer);
        assert_eq!(second.prompt_tokens, first.prompt_tokens);
        assert!((second.cost_usd - first.cost_usd).abs() < 1e-12);

        assert_eq!(h.llm.calls(), 1);
    }

    #[tokio::test]
    async fn test_semantic_hit_on_different_wording() {
        let h = harness(
            Arc::new(InMemoryStore::new()),
            MockEmbeddingProvider::new(8).with_fixed(vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8]),
            SemanticCacheConfig::new()
                .with_dimension(8)
                .with_similarity_threshold(0.0),
            MockLlmProvider::new(),
        );

        h.semantic
            .upsert("什麼是快取？", "快取是把結果暫存起來重複使用。", usage_metadata(5, 7, 0.0))
            .await
            .unwrap();

        let answer = h.orchestrator.answer("請解釋快取是什麼").await.unwrap();

        assert_eq!(answer.source, AnswerSource::SemanticCache);
        assert!(answer.cache_hit);
        assert_eq!(answer.answer, "快取是把結果暫存起來重複使用。");
        assert_eq!(answer.prompt_tokens, 5);
        assert_eq!(answer.completion_tokens, 7);
        assert_eq!(h.llm.calls(), 0);
    }

    #[tokio::test]
    async fn test_metrics_after_repeated_question() {
        let h = default_harness();

        h.orchestrator.answer("What is Redis?").await.unwrap();
        h.orchestrator.answer("What is Redis?").await.unwrap();

        let summary = h.metrics.summary();
        assert_eq!(summary.requests, 2);
        assert_eq!(summary.cache_hits.exact, 1);
        assert_eq!(summary.cache_miss.exact, 1);
        assert_eq!(summary.cache_miss.semantic, 1);
        assert_eq!(summary.tokens_prompt, 4);
        assert_eq!(summary.tokens_completion, 8);
    }

    #[tokio::test]
    async fn test_store_outage_falls_through_to_model() {
        let h = harness(
            Arc::new(MockStore::new().with_error("connection refused")),
            MockEmbeddingProvider::new(8),
            SemanticCacheConfig::new().with_dimension(8).with_enabled(false),
            MockLlmProvider::new(),
        );

        let answer = h.orchestrator.answer("What is Redis?").await.unwrap();

        assert_eq!(answer.source, AnswerSource::Llm);
        assert_eq!(h.llm.calls(), 1);
        assert_eq!(h.metrics.summary().cache_miss.exact, 1);
        assert_eq!(h.metrics.summary().cache_miss.semantic, 0);
    }

    #[tokio::test]
    async fn test_semantic_store_outage_is_request_error() {
        let h = harness(
            Arc::new(MockStore::new().with_error("connection refused")),
            MockEmbeddingProvider::new(8),
            SemanticCacheConfig::new().with_dimension(8),
            MockLlmProvider::new(),
        );

        let result = h.orchestrator.answer("What is Redis?").await;

        assert!(matches!(result, Err(DomainError::StoreUnavailable { .. })));
        assert_eq!(h.llm.calls(), 0);
    }

    #[tokio::test]
    async fn test_empty_question_rejected_before_lookup() {
        let h = default_harness();

        for question in ["", "   ", "\n\t"] {
            let result = h.orchestrator.answer(question).await;
            assert!(matches!(result, Err(DomainError::InvalidInput { .. })));
        }

        assert_eq!(h.metrics.summary().requests, 0);
        assert_eq!(h.llm.calls(), 0);
    }

    #[tokio::test]
    async fn test_model_error_propagates_and_caches_nothing() {
        let h = harness(
            Arc::new(InMemoryStore::new()),
            MockEmbeddingProvider::new(8),
            SemanticCacheConfig::new().with_dimension(8),
            MockLlmProvider::new().with_error("upstream 500"),
        );

        let result = h.orchestrator.answer("What is Redis?").await;

        assert!(matches!(result, Err(DomainError::ModelProvider { .. })));
        assert_eq!(h.semantic.size().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_semantic_write_back_failure_still_answers() {
        let embedder = Arc::new(MockEmbeddingProvider::new(8));
        let store: Arc<dyn KeyValueStore> = Arc::new(InMemoryStore::new());
        let semantic = Arc::new(SemanticCache::new(
            store.clone(),
            embedder.clone(),
            SemanticCacheConfig::new().with_dimension(8),
        ));
        let llm = Arc::new(MockLlmProvider::new());
        let metrics = Arc::new(MetricsRecorder::new("test").unwrap());
        let orchestrator = CacheOrchestrator::new(
            Arc::new(ExactCache::new(store)),
            semantic.clone(),
            llm.clone(),
            metrics.clone(),
            OrchestratorConfig::default(),
        );

        // Empty index: the search never embeds, so only the write-back fails
        embedder.set_error(Some("embedding down".to_string()));

        let answer = orchestrator.answer("What is Redis?").await.unwrap();
        assert_eq!(answer.source, AnswerSource::Llm);
        assert_eq!(semantic.size().await.unwrap(), 0);
        assert_eq!(metrics.summary().semantic_write_failures, 1);

        // Exact cache was still written
        let again = orchestrator.answer("What is Redis?").await.unwrap();
        assert_eq!(again.source, AnswerSource::ExactCache);
        assert_eq!(llm.calls(), 1);
    }

    #[tokio::test]
    async fn test_model_answer_written_to_semantic_cache() {
        let h = default_harness();

        h.orchestrator.answer("What is Redis?").await.unwrap();

        assert_eq!(h.semantic.size().await.unwrap(), 1);
        let found = h
            .semantic
            .search_similar("What is Redis?", 0.99)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.answer, "[fake answer] What is Redis?");
        assert_eq!(found.prompt_tokens(), 4);
        assert!((found.cost_usd() - 0.0005).abs() < 1e-12);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_identical_misses_both_call_model() {
        let h = harness(
            Arc::new(InMemoryStore::new()),
            MockEmbeddingProvider::new(8),
            SemanticCacheConfig::new().with_dimension(8),
            MockLlmProvider::new().with_delay(Duration::from_millis(100)),
        );
        let orchestrator = Arc::new(h.orchestrator);

        let first = tokio::spawn({
            let orchestrator = orchestrator.clone();
            async move { orchestrator.answer("What is Redis?").await }
        });
        let second = tokio::spawn({
            let orchestrator = orchestrator.clone();
            async move { orchestrator.answer("What is Redis?").await }
        });

        let first = first.await.unwrap().unwrap();
        let second = second.await.unwrap().unwrap();

        assert_eq!(first.source, AnswerSource::Llm);
        assert_eq!(second.source, AnswerSource::Llm);
        assert_eq!(first.answer, second.answer);
        assert_eq!(h.llm.calls(), 2);
        assert_eq!(h.semantic.size().await.unwrap(), 2);
        assert_eq!(h.metrics.summary().cache_miss.exact, 2);
    }
}
