use std::sync::Arc;

use super::offline::OfflineEmbeddingProvider;
use super::openai::OpenAiEmbeddingProvider;
use super::HttpClient;
use crate::domain::embedding::EmbeddingProvider;
use crate::domain::semantic_cache::SemanticCacheConfig;
use crate::domain::DomainError;
use crate::infrastructure::llm::{LlmProviderConfig, ProviderKind};

/// Factory for creating embedding providers
#[derive(Debug)]
pub struct EmbeddingProviderFactory;

impl EmbeddingProviderFactory {
    /// Create an embedder sharing the chat provider's credentials and endpoint
    pub fn create(
        llm: &LlmProviderConfig,
        semantic: &SemanticCacheConfig,
    ) -> Result<Arc<dyn EmbeddingProvider>, DomainError> {
        match llm.resolved_provider()? {
            ProviderKind::OpenAi => {
                let client = HttpClient::with_timeout(llm.timeout())?;
                let provider = OpenAiEmbeddingProvider::with_base_url(
                    client,
                    llm.api_key().unwrap_or_default(),
                    &semantic.embedding_model,
                    llm.base_url(),
                );

                Ok(Arc::new(provider))
            }
            _ => Ok(Arc::new(OfflineEmbeddingProvider::new(
                semantic.dimension,
                &semantic.embedding_model,
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offline_without_key() {
        let embedder = EmbeddingProviderFactory::create(
            &LlmProviderConfig::default(),
            &SemanticCacheConfig::default(),
        )
        .unwrap();

        assert_eq!(embedder.provider_name(), "offline");
        assert_eq!(embedder.model(), "text-embedding-3-small");
    }

    #[test]
    fn test_openai_with_key() {
        let llm = LlmProviderConfig {
            api_key: Some("sk-test".to_string()),
            ..Default::default()
        };
        let semantic = SemanticCacheConfig::default().with_embedding_model("text-embedding-3-large");

        let embedder = EmbeddingProviderFactory::create(&llm, &semantic).unwrap();

        assert_eq!(embedder.provider_name(), "openai");
        assert_eq!(embedder.model(), "text-embedding-3-large");
    }
}
