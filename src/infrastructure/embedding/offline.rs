use async_trait::async_trait;

use crate::domain::embedding::EmbeddingProvider;
use crate::domain::DomainError;

/// Embedder used when no API key is configured
///
/// Returns a zero vector, which never reaches a positive similarity
/// threshold, so the semantic cache cannot produce false hits offline.
#[derive(Debug, Clone)]
pub struct OfflineEmbeddingProvider {
    dimension: usize,
    model: String,
}

impl OfflineEmbeddingProvider {
    pub fn new(dimension: usize, model: impl Into<String>) -> Self {
        Self {
            dimension,
            model: model.into(),
        }
    }
}

#[async_trait]
impl EmbeddingProvider for OfflineEmbeddingProvider {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>, DomainError> {
        Ok(vec![0.0; self.dimension])
    }

    fn provider_name(&self) -> &'static str {
        "offline"
    }

    fn model(&self) -> &str {
        &self.model
    }
}
