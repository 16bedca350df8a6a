//! Semantic answer cache
//!
//! Stores question/answer pairs with a unit-length embedding and answers
//! lookups by linear cosine scan. Layout in the key-value store:
//!
//! - `{ns}:item:{id}` hash with fields `q`, `a`, `v`, `m`
//! - `{ns}:ids` set of live item ids
//! - `{ns}:next_id` id counter

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::domain::embedding::{coerce_dimension, cosine_similarity, l2_normalize, EmbeddingProvider};
use crate::domain::semantic_cache::{Metadata, SemanticCacheConfig, SemanticItem, SemanticMatch};
use crate::domain::store::KeyValueStore;
use crate::domain::DomainError;

/// Default bound for a single embedding call
pub const DEFAULT_EMBED_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug)]
pub struct SemanticCache {
    store: Arc<dyn KeyValueStore>,
    embedder: Arc<dyn EmbeddingProvider>,
    config: SemanticCacheConfig,
    embed_timeout: Duration,
}

impl SemanticCache {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        embedder: Arc<dyn EmbeddingProvider>,
        config: SemanticCacheConfig,
    ) -> Self {
        Self {
            store,
            embedder,
            config,
            embed_timeout: DEFAULT_EMBED_TIMEOUT,
        }
    }

    /// Set the embedding call timeout
    pub fn with_embed_timeout(mut self, timeout: Duration) -> Self {
        self.embed_timeout = timeout;
        self
    }

    pub fn config(&self) -> &SemanticCacheConfig {
        &self.config
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    fn item_key(&self, id: i64) -> String {
        format!("{}:item:{}", self.config.namespace, id)
    }

    fn ids_key(&self) -> String {
        format!("{}:ids", self.config.namespace)
    }

    fn next_id_key(&self) -> String {
        format!("{}:next_id", self.config.namespace)
    }

    /// Embeds `text`, coerces it to the configured dimension and normalizes it
    async fn embed(&self, text: &str) -> Result<Vec<f32>, DomainError> {
        let mut vector = tokio::time::timeout(self.embed_timeout, self.embedder.embed(text))
            .await
            .map_err(|_| {
                DomainError::embedding_provider(
                    self.embedder.provider_name(),
                    format!("Embedding timed out after {:?}", self.embed_timeout),
                )
            })??;

        let original_len = coerce_dimension(&mut vector, self.config.dimension);
        if original_len != self.config.dimension {
            warn!(
                model = %self.embedder.model(),
                expected = self.config.dimension,
                actual = original_len,
                "Embedding dimension mismatch, vector was padded or truncated"
            );
        }

        l2_normalize(&mut vector);
        Ok(vector)
    }

    /// Appends a question/answer pair and returns its id
    ///
    /// No deduplication: the same question inserted twice yields two items.
    pub async fn upsert(
        &self,
        question: &str,
        answer: &str,
        metadata: Metadata,
    ) -> Result<i64, DomainError> {
        let vector = self.embed(question).await?;
        let id = self.store.incr(&self.next_id_key()).await?;

        let item = SemanticItem {
            id,
            question: question.to_string(),
            answer: answer.to_string(),
            vector,
            metadata,
        };

        let fields = item.to_fields()?;
        let borrowed: Vec<(&str, &str)> = fields
            .iter()
            .map(|(field, value)| (*field, value.as_str()))
            .collect();

        // Item first, then the index entry, so a listed id always has data
        self.store.hash_set(&self.item_key(id), &borrowed).await?;
        self.store.set_add(&self.ids_key(), &id.to_string()).await?;

        debug!(id, namespace = %self.config.namespace, "Semantic cache item stored");
        Ok(id)
    }

    /// Finds the most similar stored item, if it reaches `threshold`
    ///
    /// Ids are scanned in ascending order and only a strictly greater score
    /// replaces the current best, so the lowest id wins ties.
    pub async fn search_similar(
        &self,
        query: &str,
        threshold: f32,
    ) -> Result<Option<SemanticMatch>, DomainError> {
        let members = self.store.set_members(&self.ids_key()).await?;
        if members.is_empty() {
            return Ok(None);
        }

        let query_vector = self.embed(query).await?;

        let mut ids: Vec<i64> = members
            .iter()
            .filter_map(|member| match member.parse::<i64>() {
                Ok(id) => Some(id),
                Err(_) => {
                    warn!(member = %member, "Ignoring non-numeric semantic cache id");
                    None
                }
            })
            .collect();
        ids.sort_unstable();

        let mut best: Option<(SemanticItem, f32)> = None;

        for id in ids {
            let fields = self.store.hash_get_all(&self.item_key(id)).await?;

            let item = match SemanticItem::from_fields(id, &fields) {
                Ok(Some(item)) => item,
                Ok(None) => continue,
                Err(e) => {
                    warn!(id, error = %e, "Skipping unreadable semantic cache item");
                    continue;
                }
            };

            let similarity = cosine_similarity(&query_vector, &item.vector);

            let replaces = match &best {
                Some((_, best_similarity)) => similarity > *best_similarity,
                None => true,
            };
            if replaces {
                best = Some((item, similarity));
            }
        }

        let threshold = threshold.clamp(0.0, 1.0);

        match best {
            Some((item, similarity)) if similarity >= threshold => {
                debug!(id = item.id, similarity, "Semantic cache hit");
                Ok(Some(SemanticMatch::new(item, similarity)))
            }
            Some((item, similarity)) => {
                debug!(id = item.id, similarity, threshold, "Best semantic match below threshold");
                Ok(None)
            }
            None => Ok(None),
        }
    }

    /// Number of live items
    pub async fn size(&self) -> Result<usize, DomainError> {
        self.store.set_card(&self.ids_key()).await
    }

    /// Removes every item, the index and the id counter; returns how many items were removed
    pub async fn clear(&self) -> Result<usize, DomainError> {
        let members = self.store.set_members(&self.ids_key()).await?;
        let mut removed = 0;

        for member in &members {
            let key = format!("{}:item:{}", self.config.namespace, member);
            if self.store.delete(&key).await? {
                removed += 1;
            }
        }

        self.store.delete(&self.ids_key()).await?;
        self.store.delete(&self.next_id_key()).await?;

        debug!(removed, namespace = %self.config.namespace, "Semantic cache cleared");
        Ok(removed)
    }
}
