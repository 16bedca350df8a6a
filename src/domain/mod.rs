//! Domain layer - Core types, traits and vector math

pub mod cache;
pub mod embedding;
pub mod error;
pub mod llm;
pub mod semantic_cache;
pub mod store;

pub use cache::{AnswerSource, CacheKeyGenerator, CacheRecord, Sha256KeyGenerator};
pub use embedding::{cosine_similarity, l2_normalize, EmbeddingProvider};
pub use error::DomainError;
pub use llm::{ChatCompletion, LlmProvider, ModelPricing};
pub use semantic_cache::{Metadata, SemanticCacheConfig, SemanticItem, SemanticMatch};
pub use store::KeyValueStore;
