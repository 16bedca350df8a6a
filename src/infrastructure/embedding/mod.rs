//! Embedding provider implementations

mod factory;
mod offline;
mod openai;

pub use factory::EmbeddingProviderFactory;
pub use offline::OfflineEmbeddingProvider;
pub use openai::OpenAiEmbeddingProvider;

// Re-export HTTP client for use by embedding providers
pub use super::llm::{HttpClient, HttpClientTrait};
