use async_trait::async_trait;
use std::fmt::Debug;

use super::ChatCompletion;
use crate::domain::DomainError;

/// Trait for chat model providers (OpenAI-compatible, offline, ...)
#[async_trait]
pub trait LlmProvider: Send + Sync + Debug {
    /// Answer a single user question
    async fn chat(&self, question: &str) -> Result<ChatCompletion, DomainError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;

    /// Get the model identifier
    fn model(&self) -> &str;
}
