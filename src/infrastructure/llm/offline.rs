use async_trait::async_trait;

use crate::domain::llm::{ChatCompletion, LlmProvider};
use crate::domain::DomainError;

/// Chat provider used when no API key is configured
///
/// Echoes the question with rough token estimates and zero cost so the
/// service stays usable end to end without network access.
#[derive(Debug, Clone)]
pub struct OfflineChatProvider {
    model: String,
}

impl OfflineChatProvider {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
        }
    }
}

#[async_trait]
impl LlmProvider for OfflineChatProvider {
    async fn chat(&self, question: &str) -> Result<ChatCompletion, DomainError> {
        let answer = format!(
            "(mock) You asked: {}\nSet OPENAI_API_KEY to call real API.",
            question
        );

        let prompt_tokens = (question.chars().count() / 4).max(1) as u32;
        let completion_tokens = (answer.chars().count() / 4).max(5) as u32;

        Ok(ChatCompletion::new(answer, prompt_tokens, completion_tokens))
    }

    fn provider_name(&self) -> &'static str {
        "offline"
    }

    fn model(&self) -> &str {
        &self.model
    }
}
