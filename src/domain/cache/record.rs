//! Cached answer record

use serde::{Deserialize, Serialize};

use crate::domain::llm::ChatCompletion;

/// Where an answer came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerSource {
    Llm,
    ExactCache,
    SemanticCache,
}

impl AnswerSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Llm => "llm",
            Self::ExactCache => "exact_cache",
            Self::SemanticCache => "semantic_cache",
        }
    }

    pub fn is_cache(&self) -> bool {
        !matches!(self, Self::Llm)
    }
}

impl std::fmt::Display for AnswerSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value stored in the exact cache
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheRecord {
    pub answer: String,
    pub source: AnswerSource,
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
    #[serde(default)]
    pub cost_usd: f64,
}

impl CacheRecord {
    /// Record for an answer freshly produced by the model
    pub fn from_completion(completion: &ChatCompletion) -> Self {
        Self {
            answer: completion.answer.clone(),
            source: AnswerSource::Llm,
            prompt_tokens: completion.prompt_tokens,
            completion_tokens: completion.completion_tokens,
            cost_usd: completion.cost_usd,
        }
    }
}
