use serde::{Deserialize, Serialize};

use crate::domain::AnswerSource;
use crate::infrastructure::services::Answer;

/// Body of `POST /ask`
#[derive(Debug, Clone, Deserialize)]
pub struct AskRequest {
    pub question: String,
}

/// Answer returned by `POST /ask`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskResponse {
    pub question: String,
    pub answer: String,
    pub source: AnswerSource,
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub cost_usd: f64,
    pub cache_hit: bool,
}

impl From<Answer> for AskResponse {
    fn from(answer: Answer) -> Self {
        Self {
            question: answer.question,
            answer: answer.answer,
            source: answer.source,
            prompt_tokens: answer.prompt_tokens,
            completion_tokens: answer.completion_tokens,
            cost_usd: answer.cost_usd,
            cache_hit: answer.cache_hit,
        }
    }
}
