use serde::{Deserialize, Serialize};

/// Answer produced by a chat model, with the usage it cost
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletion {
    pub answer: String,
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub cost_usd: f64,
}

impl ChatCompletion {
    pub fn new(answer: impl Into<String>, prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            answer: answer.into(),
            prompt_tokens,
            completion_tokens,
            cost_usd: 0.0,
        }
    }

    pub fn with_cost(mut self, cost_usd: f64) -> Self {
        self.cost_usd = cost_usd;
        self
    }

    pub fn total_tokens(&self) -> u32 {
        self.prompt_tokens + self.completion_tokens
    }
}
