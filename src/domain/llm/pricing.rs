//! Chat model pricing

use serde::{Deserialize, Serialize};

/// Per-1K-token prices for a chat model, kept in micro-dollars
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelPricing {
    /// Price per 1K prompt tokens in micro-dollars
    pub prompt_price_per_1k_micros: i64,
    /// Price per 1K completion tokens in micro-dollars
    pub completion_price_per_1k_micros: i64,
}

impl Default for ModelPricing {
    fn default() -> Self {
        Self::new(0.003, 0.006)
    }
}

impl ModelPricing {
    /// Create pricing from USD-per-1K values
    pub fn new(prompt_per_1k: f64, completion_per_1k: f64) -> Self {
        Self {
            prompt_price_per_1k_micros: (prompt_per_1k * 1_000_000.0).round() as i64,
            completion_price_per_1k_micros: (completion_per_1k * 1_000_000.0).round() as i64,
        }
    }

    /// Free pricing, used by the offline provider
    pub fn free() -> Self {
        Self {
            prompt_price_per_1k_micros: 0,
            completion_price_per_1k_micros: 0,
        }
    }

    /// Get prompt price per 1K tokens in USD
    pub fn prompt_price_per_1k(&self) -> f64 {
        self.prompt_price_per_1k_micros as f64 / 1_000_000.0
    }

    /// Get completion price per 1K tokens in USD
    pub fn completion_price_per_1k(&self) -> f64 {
        self.completion_price_per_1k_micros as f64 / 1_000_000.0
    }

    /// Estimated cost in USD, rounded to 6 decimal places
    pub fn estimate_cost(&self, prompt_tokens: u32, completion_tokens: u32) -> f64 {
        let prompt_cost = (prompt_tokens as f64 / 1000.0) * self.prompt_price_per_1k();
        let completion_cost = (completion_tokens as f64 / 1000.0) * self.completion_price_per_1k();

        round_micros(prompt_cost + completion_cost)
    }
}

/// Rounds a USD amount to whole micro-dollars
pub fn round_micros(usd: f64) -> f64 {
    (usd * 1_000_000.0).round() / 1_000_000.0
}
