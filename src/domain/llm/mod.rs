//! Chat model domain models and traits

mod pricing;
mod provider;
mod response;

pub use pricing::{round_micros, ModelPricing};
pub use provider::LlmProvider;
pub use response::ChatCompletion;

#[cfg(test)]
pub use provider::mock::MockLlmProvider;
