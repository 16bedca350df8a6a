use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::http_client::HttpClient;
use super::offline::OfflineChatProvider;
use super::openai::{OpenAiChatProvider, DEFAULT_OPENAI_BASE_URL};
use crate::domain::llm::{LlmProvider, ModelPricing};
use crate::domain::DomainError;

/// Which backend answers chat and embedding calls
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// OpenAI when an API key is configured, offline otherwise
    #[default]
    Auto,
    #[serde(rename = "openai")]
    OpenAi,
    Offline,
}

/// Chat and embedding provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmProviderConfig {
    #[serde(default)]
    pub provider: ProviderKind,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default)]
    pub base_url: Option<String>,

    /// Timeout for one chat or embedding call
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// USD per 1K prompt tokens
    #[serde(default = "default_prompt_cost_per_1k")]
    pub prompt_cost_per_1k: f64,

    /// USD per 1K completion tokens
    #[serde(default = "default_completion_cost_per_1k")]
    pub completion_cost_per_1k: f64,
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_prompt_cost_per_1k() -> f64 {
    0.003
}

fn default_completion_cost_per_1k() -> f64 {
    0.006
}

impl Default for LlmProviderConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            model: default_model(),
            api_key: None,
            base_url: None,
            timeout_secs: default_timeout_secs(),
            prompt_cost_per_1k: default_prompt_cost_per_1k(),
            completion_cost_per_1k: default_completion_cost_per_1k(),
        }
    }
}

impl LlmProviderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    pub fn pricing(&self) -> ModelPricing {
        ModelPricing::new(self.prompt_cost_per_1k, self.completion_cost_per_1k)
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_OPENAI_BASE_URL)
    }

    /// Non-empty API key, if any
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|key| !key.trim().is_empty())
    }

    /// Backend actually used once `Auto` is resolved
    pub fn resolved_provider(&self) -> Result<ProviderKind, DomainError> {
        match (self.provider, self.api_key()) {
            (ProviderKind::Auto, Some(_)) => Ok(ProviderKind::OpenAi),
            (ProviderKind::Auto, None) => Ok(ProviderKind::Offline),
            (ProviderKind::OpenAi, None) => Err(DomainError::configuration(
                "llm.api_key (or OPENAI_API_KEY) is required for the openai provider",
            )),
            (kind, _) => Ok(kind),
        }
    }
}

/// Factory for creating chat providers
#[derive(Debug)]
pub struct LlmProviderFactory;

impl LlmProviderFactory {
    /// Create a chat provider from configuration
    pub fn create(config: &LlmProviderConfig) -> Result<Arc<dyn LlmProvider>, DomainError> {
        match config.resolved_provider()? {
            ProviderKind::OpenAi => {
                let api_key = config.api_key().unwrap_or_default();
                let client = HttpClient::with_timeout(config.timeout())?;
                let provider = OpenAiChatProvider::with_base_url(
                    client,
                    api_key,
                    &config.model,
                    config.base_url(),
                )
                .with_pricing(config.pricing());

                Ok(Arc::new(provider))
            }
            _ => Ok(Arc::new(OfflineChatProvider::new(&config.model))),
        }
    }
}
