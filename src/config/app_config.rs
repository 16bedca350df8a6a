use std::time::Duration;

use serde::Deserialize;

use crate::domain::semantic_cache::SemanticCacheConfig;
use crate::domain::DomainError;
use crate::infrastructure::llm::LlmProviderConfig;
use crate::infrastructure::services::DEFAULT_EXACT_NAMESPACE;
use crate::infrastructure::store::{StoreConfig, StoreType};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub store: StoreSettings,
    #[serde(default)]
    pub exact_cache: ExactCacheConfig,
    #[serde(default)]
    pub semantic_cache: SemanticCacheConfig,
    #[serde(default)]
    pub llm: LlmProviderConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Key-value store settings
#[derive(Debug, Clone, Deserialize)]
pub struct StoreSettings {
    /// `in_memory` or `redis`; when unset, redis is used iff a URL is known
    #[serde(default)]
    pub backend: Option<String>,
    #[serde(default)]
    pub redis_url: Option<String>,
    #[serde(default)]
    pub key_prefix: Option<String>,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_command_timeout_secs")]
    pub command_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExactCacheConfig {
    #[serde(default = "default_exact_namespace")]
    pub namespace: String,
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    #[serde(default = "default_metrics_namespace")]
    pub namespace: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_connect_timeout_secs() -> u64 {
    5
}

fn default_command_timeout_secs() -> u64 {
    2
}

fn default_exact_namespace() -> String {
    DEFAULT_EXACT_NAMESPACE.to_string()
}

fn default_ttl_secs() -> u64 {
    3600
}

fn default_metrics_namespace() -> String {
    "answer_cache".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            backend: None,
            redis_url: None,
            key_prefix: None,
            connect_timeout_secs: default_connect_timeout_secs(),
            command_timeout_secs: default_command_timeout_secs(),
        }
    }
}

impl StoreSettings {
    /// Resolves the backend and builds the factory configuration
    pub fn store_config(&self) -> Result<StoreConfig, DomainError> {
        let store_type = match self.backend.as_deref() {
            Some(backend) => backend.parse::<StoreType>()?,
            None if self.redis_url.is_some() => StoreType::Redis,
            None => StoreType::InMemory,
        };

        Ok(StoreConfig {
            store_type,
            redis_url: self.redis_url.clone(),
            key_prefix: self.key_prefix.clone(),
            connection_timeout: Duration::from_secs(self.connect_timeout_secs.max(1)),
            command_timeout: Duration::from_secs(self.command_timeout_secs.max(1)),
        })
    }
}

impl Default for ExactCacheConfig {
    fn default() -> Self {
        Self {
            namespace: default_exact_namespace(),
            ttl_secs: default_ttl_secs(),
        }
    }
}

impl ExactCacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs.max(1))
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            namespace: default_metrics_namespace(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut app_config: Self = config.try_deserialize()?;
        app_config.apply_env_fallbacks(|name| std::env::var(name).ok());

        Ok(app_config)
    }

    /// Fills unset credentials and endpoints from conventional variables
    fn apply_env_fallbacks(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        if self.llm.api_key.is_none() {
            self.llm.api_key = non_empty("OPENAI_API_KEY");
        }

        if self.llm.base_url.is_none() {
            self.llm.base_url = non_empty("OPENAI_BASE_URL");
        }

        if self.store.redis_url.is_none() {
            self.store.redis_url = non_empty("REDIS_URL");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use crate::infrastructure::llm::ProviderKind;

    fn from_toml(source: &str) -> AppConfig {
        config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.exact_cache.namespace, "prompt_cache");
        assert_eq!(config.exact_cache.ttl(), Duration::from_secs(3600));
        assert!(config.semantic_cache.enabled);
        assert_eq!(config.semantic_cache.dimension, 1536);
        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(config.metrics.namespace, "answer_cache");
        assert_eq!(
            config.store.store_config().unwrap().store_type,
            StoreType::InMemory
        );
    }

    #[test]
    fn test_empty_source_uses_defaults() {
        let config = from_toml("");

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.semantic_cache.namespace, "semantic_cache");
        assert_eq!(config.llm.timeout_secs, 60);
    }

    #[test]
    fn test_sections_override_defaults() {
        let config = from_toml(
            r#"
            [server]
            port = 9000

            [logging]
            format = "json"

            [store]
            backend = "redis"
            redis_url = "redis://cache:6379/1"
            command_timeout_secs = 1

            [exact_cache]
            ttl_secs = 60

            [semantic_cache]
            enabled = false
            similarity_threshold = 0.85
            dimension = 384

            [llm]
            provider = "offline"
            model = "local"

            [metrics]
            namespace = "svc"
            "#,
        );

        assert_eq!(config.server.port, 9000);
        assert!(matches!(config.logging.format, LogFormat::Json));
        assert_eq!(config.exact_cache.ttl(), Duration::from_secs(60));
        assert!(!config.semantic_cache.enabled);
        assert!((config.semantic_cache.threshold() - 0.85).abs() < 1e-6);
        assert_eq!(config.semantic_cache.dimension, 384);
        assert_eq!(config.llm.provider, ProviderKind::Offline);
        assert_eq!(config.metrics.namespace, "svc");

        let store = config.store.store_config().unwrap();
        assert_eq!(store.store_type, StoreType::Redis);
        assert_eq!(store.redis_url.as_deref(), Some("redis://cache:6379/1"));
        assert_eq!(store.command_timeout, Duration::from_secs(1));
    }

    #[test]
    fn test_redis_url_selects_redis_backend() {
        let settings = StoreSettings {
            redis_url: Some("redis://localhost:6379/0".to_string()),
            ..Default::default()
        };
        assert_eq!(settings.store_config().unwrap().store_type, StoreType::Redis);

        let settings = StoreSettings {
            backend: Some("in_memory".to_string()),
            redis_url: Some("redis://localhost:6379/0".to_string()),
            ..Default::default()
        };
        assert_eq!(settings.store_config().unwrap().store_type, StoreType::InMemory);

        let settings = StoreSettings {
            backend: Some("cassandra".to_string()),
            ..Default::default()
        };
        assert!(settings.store_config().is_err());
    }

    #[test]
    fn test_env_fallbacks_fill_unset_values() {
        let env: HashMap<&str, &str> = [
            ("OPENAI_API_KEY", "sk-env"),
            ("OPENAI_BASE_URL", "http://proxy:8000"),
            ("REDIS_URL", ""),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config.llm.base_url = Some("http://configured".to_string());
        config.apply_env_fallbacks(|name| env.get(name).map(|v| v.to_string()));

        assert_eq!(config.llm.api_key.as_deref(), Some("sk-env"));
        assert_eq!(config.llm.base_url.as_deref(), Some("http://configured"));
        assert!(config.store.redis_url.is_none());
    }
}
