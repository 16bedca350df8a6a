//! Redis key-value store implementation

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client, RedisResult};
use tokio::sync::OnceCell;
use tracing::info;

use crate::domain::store::KeyValueStore;
use crate::domain::DomainError;

/// Configuration for the Redis store
#[derive(Debug, Clone)]
pub struct RedisStoreConfig {
    /// Redis connection URL (e.g., "redis://127.0.0.1:6379/0")
    pub url: String,
    /// Key prefix for namespacing
    pub key_prefix: Option<String>,
    /// Connection timeout
    pub connection_timeout: Duration,
    /// Upper bound for a single command round-trip
    pub command_timeout: Duration,
}

impl Default for RedisStoreConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379/0".to_string(),
            key_prefix: None,
            connection_timeout: Duration::from_secs(5),
            command_timeout: Duration::from_secs(2),
        }
    }
}

impl RedisStoreConfig {
    /// Creates a new configuration with the given URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Sets the key prefix
    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = Some(prefix.into());
        self
    }

    /// Sets the connection timeout
    pub fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    /// Sets the per-command timeout
    pub fn with_command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }
}

/// Redis-backed key-value store
///
/// Features:
/// - Lazy connection: the `ConnectionManager` is built on first use and
///   retried on later calls while Redis is unreachable
/// - Atomic INCR for item ids
/// - Every command bounded by `command_timeout`
pub struct RedisStore {
    client: Client,
    connection: OnceCell<ConnectionManager>,
    config: RedisStoreConfig,
}

impl fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisStore")
            .field("config", &self.config)
            .field("connected", &self.connection.initialized())
            .finish()
    }
}

impl RedisStore {
    /// Creates a store without connecting; only the URL is validated
    pub fn new(config: RedisStoreConfig) -> Result<Self, DomainError> {
        let client = Client::open(config.url.as_str()).map_err(|e| {
            DomainError::store_unavailable(format!("Failed to create Redis client: {}", e))
        })?;

        Ok(Self {
            client,
            connection: OnceCell::new(),
            config,
        })
    }

    /// Creates a store with default configuration
    pub fn with_url(url: impl Into<String>) -> Result<Self, DomainError> {
        Self::new(RedisStoreConfig::new(url))
    }

    /// Returns the shared connection, connecting first if needed
    async fn connection(&self) -> Result<ConnectionManager, DomainError> {
        let manager = self
            .connection
            .get_or_try_init(|| async {
                let connect = ConnectionManager::new(self.client.clone());

                match tokio::time::timeout(self.config.connection_timeout, connect).await {
                    Ok(Ok(manager)) => {
                        info!(url = %self.config.url, "Connected to Redis");
                        Ok(manager)
                    }
                    Ok(Err(e)) => Err(DomainError::store_unavailable(format!(
                        "Failed to connect to Redis: {}",
                        e
                    ))),
                    Err(_) => Err(DomainError::store_unavailable(format!(
                        "Timed out connecting to Redis after {:?}",
                        self.config.connection_timeout
                    ))),
                }
            })
            .await?;

        Ok(manager.clone())
    }

    fn prefix_key(&self, key: &str) -> String {
        match &self.config.key_prefix {
            Some(prefix) => format!("{}:{}", prefix, key),
            None => key.to_string(),
        }
    }

    /// Runs a command under the configured timeout
    async fn run<T, F>(&self, operation: &str, key: &str, command: F) -> Result<T, DomainError>
    where
        F: Future<Output = RedisResult<T>>,
    {
        match tokio::time::timeout(self.config.command_timeout, command).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(DomainError::store_unavailable(format!(
                "Failed to {} key '{}': {}",
                operation, key, e
            ))),
            Err(_) => Err(DomainError::store_unavailable(format!(
                "Timed out after {:?} trying to {} key '{}'",
                self.config.command_timeout, operation, key
            ))),
        }
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        let prefixed_key = self.prefix_key(key);
        let mut conn = self.connection().await?;

        self.run("get", key, async move {
            let value: Option<String> = conn.get(&prefixed_key).await?;
            Ok(value)
        })
        .await
    }

    async fn set_with_ttl(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<(), DomainError> {
        let prefixed_key = self.prefix_key(key);
        let mut conn = self.connection().await?;
        let value = value.to_string();
        let ttl_secs = ttl.as_secs().max(1);

        self.run("set", key, async move {
            let _: () = conn.set_ex(&prefixed_key, value, ttl_secs).await?;
            Ok(())
        })
        .await
    }

    async fn hash_set(&self, key: &str, fields: &[(&str, &str)]) -> Result<(), DomainError> {
        if fields.is_empty() {
            return Ok(());
        }

        let prefixed_key = self.prefix_key(key);
        let mut conn = self.connection().await?;
        let items: Vec<(String, String)> = fields
            .iter()
            .map(|(field, value)| (field.to_string(), value.to_string()))
            .collect();

        self.run("hset", key, async move {
            let _: () = conn.hset_multiple(&prefixed_key, &items).await?;
            Ok(())
        })
        .await
    }

    async fn hash_get_all(&self, key: &str) -> Result<HashMap<String, String>, DomainError> {
        let prefixed_key = self.prefix_key(key);
        let mut conn = self.connection().await?;

        self.run("hgetall", key, async move {
            let fields: HashMap<String, String> = conn.hgetall(&prefixed_key).await?;
            Ok(fields)
        })
        .await
    }

    async fn set_add(&self, key: &str, member: &str) -> Result<bool, DomainError> {
        let prefixed_key = self.prefix_key(key);
        let mut conn = self.connection().await?;
        let member = member.to_string();

        self.run("sadd", key, async move {
            let added: i64 = conn.sadd(&prefixed_key, member).await?;
            Ok(added > 0)
        })
        .await
    }

    async fn set_members(&self, key: &str) -> Result<Vec<String>, DomainError> {
        let prefixed_key = self.prefix_key(key);
        let mut conn = self.connection().await?;

        self.run("smembers", key, async move {
            let members: Vec<String> = conn.smembers(&prefixed_key).await?;
            Ok(members)
        })
        .await
    }

    async fn set_card(&self, key: &str) -> Result<usize, DomainError> {
        let prefixed_key = self.prefix_key(key);
        let mut conn = self.connection().await?;

        self.run("scard", key, async move {
            let count: usize = conn.scard(&prefixed_key).await?;
            Ok(count)
        })
        .await
    }

    async fn incr(&self, key: &str) -> Result<i64, DomainError> {
        let prefixed_key = self.prefix_key(key);
        let mut conn = self.connection().await?;

        self.run("incr", key, async move {
            let value: i64 = conn.incr(&prefixed_key, 1i64).await?;
            Ok(value)
        })
        .await
    }

    async fn delete(&self, key: &str) -> Result<bool, DomainError> {
        let prefixed_key = self.prefix_key(key);
        let mut conn = self.connection().await?;

        self.run("delete", key, async move {
            let deleted: i64 = conn.del(&prefixed_key).await?;
            Ok(deleted > 0)
        })
        .await
    }

    async fn ping(&self) -> Result<(), DomainError> {
        let mut conn = self.connection().await?;

        self.run("ping", "-", async move {
            let _: String = redis::cmd("PING").query_async(&mut conn).await?;
            Ok(())
        })
        .await
    }
}
