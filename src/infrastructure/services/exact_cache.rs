//! Exact-match answer cache
//!
//! Maps the SHA-256 of the raw question to a JSON `CacheRecord` stored with a
//! TTL. The cache fails open: store errors never surface to the caller.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::domain::cache::{CacheKeyGenerator, CacheRecord, Sha256KeyGenerator};
use crate::domain::store::KeyValueStore;

/// Default key namespace for exact-cache entries
pub const DEFAULT_EXACT_NAMESPACE: &str = "prompt_cache";

#[derive(Debug)]
pub struct ExactCache {
    store: Arc<dyn KeyValueStore>,
    key_generator: Sha256KeyGenerator,
    namespace: String,
}

impl ExactCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            key_generator: Sha256KeyGenerator::new(),
            namespace: DEFAULT_EXACT_NAMESPACE.to_string(),
        }
    }

    /// Set the key namespace
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Store key for a question
    pub fn key_for(&self, question: &str) -> String {
        self.key_generator
            .generate_with_namespace(&self.namespace, question)
    }

    /// Look up a cached record
    ///
    /// Returns `None` on a miss, on a store error and on a record that does
    /// not decode.
    pub async fn get(&self, question: &str) -> Option<CacheRecord> {
        let key = self.key_for(question);

        let raw = match self.store.get(&key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key = %key, "Exact cache miss");
                return None;
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Exact cache read failed, treating as miss");
                return None;
            }
        };

        match serde_json::from_str::<CacheRecord>(&raw) {
            Ok(record) => {
                debug!(key = %key, "Exact cache hit");
                Some(record)
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Exact cache entry failed to decode, treating as miss");
                None
            }
        }
    }

    /// Store a record, overwriting any previous one
    ///
    /// Failures are logged and otherwise ignored.
    pub async fn set(&self, question: &str, record: &CacheRecord, ttl: Duration) {
        let key = self.key_for(question);

        let value = match serde_json::to_string(record) {
            Ok(value) => value,
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to encode exact cache record");
                return;
            }
        };

        if let Err(e) = self.store.set_with_ttl(&key, &value, ttl).await {
            warn!(key = %key, error = %e, "Exact cache write failed");
        }
    }
}
