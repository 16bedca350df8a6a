//! In-memory key-value store implementation

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::future::Cache as MokaCache;
use moka::Expiry;

use crate::domain::store::KeyValueStore;
use crate::domain::DomainError;

/// String value with its own time-to-live
#[derive(Debug, Clone)]
struct StringEntry {
    data: String,
    ttl: Duration,
}

/// Expires each string entry after the TTL it was written with
struct PerEntryTtl;

impl Expiry<String, StringEntry> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &StringEntry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &StringEntry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// Non-expiring structured value
#[derive(Debug, Clone)]
enum StoredValue {
    Hash(HashMap<String, String>),
    Set(HashSet<String>),
    Counter(i64),
}

impl StoredValue {
    fn type_name(&self) -> &'static str {
        match self {
            StoredValue::Hash(_) => "hash",
            StoredValue::Set(_) => "set",
            StoredValue::Counter(_) => "counter",
        }
    }
}

/// Thread-safe in-memory store
///
/// Features:
/// - String values with per-entry TTL, held in a moka cache
/// - Hashes, sets and atomic counters with Redis-like semantics
/// - Every operation holds the lock for its own duration only
#[derive(Debug)]
pub struct InMemoryStore {
    strings: MokaCache<String, StringEntry>,
    entries: RwLock<HashMap<String, StoredValue>>,
}

impl InMemoryStore {
    /// Creates an empty in-memory store
    pub fn new() -> Self {
        Self {
            strings: MokaCache::builder().expire_after(PerEntryTtl).build(),
            entries: RwLock::new(HashMap::new()),
        }
    }

    fn wrong_type(key: &str, expected: &str, found: &str) -> DomainError {
        DomainError::internal(format!(
            "Key '{}' holds a {} value, expected {}",
            key, found, expected
        ))
    }

    /// Rejects structured writes to a key that currently holds a string
    fn ensure_not_string(&self, key: &str, expected: &str) -> Result<(), DomainError> {
        if self.strings.contains_key(key) {
            return Err(Self::wrong_type(key, expected, "string"));
        }
        Ok(())
    }

    fn read_lock(
        &self,
    ) -> Result<std::sync::RwLockReadGuard<'_, HashMap<String, StoredValue>>, DomainError> {
        self.entries
            .read()
            .map_err(|e| DomainError::internal(format!("Failed to acquire read lock: {}", e)))
    }

    fn write_lock(
        &self,
    ) -> Result<std::sync::RwLockWriteGuard<'_, HashMap<String, StoredValue>>, DomainError> {
        self.entries
            .write()
            .map_err(|e| DomainError::internal(format!("Failed to acquire write lock: {}", e)))
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        if let Some(entry) = self.strings.get(key).await {
            return Ok(Some(entry.data));
        }

        let entries = self.read_lock()?;

        match entries.get(key) {
            Some(StoredValue::Counter(value)) => Ok(Some(value.to_string())),
            Some(other) => Err(Self::wrong_type(key, "string", other.type_name())),
            None => Ok(None),
        }
    }

    async fn set_with_ttl(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<(), DomainError> {
        // SET replaces a value of any type
        self.write_lock()?.remove(key);

        self.strings
            .insert(
                key.to_string(),
                StringEntry {
                    data: value.to_string(),
                    ttl,
                },
            )
            .await;

        Ok(())
    }

    async fn hash_set(&self, key: &str, fields: &[(&str, &str)]) -> Result<(), DomainError> {
        self.ensure_not_string(key, "hash")?;
        let mut entries = self.write_lock()?;

        let value = entries
            .entry(key.to_string())
            .or_insert_with(|| StoredValue::Hash(HashMap::new()));

        match value {
            StoredValue::Hash(hash) => {
                for (field, field_value) in fields {
                    hash.insert(field.to_string(), field_value.to_string());
                }
                Ok(())
            }
            other => Err(Self::wrong_type(key, "hash", other.type_name())),
        }
    }

    async fn hash_get_all(&self, key: &str) -> Result<HashMap<String, String>, DomainError> {
        self.ensure_not_string(key, "hash")?;
        let entries = self.read_lock()?;

        match entries.get(key) {
            Some(StoredValue::Hash(hash)) => Ok(hash.clone()),
            Some(other) => Err(Self::wrong_type(key, "hash", other.type_name())),
            None => Ok(HashMap::new()),
        }
    }

    async fn set_add(&self, key: &str, member: &str) -> Result<bool, DomainError> {
        self.ensure_not_string(key, "set")?;
        let mut entries = self.write_lock()?;

        let value = entries
            .entry(key.to_string())
            .or_insert_with(|| StoredValue::Set(HashSet::new()));

        match value {
            StoredValue::Set(set) => Ok(set.insert(member.to_string())),
            other => Err(Self::wrong_type(key, "set", other.type_name())),
        }
    }

    async fn set_members(&self, key: &str) -> Result<Vec<String>, DomainError> {
        self.ensure_not_string(key, "set")?;
        let entries = self.read_lock()?;

        match entries.get(key) {
            Some(StoredValue::Set(set)) => Ok(set.iter().cloned().collect()),
            Some(other) => Err(Self::wrong_type(key, "set", other.type_name())),
            None => Ok(Vec::new()),
        }
    }

    async fn set_card(&self, key: &str) -> Result<usize, DomainError> {
        self.ensure_not_string(key, "set")?;
        let entries = self.read_lock()?;

        match entries.get(key) {
            Some(StoredValue::Set(set)) => Ok(set.len()),
            Some(other) => Err(Self::wrong_type(key, "set", other.type_name())),
            None => Ok(0),
        }
    }

    async fn incr(&self, key: &str) -> Result<i64, DomainError> {
        self.ensure_not_string(key, "counter")?;
        let mut entries = self.write_lock()?;

        let value = entries
            .entry(key.to_string())
            .or_insert(StoredValue::Counter(0));

        match value {
            StoredValue::Counter(counter) => {
                *counter += 1;
                Ok(*counter)
            }
            other => Err(Self::wrong_type(key, "counter", other.type_name())),
        }
    }

    async fn delete(&self, key: &str) -> Result<bool, DomainError> {
        let had_string = self.strings.get(key).await.is_some();
        self.strings.invalidate(key).await;

        let had_entry = self.write_lock()?.remove(key).is_some();

        Ok(had_string || had_entry)
    }

    async fn ping(&self) -> Result<(), DomainError> {
        self.read_lock().map(|_| ())
    }
}
