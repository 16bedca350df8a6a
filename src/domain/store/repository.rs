//! Key-value store trait definition

use std::collections::HashMap;
use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::DomainError;

/// Shared key-value store used by both cache levels
///
/// Implementations must make every single operation atomic on their own
/// (per-key set/get, INCR, SADD/SMEMBERS); callers never hold locks across
/// calls. Any transport failure, including a timeout, is reported as
/// `DomainError::StoreUnavailable`.
#[async_trait]
pub trait KeyValueStore: Send + Sync + Debug {
    /// Gets a string value, `None` if missing or expired
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError>;

    /// Sets a string value that expires after `ttl`
    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration)
        -> Result<(), DomainError>;

    /// Writes the given fields into a hash, creating it if needed
    async fn hash_set(&self, key: &str, fields: &[(&str, &str)]) -> Result<(), DomainError>;

    /// Reads every field of a hash; an absent hash yields an empty map
    async fn hash_get_all(&self, key: &str) -> Result<HashMap<String, String>, DomainError>;

    /// Adds a member to a set, returning whether it was newly added
    async fn set_add(&self, key: &str, member: &str) -> Result<bool, DomainError>;

    /// Returns all members of a set (unordered)
    async fn set_members(&self, key: &str) -> Result<Vec<String>, DomainError>;

    /// Returns the number of members in a set
    async fn set_card(&self, key: &str) -> Result<usize, DomainError> {
        Ok(self.set_members(key).await?.len())
    }

    /// Atomically increments a counter by one and returns the new value
    async fn incr(&self, key: &str) -> Result<i64, DomainError>;

    /// Deletes a key of any type, returning whether it existed
    async fn delete(&self, key: &str) -> Result<bool, DomainError>;

    /// Checks connectivity
    async fn ping(&self) -> Result<(), DomainError>;
}
