//! Key-value store implementations
//!
//! - `InMemoryStore`: process-local, default for development
//! - `RedisStore`: shared Redis backend

mod factory;
mod in_memory;
mod redis;

pub use factory::{StoreConfig, StoreFactory, StoreType};
pub use in_memory::InMemoryStore;
pub use redis::{RedisStore, RedisStoreConfig};
