//! Semantic cache domain models
//!
//! Provides vector-based caching that matches semantically similar questions
//! rather than requiring exact text matches.

mod config;
mod item;

pub use config::SemanticCacheConfig;
pub use item::{usage_metadata, Metadata, SemanticItem, SemanticMatch};
