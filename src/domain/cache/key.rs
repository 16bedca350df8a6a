//! Cache key generation strategies

use std::fmt::Debug;

use sha2::{Digest, Sha256};

/// Trait for generating cache keys from question text
pub trait CacheKeyGenerator: Send + Sync + Debug {
    /// Generates a cache key from the raw input
    fn generate(&self, input: &str) -> String;

    /// Generates a key with a namespace prefix
    fn generate_with_namespace(&self, namespace: &str, input: &str) -> String {
        format!("{}:{}", namespace, self.generate(input))
    }
}

/// Hex-encoded SHA-256 of the raw UTF-8 bytes
///
/// No trimming or case folding: two strings share a key only if they are
/// byte-identical.
#[derive(Debug, Clone, Default)]
pub struct Sha256KeyGenerator;

impl Sha256KeyGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl CacheKeyGenerator for Sha256KeyGenerator {
    fn generate(&self, input: &str) -> String {
        hex::encode(Sha256::digest(input.as_bytes()))
    }
}
