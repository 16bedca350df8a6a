//! Embedding provider trait and vector math

mod provider;
mod vector;

pub use provider::EmbeddingProvider;
pub use vector::{coerce_dimension, cosine_similarity, l2_norm, l2_normalize, NORM_EPSILON};

#[cfg(test)]
pub use provider::mock::MockEmbeddingProvider;
