use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Store unavailable: {message}")]
    StoreUnavailable { message: String },

    #[error("Embedding provider error: {provider} - {message}")]
    EmbeddingProvider { provider: String, message: String },

    #[error("Model provider error: {provider} - {message}")]
    ModelProvider { provider: String, message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub fn store_unavailable(message: impl Into<String>) -> Self {
        Self::StoreUnavailable {
            message: message.into(),
        }
    }

    pub fn embedding_provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::EmbeddingProvider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn model_provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ModelProvider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether the error came from the key-value store
    pub fn is_store_unavailable(&self) -> bool {
        matches!(self, Self::StoreUnavailable { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_error() {
        let error = DomainError::invalid_input("question must not be empty");
        assert_eq!(
            error.to_string(),
            "Invalid input: question must not be empty"
        );
    }

    #[test]
    fn test_store_unavailable_error() {
        let error = DomainError::store_unavailable("connection refused");
        assert_eq!(error.to_string(), "Store unavailable: connection refused");
        assert!(error.is_store_unavailable());
    }

    #[test]
    fn test_provider_errors() {
        let error = DomainError::embedding_provider("openai", "timed out");
        assert_eq!(
            error.to_string(),
            "Embedding provider error: openai - timed out"
        );
        assert!(!error.is_store_unavailable());

        let error = DomainError::model_provider("openai", "HTTP 500");
        assert_eq!(error.to_string(), "Model provider error: openai - HTTP 500");
    }
}
