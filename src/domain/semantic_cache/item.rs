//! Semantic cache items and search results

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::domain::DomainError;

/// Free-form metadata stored next to an answer (token usage, cost, ...)
pub type Metadata = Map<String, Value>;

const FIELD_QUESTION: &str = "q";
const FIELD_ANSWER: &str = "a";
const FIELD_VECTOR: &str = "v";
const FIELD_METADATA: &str = "m";

/// A stored question/answer pair with its unit-length embedding
#[derive(Debug, Clone, PartialEq)]
pub struct SemanticItem {
    pub id: i64,
    pub question: String,
    pub answer: String,
    pub vector: Vec<f32>,
    pub metadata: Metadata,
}

impl SemanticItem {
    /// Hash fields as written to the store
    pub fn to_fields(&self) -> Result<Vec<(&'static str, String)>, DomainError> {
        let vector = serde_json::to_string(&self.vector)
            .map_err(|e| DomainError::internal(format!("Failed to encode vector: {}", e)))?;
        let metadata = serde_json::to_string(&self.metadata)
            .map_err(|e| DomainError::internal(format!("Failed to encode metadata: {}", e)))?;

        Ok(vec![
            (FIELD_QUESTION, self.question.clone()),
            (FIELD_ANSWER, self.answer.clone()),
            (FIELD_VECTOR, vector),
            (FIELD_METADATA, metadata),
        ])
    }

    /// Rebuilds an item from its hash fields
    ///
    /// Returns `None` for an empty hash (the item was removed). A vector that
    /// fails to decode is an error; missing text fields default to empty and
    /// unreadable metadata to an empty map.
    pub fn from_fields(
        id: i64,
        fields: &HashMap<String, String>,
    ) -> Result<Option<Self>, DomainError> {
        if fields.is_empty() {
            return Ok(None);
        }

        let vector: Vec<f32> = fields
            .get(FIELD_VECTOR)
            .map(|raw| serde_json::from_str(raw))
            .transpose()
            .map_err(|e| DomainError::internal(format!("Item {} has a corrupt vector: {}", id, e)))?
            .ok_or_else(|| DomainError::internal(format!("Item {} has no vector", id)))?;

        let metadata = fields
            .get(FIELD_METADATA)
            .and_then(|raw| serde_json::from_str::<Metadata>(raw).ok())
            .unwrap_or_default();

        Ok(Some(Self {
            id,
            question: fields.get(FIELD_QUESTION).cloned().unwrap_or_default(),
            answer: fields.get(FIELD_ANSWER).cloned().unwrap_or_default(),
            vector,
            metadata,
        }))
    }
}

/// Best match returned by a similarity search
#[derive(Debug, Clone, PartialEq)]
pub struct SemanticMatch {
    pub id: i64,
    pub question: String,
    pub answer: String,
    pub metadata: Metadata,
    pub similarity: f32,
}

impl SemanticMatch {
    pub fn new(item: SemanticItem, similarity: f32) -> Self {
        Self {
            id: item.id,
            question: item.question,
            answer: item.answer,
            metadata: item.metadata,
            similarity,
        }
    }

    pub fn prompt_tokens(&self) -> u32 {
        self.metadata_u32("prompt_tokens")
    }

    pub fn completion_tokens(&self) -> u32 {
        self.metadata_u32("completion_tokens")
    }

    pub fn cost_usd(&self) -> f64 {
        self.metadata
            .get("cost_usd")
            .and_then(Value::as_f64)
            .unwrap_or(0.0)
    }

    fn metadata_u32(&self, key: &str) -> u32 {
        self.metadata
            .get(key)
            .and_then(Value::as_u64)
            .map(|v| v.min(u32::MAX as u64) as u32)
            .unwrap_or(0)
    }
}

/// Metadata recorded for a model answer so a later semantic hit can report
/// the usage that produced it
pub fn usage_metadata(prompt_tokens: u32, completion_tokens: u32, cost_usd: f64) -> Metadata {
    let mut metadata = Metadata::new();
    metadata.insert("prompt_tokens".to_string(), Value::from(prompt_tokens));
    metadata.insert("completion_tokens".to_string(), Value::from(completion_tokens));
    metadata.insert("cost_usd".to_string(), Value::from(cost_usd));
    metadata
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_item() -> SemanticItem {
        SemanticItem {
            id: 7,
            question: "什麼是快取？".to_string(),
            answer: "快取是加速讀取的技術。".to_string(),
            vector: vec![0.6, 0.8],
            metadata: usage_metadata(5, 7, 0.0),
        }
    }

    #[test]
    fn test_fields_round_trip() {
        let item = sample_item();
        let fields: HashMap<String, String> = item
            .to_fields()
            .unwrap()
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();

        let decoded = SemanticItem::from_fields(7, &fields).unwrap().unwrap();
        assert_eq!(decoded, item);
    }

    #[test]
    fn test_empty_hash_is_absent() {
        let decoded = SemanticItem::from_fields(1, &HashMap::new()).unwrap();
        assert!(decoded.is_none());
    }

    #[test]
    fn test_corrupt_vector_is_error() {
        let mut fields = HashMap::new();
        fields.insert("q".to_string(), "question".to_string());
        fields.insert("v".to_string(), "not-json".to_string());

        assert!(SemanticItem::from_fields(1, &fields).is_err());
    }

    #[test]
    fn test_bad_metadata_defaults_to_empty() {
        let mut fields = HashMap::new();
        fields.insert("v".to_string(), "[1.0]".to_string());
        fields.insert("m".to_string(), "{broken".to_string());

        let item = SemanticItem::from_fields(1, &fields).unwrap().unwrap();
        assert!(item.metadata.is_empty());
    }

    #[test]
    fn test_match_usage_accessors() {
        let matched = SemanticMatch::new(sample_item(), 0.97);

        assert_eq!(matched.id, 7);
        assert_eq!(matched.prompt_tokens(), 5);
        assert_eq!(matched.completion_tokens(), 7);
        assert_eq!(matched.cost_usd(), 0.0);
    }

    #[test]
    fn test_match_missing_usage_defaults_to_zero() {
        let mut item = sample_item();
        item.metadata = Metadata::new();
        let matched = SemanticMatch::new(item, 1.0);

        assert_eq!(matched.prompt_tokens(), 0);
        assert_eq!(matched.completion_tokens(), 0);
    }
}
