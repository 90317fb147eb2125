//! Embedding request and response records.

use serde::{Deserialize, Serialize};

/// Text to embed: a single string or a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EmbeddingInput {
    /// One text.
    Single(String),
    /// Several texts, embedded in order.
    Batch(Vec<String>),
}

impl EmbeddingInput {
    /// Whether there is nothing to embed. Whitespace-only text counts as empty.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Single(text) => text.trim().is_empty(),
            Self::Batch(texts) => texts.iter().all(|text| text.trim().is_empty()),
        }
    }
}

impl From<&str> for EmbeddingInput {
    fn from(value: &str) -> Self {
        Self::Single(value.to_string())
    }
}

impl From<String> for EmbeddingInput {
    fn from(value: String) -> Self {
        Self::Single(value)
    }
}

impl From<Vec<String>> for EmbeddingInput {
    fn from(value: Vec<String>) -> Self {
        Self::Batch(value)
    }
}

impl From<Vec<&str>> for EmbeddingInput {
    fn from(value: Vec<&str>) -> Self {
        Self::Batch(value.into_iter().map(str::to_string).collect())
    }
}

/// Embedding models offered by the service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum EmbeddingModel {
    /// Sparse BM25 embeddings.
    #[default]
    Bm25,
}

/// Sparse vector as parallel index/value lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bm25Embedding {
    /// Vocabulary indices with non-zero weight.
    pub indices: Vec<u64>,
    /// Weights aligned with `indices`.
    pub values: Vec<f64>,
}

/// Token usage of an embedding call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbeddingUsage {
    /// Tokens in the prompt.
    pub prompt_tokens: u64,
    /// Tokens billed.
    pub total_tokens: u64,
}

fn default_embedding_object() -> String {
    "embedding".to_string()
}

fn default_list_object() -> String {
    "list".to_string()
}

/// Embedding of one input text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingDataObject {
    /// Object type tag.
    #[serde(default = "default_embedding_object")]
    pub object: String,
    /// Position of the input this embedding belongs to.
    pub index: u64,
    /// The sparse vector.
    pub embedding: Bm25Embedding,
}

/// Result of an embedding call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingResponse {
    /// Optional service message.
    #[serde(default)]
    pub message: Option<String>,
    /// Model that produced the embeddings.
    pub model: String,
    /// Object type tag.
    #[serde(default = "default_list_object")]
    pub object: String,
    /// Token usage.
    pub usage: EmbeddingUsage,
    /// One embedding per input, in input order.
    pub data: Vec<EmbeddingDataObject>,
}
