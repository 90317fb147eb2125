//! Chunking request and response records.

use super::document::{ResponseDocument, TaskStatus, Usage};
use serde::{Deserialize, Serialize};

/// Default maximum chunk length, in tokens.
pub const DEFAULT_MAX_CHUNK_LENGTH: u32 = 400;
/// Default similarity window for the semantic chunker.
pub const DEFAULT_WINDOW_SIZE: u32 = 1;

/// Splitting strategy applied by the service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChunkerType {
    /// Split on regex delimiters.
    #[default]
    Regex,
    /// Split on semantic similarity windows.
    Semantic,
}

/// Processing options for the chunker. The service echoes them back in its response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkingOptions {
    /// Maximum chunk length.
    #[serde(default)]
    pub max_chunk_length: Option<u32>,
    /// Chunker used to split the content.
    #[serde(default)]
    pub chunker_type: Option<ChunkerType>,
    /// Window size for the semantic chunker.
    #[serde(default)]
    pub window_size: Option<u32>,
    /// Regex delimiters for the regex chunker.
    #[serde(default)]
    pub delimiters: Option<Vec<String>>,
}

impl Default for ChunkingOptions {
    fn default() -> Self {
        Self {
            max_chunk_length: Some(DEFAULT_MAX_CHUNK_LENGTH),
            chunker_type: Some(ChunkerType::Regex),
            window_size: Some(DEFAULT_WINDOW_SIZE),
            delimiters: Some(Vec::new()),
        }
    }
}

impl ChunkingOptions {
    /// Regex chunking with the given delimiters and length budget.
    pub fn regex(delimiters: Vec<String>, max_chunk_length: u32) -> Self {
        Self {
            max_chunk_length: Some(max_chunk_length),
            chunker_type: Some(ChunkerType::Regex),
            delimiters: Some(delimiters),
            ..Self::default()
        }
    }

    /// Semantic chunking with the given window and length budget.
    pub fn semantic(window_size: u32, max_chunk_length: u32) -> Self {
        Self {
            max_chunk_length: Some(max_chunk_length),
            chunker_type: Some(ChunkerType::Semantic),
            window_size: Some(window_size),
            ..Self::default()
        }
    }
}

/// JSON body of the chunk endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkRequestPayload {
    /// Text to split.
    pub content: String,
    /// Chunker settings; the service defaults apply when absent.
    pub processing_options: Option<ChunkingOptions>,
}

/// Result of a chunking call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkResponse {
    /// Job status.
    pub status: TaskStatus,
    /// Metered usage.
    pub usage: Usage,
    /// Optional service message.
    #[serde(default)]
    pub message: Option<String>,
    /// Options the service applied.
    pub processing_options: ChunkingOptions,
    /// Chunked document.
    pub document: ResponseDocument,
}
