//! Wire records exchanged with the API.
//!
//! Responses are decoded leniently: unknown fields are ignored, while missing required fields
//! fail decoding and surface as [`crate::ApiError::InvalidResponse`].

pub mod chunk;
pub mod document;
pub mod embedding;
pub mod extract;

pub use chunk::{ChunkRequestPayload, ChunkResponse, ChunkerType, ChunkingOptions};
pub use document::{ResponseChunk, ResponseDocument, SourceType, TaskStatus, Usage};
pub use embedding::{
    Bm25Embedding, EmbeddingDataObject, EmbeddingInput, EmbeddingModel, EmbeddingResponse,
    EmbeddingUsage,
};
pub use extract::{ExtractProcessingOptions, ExtractResponse, ProcessingQuality};
