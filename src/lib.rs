#![deny(missing_docs)]

//! Client SDK for the Aurelio document processing API.
//!
//! The crate offers chunking, document extraction from files and URLs (with completion
//! polling), and BM25 embeddings through two clients with identical operations:
//! [`AsyncClient`] for tokio applications and [`BlockingClient`] for synchronous code.

/// Client surfaces and request options.
pub mod client;
/// Client configuration and environment loading.
pub mod config;
/// Error taxonomy.
pub mod error;
/// Retries, response mapping, and completion polling.
pub mod lifecycle;
/// Structured logging and tracing setup.
pub mod logging;
/// Request and response records.
pub mod schema;
/// HTTP execution seam and its implementations.
pub mod transport;
/// File upload sources and chunked readers.
pub mod upload;

pub use client::{
    AsyncClient, BlockingClient, ChunkRequest, DEFAULT_CHUNK_TIMEOUT, EmbeddingRequest,
    ExtractOptions, RequestSettings,
};
pub use config::{API_KEY_ENV, BASE_URL_ENV, ClientConfig, ConfigError, DEFAULT_BASE_URL};
pub use error::{ApiError, Result};
pub use lifecycle::{
    DEFAULT_REQUEST_TIMEOUT, DEFAULT_RETRIES, DEFAULT_WAIT, POLLING_INTERVAL,
    WAIT_TIME_BEFORE_POLLING, WaitBudget,
};
pub use schema::{
    ChunkResponse, ChunkerType, ChunkingOptions, EmbeddingInput, EmbeddingModel,
    EmbeddingResponse, ExtractResponse, ProcessingQuality, ResponseDocument, TaskStatus,
};
pub use transport::Transport;
pub use upload::UploadSource;
