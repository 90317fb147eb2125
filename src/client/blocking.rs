use super::{ChunkRequest, EmbeddingRequest, ExtractOptions, RequestSettings, Service};
use crate::config::{ClientConfig, ConfigError};
use crate::error::Result;
use crate::lifecycle::WaitBudget;
use crate::logging::init_tracing;
use crate::schema::{ChunkResponse, EmbeddingResponse, ExtractResponse};
use crate::transport::BlockingTransport;
use crate::upload::UploadSource;
use futures::executor::block_on;
use std::time::Duration;

/// Blocking client with the same operations as [`crate::AsyncClient`].
///
/// Every method runs to completion on the calling thread, including the sleeps between
/// retries and status checks. Do not call it from inside an async runtime.
#[derive(Debug, Clone)]
pub struct BlockingClient {
    service: Service<BlockingTransport>,
}

impl BlockingClient {
    /// Build a client from explicit configuration.
    pub fn new(config: ClientConfig) -> std::result::Result<Self, ConfigError> {
        if config.debug {
            init_tracing(true);
        }
        let (api_key, base_url) = config.validated()?;
        let transport = BlockingTransport::new(&api_key)?;
        tracing::debug!(base_url = %base_url, "Blocking client ready");
        Ok(Self {
            service: Service::new(transport, base_url),
        })
    }

    /// Build a client from `AURELIO_API_KEY` and, when set, `AURELIO_BASE_URL`.
    pub fn from_env() -> std::result::Result<Self, ConfigError> {
        Self::new(ClientConfig::from_env()?)
    }

    /// Normalized API root every request is sent to.
    pub fn base_url(&self) -> &str {
        self.service.base_url()
    }

    /// Split text into chunks.
    pub fn chunk(&self, request: impl Into<ChunkRequest>) -> Result<ChunkResponse> {
        block_on(self.service.chunk(&request.into()))
    }

    /// Upload a file for extraction and wait for it according to `options`.
    pub fn extract_file(&self, file: UploadSource, options: ExtractOptions) -> Result<ExtractResponse> {
        block_on(self.service.extract_file(&file, &options))
    }

    /// Submit a remote document for extraction and wait for it according to `options`.
    pub fn extract_url(&self, url: &str, options: ExtractOptions) -> Result<ExtractResponse> {
        block_on(self.service.extract_url(url, &options))
    }

    /// Fetch the current state of a document.
    pub fn get_document(&self, document_id: &str, settings: RequestSettings) -> Result<ExtractResponse> {
        block_on(self.service.get_document(document_id, settings))
    }

    /// Poll a document until it completes, fails, or `wait` runs out.
    pub fn wait_for(
        &self,
        document_id: &str,
        wait: WaitBudget,
        polling_interval: Duration,
    ) -> Result<ExtractResponse> {
        block_on(self.service.wait_for(document_id, wait, polling_interval))
    }

    /// Compute sparse embeddings.
    pub fn embedding(&self, request: impl Into<EmbeddingRequest>) -> Result<EmbeddingResponse> {
        block_on(self.service.embedding(&request.into()))
    }
}
