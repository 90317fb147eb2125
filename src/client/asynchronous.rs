use super::{ChunkRequest, EmbeddingRequest, ExtractOptions, RequestSettings, Service};
use crate::config::{ClientConfig, ConfigError};
use crate::error::Result;
use crate::lifecycle::WaitBudget;
use crate::logging::init_tracing;
use crate::schema::{ChunkResponse, EmbeddingResponse, ExtractResponse};
use crate::transport::ReqwestTransport;
use crate::upload::UploadSource;
use std::time::Duration;

/// Asynchronous client for the Aurelio document API.
///
/// Cloning is cheap: clones share the connection pool. Dropping a returned future cancels
/// the call, including any pending retry or poll sleep.
///
/// ```no_run
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// use aurelio_sdk::{AsyncClient, ClientConfig, ExtractOptions, UploadSource, WaitBudget};
///
/// let client = AsyncClient::new(ClientConfig::new("sk-test"))?;
/// let response = client
///     .extract_file(
///         UploadSource::path("paper.pdf"),
///         ExtractOptions::default().with_wait(WaitBudget::Unbounded),
///     )
///     .await?;
/// println!("{} chunks", response.document.num_chunks);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct AsyncClient {
    service: Service<ReqwestTransport>,
}

impl AsyncClient {
    /// Build a client from explicit configuration.
    pub fn new(config: ClientConfig) -> std::result::Result<Self, ConfigError> {
        if config.debug {
            init_tracing(true);
        }
        let (api_key, base_url) = config.validated()?;
        let transport = ReqwestTransport::new(&api_key)?;
        tracing::debug!(base_url = %base_url, "Async client ready");
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
    pub async fn chunk(&self, request: impl Into<ChunkRequest>) -> Result<ChunkResponse> {
        self.service.chunk(&request.into()).await
    }

    /// Upload a file for extraction and wait for it according to `options`.
    pub async fn extract_file(
        &self,
        file: UploadSource,
        options: ExtractOptions,
    ) -> Result<ExtractResponse> {
        self.service.extract_file(&file, &options).await
    }

    /// Submit a remote document for extraction and wait for it according to `options`.
    pub async fn extract_url(&self, url: &str, options: ExtractOptions) -> Result<ExtractResponse> {
        self.service.extract_url(url, &options).await
    }

    /// Fetch the current state of a document.
    pub async fn get_document(
        &self,
        document_id: &str,
        settings: RequestSettings,
    ) -> Result<ExtractResponse> {
        self.service.get_document(document_id, settings).await
    }

    /// Poll a document until it completes, fails, or `wait` runs out.
    pub async fn wait_for(
        &self,
        document_id: &str,
        wait: WaitBudget,
        polling_interval: Duration,
    ) -> Result<ExtractResponse> {
        self.service
            .wait_for(document_id, wait, polling_interval)
            .await
    }

    /// Compute sparse embeddings.
    pub async fn embedding(&self, request: impl Into<EmbeddingRequest>) -> Result<EmbeddingResponse> {
        self.service.embedding(&request.into()).await
    }
}
