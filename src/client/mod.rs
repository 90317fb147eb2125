//! Client surfaces and the service they share.
//!
//! [`AsyncClient`] and [`BlockingClient`] are thin shells over [`Service`], which builds
//! requests, runs them through the retry controller, and decides whether an extraction needs
//! polling. The service is generic over the [`Transport`], so the lifecycle logic exists once.

mod asynchronous;
mod blocking;

pub use asynchronous::AsyncClient;
pub use blocking::BlockingClient;

use crate::error::{ApiError, Result};
use crate::lifecycle::{
    self, DEFAULT_REQUEST_TIMEOUT, DEFAULT_RETRIES, DEFAULT_WAIT, POLLING_INTERVAL, PollContext,
    WaitBudget,
};
use crate::schema::{
    ChunkRequestPayload, ChunkResponse, ChunkingOptions, EmbeddingInput, EmbeddingModel,
    EmbeddingResponse, ExtractResponse, ProcessingQuality,
};
use crate::transport::{ApiRequest, RequestBody, Transport};
use crate::upload::UploadSource;
use reqwest::Url;
use serde_json::json;
use std::time::Duration;

/// Default timeout of a chunking call.
pub const DEFAULT_CHUNK_TIMEOUT: Duration = Duration::from_secs(60);

/// Per-call timeout and retry budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestSettings {
    /// Timeout of each attempt; `None` waits indefinitely.
    pub timeout: Option<Duration>,
    /// Maximum number of attempts, at least 1.
    pub retries: u32,
}

impl Default for RequestSettings {
    fn default() -> Self {
        Self {
            timeout: Some(DEFAULT_REQUEST_TIMEOUT),
            retries: DEFAULT_RETRIES,
        }
    }
}

/// Content to chunk plus call settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkRequest {
    /// Text to split.
    pub content: String,
    /// Chunker settings; the service defaults apply when `None`.
    pub processing_options: Option<ChunkingOptions>,
    /// Timeout and retry budget.
    pub settings: RequestSettings,
}

impl ChunkRequest {
    /// Chunk `content` with service-side defaults and a 60 second timeout.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            processing_options: None,
            settings: RequestSettings {
                timeout: Some(DEFAULT_CHUNK_TIMEOUT),
                retries: DEFAULT_RETRIES,
            },
        }
    }

    /// Set the chunker options.
    pub fn with_options(mut self, options: ChunkingOptions) -> Self {
        self.processing_options = Some(options);
        self
    }

    /// Set the per-attempt timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.settings.timeout = Some(timeout);
        self
    }

    /// Set the maximum number of attempts.
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.settings.retries = retries;
        self
    }
}

impl From<&str> for ChunkRequest {
    fn from(content: &str) -> Self {
        Self::new(content)
    }
}

impl From<String> for ChunkRequest {
    fn from(content: String) -> Self {
        Self::new(content)
    }
}

/// Settings shared by file and URL extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Processing quality.
    pub quality: ProcessingQuality,
    /// Whether the extracted text should be chunked.
    pub chunk: bool,
    /// How long to wait for a terminal status.
    pub wait: WaitBudget,
    /// Delay between status checks; zero disables polling and lets the service hold the
    /// submission open for the whole wait instead.
    pub polling_interval: Duration,
    /// Maximum number of attempts per request.
    pub retries: u32,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            quality: ProcessingQuality::Low,
            chunk: true,
            wait: WaitBudget::Limited(DEFAULT_WAIT),
            polling_interval: POLLING_INTERVAL,
            retries: DEFAULT_RETRIES,
        }
    }
}

impl ExtractOptions {
    /// Set the processing quality.
    pub fn with_quality(mut self, quality: ProcessingQuality) -> Self {
        self.quality = quality;
        self
    }

    /// Enable or disable chunking.
    pub fn with_chunk(mut self, chunk: bool) -> Self {
        self.chunk = chunk;
        self
    }

    /// Set the wait budget.
    pub fn with_wait(mut self, wait: WaitBudget) -> Self {
        self.wait = wait;
        self
    }

    /// Set the polling interval.
    pub fn with_polling_interval(mut self, polling_interval: Duration) -> Self {
        self.polling_interval = polling_interval;
        self
    }

    /// Set the maximum number of attempts.
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    fn polling_enabled(&self) -> bool {
        !self.polling_interval.is_zero()
    }

    fn form_fields(&self) -> Vec<(String, String)> {
        vec![
            ("quality".to_string(), self.quality.as_str().to_string()),
            ("chunk".to_string(), self.chunk.to_string()),
            (
                "wait".to_string(),
                self.wait.submission_wait(self.polling_enabled()).to_string(),
            ),
        ]
    }
}

/// Texts to embed plus call settings.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingRequest {
    /// Text or batch of texts.
    pub input: EmbeddingInput,
    /// Embedding model.
    pub model: EmbeddingModel,
    /// Timeout and retry budget.
    pub settings: RequestSettings,
}

impl EmbeddingRequest {
    /// Embed `input` with BM25 and default settings.
    pub fn new(input: impl Into<EmbeddingInput>) -> Self {
        Self {
            input: input.into(),
            model: EmbeddingModel::Bm25,
            settings: RequestSettings::default(),
        }
    }

    /// Set the model.
    pub fn with_model(mut self, model: EmbeddingModel) -> Self {
        self.model = model;
        self
    }

    /// Set the call settings.
    pub fn with_settings(mut self, settings: RequestSettings) -> Self {
        self.settings = settings;
        self
    }
}

impl From<&str> for EmbeddingRequest {
    fn from(input: &str) -> Self {
        Self::new(input)
    }
}

impl From<Vec<String>> for EmbeddingRequest {
    fn from(input: Vec<String>) -> Self {
        Self::new(input)
    }
}

/// Request building and lifecycle orchestration over a transport.
#[derive(Debug, Clone)]
pub(crate) struct Service<T> {
    transport: T,
    base_url: String,
}

impl<T: Transport> Service<T> {
    pub(crate) fn new(transport: T, base_url: String) -> Self {
        Self {
            transport,
            base_url,
        }
    }

    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format_endpoint(&self.base_url, path)
    }

    pub(crate) async fn chunk(&self, request: &ChunkRequest) -> Result<ChunkResponse> {
        if request.content.trim().is_empty() {
            return Err(ApiError::Validation("content must not be empty".to_string()));
        }
        let payload = ChunkRequestPayload {
            content: request.content.clone(),
            processing_options: request.processing_options.clone(),
        };
        let body = serde_json::to_value(&payload)
            .map_err(|error| ApiError::Validation(format!("unserializable payload: {error}")))?;
        let api_request = ApiRequest::post(
            self.endpoint("v1/chunk"),
            RequestBody::Json(body),
            request.settings.timeout,
        );
        tracing::debug!(
            url = %api_request.url,
            content_len = request.content.len(),
            "Submitting chunk request"
        );
        lifecycle::call(&self.transport, &api_request, request.settings.retries).await
    }

    pub(crate) async fn extract_file(
        &self,
        file: &UploadSource,
        options: &ExtractOptions,
    ) -> Result<ExtractResponse> {
        file.validate().map_err(ApiError::Validation)?;
        let body = RequestBody::Multipart {
            fields: options.form_fields(),
            file: file.clone(),
        };
        let request = ApiRequest::post(
            self.endpoint("v1/extract/file"),
            body,
            options.wait.submission_timeout(),
        );
        tracing::debug!(url = %request.url, file_name = %file.file_name(), "Submitting file extraction");
        self.extract(request, options).await
    }

    pub(crate) async fn extract_url(&self, url: &str, options: &ExtractOptions) -> Result<ExtractResponse> {
        validate_source_url(url)?;
        let mut fields = vec![("url".to_string(), url.to_string())];
        fields.extend(options.form_fields());
        let request = ApiRequest::post(
            self.endpoint("v1/extract/url"),
            RequestBody::Form(fields),
            options.wait.submission_timeout(),
        );
        tracing::debug!(url = %request.url, source = url, "Submitting URL extraction");
        self.extract(request, options).await
    }

    /// Submit, then poll unless the budget or the response makes polling pointless.
    async fn extract(&self, request: ApiRequest, options: &ExtractOptions) -> Result<ExtractResponse> {
        let submitted: ExtractResponse =
            lifecycle::call(&self.transport, &request, options.retries).await?;

        if options.wait.is_immediate() {
            return Ok(submitted);
        }
        if submitted.status.is_terminal() || !options.polling_enabled() {
            return Ok(submitted);
        }

        let settings = RequestSettings {
            retries: options.retries,
            ..RequestSettings::default()
        };
        self.poll(&submitted.document.id, options.wait, options.polling_interval, settings)
            .await
    }

    pub(crate) async fn get_document(
        &self,
        document_id: &str,
        settings: RequestSettings,
    ) -> Result<ExtractResponse> {
        validate_document_id(document_id)?;
        let request = ApiRequest::get(
            document_endpoint(&self.base_url, document_id)?,
            settings.timeout,
        );
        lifecycle::call(&self.transport, &request, settings.retries).await
    }

    pub(crate) async fn wait_for(
        &self,
        document_id: &str,
        wait: WaitBudget,
        polling_interval: Duration,
    ) -> Result<ExtractResponse> {
        validate_document_id(document_id)?;
        self.poll(document_id, wait, polling_interval, RequestSettings::default())
            .await
    }

    async fn poll(
        &self,
        document_id: &str,
        wait: WaitBudget,
        polling_interval: Duration,
        settings: RequestSettings,
    ) -> Result<ExtractResponse> {
        let context = PollContext::start(document_id, wait, polling_interval);
        lifecycle::poll_until_terminal(&self.transport, &context, || {
            self.get_document(document_id, settings)
        })
        .await
    }

    pub(crate) async fn embedding(&self, request: &EmbeddingRequest) -> Result<EmbeddingResponse> {
        if request.input.is_empty() {
            return Err(ApiError::Validation("embedding input must not be empty".to_string()));
        }
        let body = json!({ "input": request.input, "model": request.model });
        let api_request = ApiRequest::post(
            self.endpoint("v1/embeddings"),
            RequestBody::Json(body),
            request.settings.timeout,
        );
        lifecycle::call(&self.transport, &api_request, request.settings.retries).await
    }
}

fn format_endpoint(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{base}/{path}")
}

/// Status endpoint of a document, with the id percent-encoded as one path segment.
fn document_endpoint(base: &str, document_id: &str) -> Result<String> {
    let mut url = Url::parse(&format_endpoint(base, "v1/extract/document"))
        .map_err(|error| ApiError::Validation(format!("invalid base URL '{base}': {error}")))?;
    url.path_segments_mut()
        .map_err(|()| ApiError::Validation(format!("base URL '{base}' cannot carry a path")))?
        .push(document_id);
    Ok(url.into())
}

fn validate_source_url(url: &str) -> Result<()> {
    let parsed = Url::parse(url)
        .map_err(|error| ApiError::Validation(format!("invalid source URL '{url}': {error}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ApiError::Validation(format!(
            "source URL must use http or https, got '{}'",
            parsed.scheme()
        )));
    }
    Ok(())
}

fn validate_document_id(document_id: &str) -> Result<()> {
    if document_id.trim().is_empty()
        || document_id.contains('/')
        || matches!(document_id, "." | "..")
    {
        return Err(ApiError::Validation(format!(
            "invalid document id '{document_id}'"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_join_cleanly() {
        assert_eq!(
            format_endpoint("http://localhost:1234/", "/v1/chunk"),
            "http://localhost:1234/v1/chunk"
        );
        assert_eq!(
            format_endpoint("https://api.aurelio.ai", "v1/extract/document/doc_1"),
            "https://api.aurelio.ai/v1/extract/document/doc_1"
        );
    }

    #[test]
    fn extract_form_fields_follow_polling_mode() {
        let polling = ExtractOptions::default().with_wait(WaitBudget::from_secs(60));
        assert_eq!(
            polling.form_fields(),
            vec![
                ("quality".to_string(), "low".to_string()),
                ("chunk".to_string(), "true".to_string()),
                ("wait".to_string(), "10".to_string()),
            ]
        );

        let long_poll = polling
            .with_polling_interval(Duration::ZERO)
            .with_quality(ProcessingQuality::High)
            .with_chunk(false);
        assert_eq!(
            long_poll.form_fields(),
            vec![
                ("quality".to_string(), "high".to_string()),
                ("chunk".to_string(), "false".to_string()),
                ("wait".to_string(), "60".to_string()),
            ]
        );
    }

    #[test]
    fn request_defaults() {
        let chunk = ChunkRequest::from("text");
        assert_eq!(chunk.settings.timeout, Some(DEFAULT_CHUNK_TIMEOUT));
        assert_eq!(chunk.settings.retries, 3);
        assert!(chunk.processing_options.is_none());

        let embedding = EmbeddingRequest::from("text");
        assert_eq!(embedding.model, EmbeddingModel::Bm25);
        assert_eq!(embedding.settings, RequestSettings::default());

        let extract = ExtractOptions::default();
        assert_eq!(extract.wait, WaitBudget::Limited(Duration::from_secs(30)));
        assert_eq!(extract.polling_interval, Duration::from_secs(5));
    }

    #[test]
    fn source_urls_are_validated() {
        assert!(validate_source_url("https://arxiv.org/pdf/2408.15291").is_ok());
        assert!(validate_source_url("not a url").is_err());
        assert!(validate_source_url("file:///etc/passwd").is_err());
    }

    #[test]
    fn document_ids_are_validated() {
        assert!(validate_document_id("doc_123").is_ok());
        assert!(validate_document_id("  ").is_err());
        assert!(validate_document_id("../chunk").is_err());
        assert!(validate_document_id("..").is_err());
    }

    #[test]
    fn document_ids_are_encoded_as_one_segment() {
        assert_eq!(
            document_endpoint("https://api.aurelio.ai", "doc_1").expect("url"),
            "https://api.aurelio.ai/v1/extract/document/doc_1"
        );
        assert_eq!(
            document_endpoint("http://localhost:1234", "doc?x=1#frag").expect("url"),
            "http://localhost:1234/v1/extract/document/doc%3Fx=1%23frag"
        );
        assert_eq!(
            document_endpoint("http://localhost:1234/proxy", "a b").expect("url"),
            "http://localhost:1234/proxy/v1/extract/document/a%20b"
        );
    }
}
