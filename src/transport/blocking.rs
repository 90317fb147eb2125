//! Thread-blocking transport backed by `reqwest::blocking`.

use super::{ApiRequest, RawResponse, RequestBody, Transport, TransportError, USER_AGENT, auth_headers};
use crate::config::ConfigError;
use crate::upload::{FileChunks, UploadSource};
use async_trait::async_trait;
use reqwest::blocking::Client;
use reqwest::blocking::multipart::{Form, Part};
use std::time::Duration;

/// Blocking transport. Every call, including sleeps between polls, runs to completion on
/// the calling thread; the futures it returns never yield.
///
/// Like `reqwest::blocking`, it must not be used from inside an async runtime.
#[derive(Debug, Clone)]
pub struct BlockingTransport {
    client: Client,
}

impl BlockingTransport {
    /// Build a transport that authenticates every request with `api_key`.
    pub fn new(api_key: &str) -> Result<Self, ConfigError> {
        let headers = auth_headers(api_key).ok_or(ConfigError::InvalidApiKey)?;
        // Per-request timeouts only; the blocking client would otherwise default to 30s.
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(None::<Duration>)
            .build()?;
        Ok(Self { client })
    }

    fn send(&self, request: &ApiRequest) -> Result<RawResponse, TransportError> {
        let mut builder = self
            .client
            .request(request.method.clone(), request.url.as_str());
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }
        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Form(fields) => builder.form(fields),
            RequestBody::Multipart { fields, file } => builder.multipart(multipart_form(fields, file)?),
        };

        let response = builder.send()?;
        let status = response.status().as_u16();
        let body = response.text()?;
        tracing::trace!(url = %request.url, status, bytes = body.len(), "Received response");
        Ok(RawResponse { status, body })
    }
}

#[async_trait]
impl Transport for BlockingTransport {
    async fn execute(&self, request: &ApiRequest) -> Result<RawResponse, TransportError> {
        self.send(request)
    }

    async fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

fn multipart_form(
    fields: &[(String, String)],
    file: &UploadSource,
) -> Result<Form, TransportError> {
    let mut form = Form::new();
    for (name, value) in fields {
        form = form.text(name.clone(), value.clone());
    }

    let part = match file {
        UploadSource::Bytes { file_name, data } => {
            Part::bytes(data.clone()).file_name(file_name.clone())
        }
        UploadSource::Path(path) => {
            let chunks = FileChunks::open(path)
                .map_err(|error| TransportError::Other(format!("failed to open upload: {error}")))?;
            let length = chunks.expected_len();
            tracing::debug!(path = %path.display(), bytes = length, "Streaming upload from disk");
            Part::reader_with_length(chunks.into_reader(), length).file_name(file.file_name())
        }
    };
    let part = match file.mime() {
        Some(mime) => part.mime_str(mime)?,
        None => part,
    };
    Ok(form.part("file", part))
}
