//! Cooperative transport backed by the async reqwest client.

use super::{ApiRequest, RawResponse, RequestBody, Transport, TransportError, USER_AGENT, auth_headers};
use crate::config::ConfigError;
use crate::upload::{UPLOAD_CHUNK_SIZE, UploadSource, file_chunk_stream};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client};
use std::time::Duration;

/// Async transport. Network calls and sleeps yield to the tokio scheduler, and dropping an
/// in-flight call aborts the underlying request.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Build a transport that authenticates every request with `api_key`.
    pub fn new(api_key: &str) -> Result<Self, ConfigError> {
        let headers = auth_headers(api_key).ok_or(ConfigError::InvalidApiKey)?;
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: &ApiRequest) -> Result<RawResponse, TransportError> {
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
            RequestBody::Multipart { fields, file } => {
                builder.multipart(multipart_form(fields, file).await?)
            }
        };

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        tracing::trace!(url = %request.url, status, bytes = body.len(), "Received response");
        Ok(RawResponse { status, body })
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

async fn multipart_form(
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
            let length = tokio::fs::metadata(path)
                .await
                .map_err(|error| TransportError::Other(format!("failed to open upload: {error}")))?
                .len();
            tracing::debug!(path = %path.display(), bytes = length, "Streaming upload from disk");
            let stream = file_chunk_stream(path.clone(), UPLOAD_CHUNK_SIZE);
            Part::stream_with_length(Body::wrap_stream(stream), length).file_name(file.file_name())
        }
    };
    let part = match file.mime() {
        Some(mime) => part.mime_str(mime)?,
        None => part,
    };
    Ok(form.part("file", part))
}
