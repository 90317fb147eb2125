//! Request execution seam.
//!
//! A [`Transport`] performs exactly one HTTP exchange and reports the raw status and body. It
//! also provides the suspension primitive used between polls. The retry and polling logic
//! in [`crate::lifecycle`] is written once against this trait and instantiated with
//! [`ReqwestTransport`] (cooperative, tokio) or [`BlockingTransport`] (blocks the thread).

mod blocking;
mod http;

pub use self::blocking::BlockingTransport;
pub use self::http::ReqwestTransport;

use crate::upload::UploadSource;
use async_trait::async_trait;
use reqwest::Method;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Body shapes accepted by the API.
#[derive(Debug, Clone)]
pub enum RequestBody {
    /// No body (status lookups).
    Empty,
    /// JSON document (chunk, embeddings).
    Json(Value),
    /// URL-encoded form (extract from URL).
    Form(Vec<(String, String)>),
    /// Multipart form with one file part named `file` (extract from file).
    Multipart {
        /// Plain text fields sent alongside the file.
        fields: Vec<(String, String)>,
        /// File content; reopened from the start for every attempt.
        file: UploadSource,
    },
}

/// One HTTP call, described independently of the client executing it.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute endpoint URL.
    pub url: String,
    /// Request body.
    pub body: RequestBody,
    /// Total time allowed for the exchange; `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl ApiRequest {
    /// GET request without a body.
    pub fn get(url: String, timeout: Option<Duration>) -> Self {
        Self {
            method: Method::GET,
            url,
            body: RequestBody::Empty,
            timeout,
        }
    }

    /// POST request with the given body.
    pub fn post(url: String, body: RequestBody, timeout: Option<Duration>) -> Self {
        Self {
            method: Method::POST,
            url,
            body,
            timeout,
        }
    }
}

/// Status and body of a completed exchange, uninterpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body as text.
    pub body: String,
}

/// Failures below the HTTP layer.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The request exceeded its timeout.
    #[error("request timed out")]
    Timeout,
    /// The connection could not be established.
    #[error("connection failed: {0}")]
    Connect(String),
    /// Any other failure: reset connection, unreadable body, upload I/O.
    #[error("{0}")]
    Other(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else if error.is_connect() {
            Self::Connect(error.to_string())
        } else {
            Self::Other(error.to_string())
        }
    }
}

/// Executes HTTP exchanges and suspends between polls.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform one exchange. Non-2xx statuses are returned as responses, not errors.
    async fn execute(&self, request: &ApiRequest) -> Result<RawResponse, TransportError>;

    /// Suspend the caller for `duration`.
    async fn sleep(&self, duration: Duration);
}

/// Default headers carrying the bearer credential.
pub(crate) fn auth_headers(api_key: &str) -> Option<HeaderMap> {
    let mut value = HeaderValue::from_str(&format!("Bearer {api_key}")).ok()?;
    value.set_sensitive(true);
    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, value);
    Some(headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_header_is_bearer_and_sensitive() {
        let headers = auth_headers("secret").expect("headers");
        let value = headers.get(AUTHORIZATION).expect("authorization");
        assert_eq!(value.to_str().expect("ascii"), "Bearer secret");
        assert!(value.is_sensitive());
    }

    #[test]
    fn control_characters_cannot_form_a_header() {
        assert!(auth_headers("bad\nkey").is_none());
    }

    #[test]
    fn request_constructors_set_method() {
        let get = ApiRequest::get("http://x/v1/extract/document/doc".into(), None);
        assert_eq!(get.method, Method::GET);
        assert!(matches!(get.body, RequestBody::Empty));

        let post = ApiRequest::post(
            "http://x/v1/chunk".into(),
            RequestBody::Json(Value::Null),
            Some(Duration::from_secs(1)),
        );
        assert_eq!(post.method, Method::POST);
        assert_eq!(post.timeout, Some(Duration::from_secs(1)));
    }
}
