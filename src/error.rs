//! Error taxonomy shared by the async and blocking clients.

use std::time::Duration;
use thiserror::Error;

/// Convenience alias for results returned by client operations.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Failures surfaced by client operations.
///
/// The set is closed so callers can match exhaustively. Every variant produced after a
/// network round-trip carries the full endpoint `url`, which includes the base URL and, for
/// document lookups, the document id.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Caller input was rejected before any request was sent.
    #[error("Invalid request: {0}")]
    Validation(String),
    /// A successful response body did not match the expected record.
    #[error("Malformed response from {url}: {detail}")]
    InvalidResponse {
        /// Endpoint that produced the body.
        url: String,
        /// Decoder diagnostic describing the mismatch.
        detail: String,
    },
    /// The API answered with HTTP 429. Never retried.
    #[error("Rate limit exceeded for {url}: {body}")]
    RateLimited {
        /// Endpoint that rejected the request.
        url: String,
        /// Raw body returned with the 429 response.
        body: String,
    },
    /// The API kept answering with a 5xx status until the retry budget ran out.
    #[error("Server error {status} from {url}: {body}")]
    ServerError {
        /// HTTP status of the final attempt.
        status: u16,
        /// Raw body of the final attempt.
        body: String,
        /// Endpoint that failed.
        url: String,
    },
    /// The API rejected the request with a non-retryable status.
    #[error("Request to {url} failed with status {status}: {body}")]
    ClientError {
        /// HTTP status returned by the API.
        status: u16,
        /// Raw body returned by the API.
        body: String,
        /// Endpoint that rejected the request.
        url: String,
    },
    /// Every attempt exceeded the request timeout.
    #[error("Request to {url} timed out (budget: {})", format_budget(.budget))]
    Timeout {
        /// Per-request timeout that was configured, if any.
        budget: Option<Duration>,
        /// Endpoint that timed out.
        url: String,
    },
    /// The final attempt failed below HTTP (connection reset, unreadable body, upload I/O).
    #[error("Request to {url} failed: {message}")]
    Transport {
        /// Description of the underlying failure.
        message: String,
        /// Endpoint being called.
        url: String,
    },
    /// The retry budget was spent without reaching a terminal outcome.
    #[error("No response from {url} after {attempts} attempts")]
    RetriesExhausted {
        /// Number of attempts performed.
        attempts: u32,
        /// Endpoint being called.
        url: String,
    },
}

impl ApiError {
    /// HTTP status attached to the error, when the failure came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RateLimited { .. } => Some(429),
            Self::ServerError { status, .. } | Self::ClientError { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the error stems from invalid input or an undecodable response.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::InvalidResponse { .. })
    }
}

fn format_budget(budget: &Option<Duration>) -> String {
    match budget {
        Some(duration) => format!("{}s", duration.as_secs_f64()),
        None => "none".to_string(),
    }
}
