//! Attempt classification and the retry loop.

use crate::error::ApiError;
use crate::transport::{ApiRequest, RawResponse, Transport, TransportError};
use serde::de::DeserializeOwned;
use serde_json::error::Category;

const STATUS_OK: u16 = 200;
const STATUS_TOO_MANY_REQUESTS: u16 = 429;
const STATUS_SERVER_ERROR: u16 = 500;

/// What to do after one attempt.
#[derive(Debug)]
pub(crate) enum Step<T> {
    /// Hand the value to the caller.
    Success(T),
    /// Try again immediately.
    Retry,
    /// Stop and surface the error.
    Fail(ApiError),
}

/// Attempt bookkeeping for a single call site invocation.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RetryContext {
    attempt: u32,
    max_attempts: u32,
}

impl RetryContext {
    pub(crate) fn new(max_attempts: u32) -> Result<Self, ApiError> {
        if max_attempts == 0 {
            return Err(ApiError::Validation(
                "retries must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            attempt: 0,
            max_attempts,
        })
    }

    /// Start the next attempt, returning its 1-based number, or `None` once the budget is spent.
    pub(crate) fn begin_attempt(&mut self) -> Option<u32> {
        if self.attempt >= self.max_attempts {
            return None;
        }
        self.attempt += 1;
        Some(self.attempt)
    }

    pub(crate) fn is_last(&self) -> bool {
        self.attempt >= self.max_attempts
    }

    /// Decide the next step from the outcome of the current attempt.
    ///
    /// 200 succeeds, 429 fails at once, 5xx retries until the last attempt, any other status
    /// fails at once. Timeouts and other transport failures retry until the last attempt.
    pub(crate) fn classify(
        &self,
        outcome: Result<RawResponse, TransportError>,
        request: &ApiRequest,
    ) -> Step<RawResponse> {
        let url = request.url.clone();
        match outcome {
            Ok(response) if response.status == STATUS_OK => Step::Success(response),
            Ok(response) if response.status == STATUS_TOO_MANY_REQUESTS => {
                tracing::warn!(url = %url, attempt = self.attempt, "Rate limit exceeded");
                Step::Fail(ApiError::RateLimited {
                    url,
                    body: response.body,
                })
            }
            Ok(response) if response.status >= STATUS_SERVER_ERROR => {
                if self.is_last() {
                    tracing::error!(
                        url = %url,
                        status = response.status,
                        attempts = self.attempt,
                        "Server error on final attempt"
                    );
                    Step::Fail(ApiError::ServerError {
                        status: response.status,
                        body: response.body,
                        url,
                    })
                } else {
                    tracing::debug!(
                        url = %url,
                        status = response.status,
                        attempt = self.attempt,
                        body = %response.body,
                        "Retrying after server error"
                    );
                    Step::Retry
                }
            }
            Ok(response) => Step::Fail(ApiError::ClientError {
                status: response.status,
                body: response.body,
                url,
            }),
            Err(TransportError::Timeout) => {
                if self.is_last() {
                    Step::Fail(ApiError::Timeout {
                        budget: request.timeout,
                        url,
                    })
                } else {
                    tracing::debug!(url = %url, attempt = self.attempt, "Timed out, retrying");
                    Step::Retry
                }
            }
            Err(error) => {
                if self.is_last() {
                    Step::Fail(ApiError::Transport {
                        message: error.to_string(),
                        url,
                    })
                } else {
                    tracing::debug!(
                        url = %url,
                        attempt = self.attempt,
                        error = %error,
                        "Retrying after transport failure"
                    );
                    Step::Retry
                }
            }
        }
    }

    /// Map a 200 body onto the expected record.
    ///
    /// Bodies that are not JSON at all (truncated, an HTML error page) retry like transport
    /// failures. JSON that does not match the record fails at once.
    pub(crate) fn decode<R: DeserializeOwned>(
        &self,
        response: &RawResponse,
        url: &str,
    ) -> Step<R> {
        let error = match serde_json::from_str(&response.body) {
            Ok(record) => return Step::Success(record),
            Err(error) => error,
        };
        match error.classify() {
            Category::Syntax | Category::Eof if self.is_last() => {
                tracing::error!(
                    url,
                    error = %error,
                    attempts = self.attempt,
                    "Undecodable body on final attempt"
                );
                Step::Fail(ApiError::Transport {
                    message: format!("invalid JSON body: {error}"),
                    url: url.to_string(),
                })
            }
            Category::Syntax | Category::Eof => {
                tracing::debug!(
                    url,
                    error = %error,
                    attempt = self.attempt,
                    "Retrying after undecodable body"
                );
                Step::Retry
            }
            Category::Data | Category::Io => {
                tracing::error!(url, error = %error, "Response does not match the expected record");
                Step::Fail(ApiError::InvalidResponse {
                    url: url.to_string(),
                    detail: error.to_string(),
                })
            }
        }
    }
}

/// Execute `request` up to `max_attempts` times, mapping each 200 response with `map`.
pub(crate) async fn execute_with_retry<T, R, M>(
    transport: &T,
    request: &ApiRequest,
    max_attempts: u32,
    mut map: M,
) -> Result<R, ApiError>
where
    T: Transport + ?Sized,
    M: FnMut(&RetryContext, RawResponse) -> Step<R>,
{
    let mut context = RetryContext::new(max_attempts)?;
    while let Some(attempt) = context.begin_attempt() {
        tracing::debug!(url = %request.url, method = %request.method, attempt, "Sending request");
        let outcome = transport.execute(request).await;
        let step = match context.classify(outcome, request) {
            Step::Success(response) => map(&context, response),
            Step::Retry => Step::Retry,
            Step::Fail(error) => Step::Fail(error),
        };
        match step {
            Step::Success(value) => {
                if attempt > 1 {
                    tracing::info!(
                        url = %request.url,
                        attempt,
                        "Request succeeded after {} failed attempts",
                        attempt - 1
                    );
                }
                return Ok(value);
            }
            Step::Retry => continue,
            Step::Fail(error) => return Err(error),
        }
    }
    Err(ApiError::RetriesExhausted {
        attempts: max_attempts,
        url: request.url.clone(),
    })
}

/// Retry, then decode. Undecodable bodies count as a failed attempt.
pub(crate) async fn call<T, R>(transport: &T, request: &ApiRequest, max_attempts: u32) -> Result<R, ApiError>
where
    T: Transport + ?Sized,
    R: DeserializeOwned,
{
    execute_with_retry(transport, request, max_attempts, |context, response| {
        context.decode(&response, &request.url)
    })
    .await
}
