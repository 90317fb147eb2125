//! Completion polling for extraction jobs.

use super::WaitBudget;
use crate::error::ApiError;
use crate::schema::ExtractResponse;
use crate::transport::Transport;
use std::future::Future;
use std::time::{Duration, Instant};

/// State of one wait on a document, from the first status check until a terminal status
/// or the deadline.
#[derive(Debug, Clone)]
pub(crate) struct PollContext {
    document_id: String,
    deadline: Option<Instant>,
    interval: Duration,
    single_check: bool,
}

impl PollContext {
    /// Start the clock now. An immediate budget or a zero interval allows a single check.
    pub(crate) fn start(document_id: &str, wait: WaitBudget, interval: Duration) -> Self {
        Self {
            document_id: document_id.to_string(),
            deadline: wait.deadline_from(Instant::now()),
            interval,
            single_check: wait.is_immediate() || interval.is_zero(),
        }
    }

    pub(crate) fn expired_at(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|deadline| now > deadline)
    }
}

/// Fetch the status until it is terminal or the deadline passes, sleeping through
/// `transport` between checks.
///
/// At least one check is always made. Reaching the deadline is not an error: the last
/// fetched response is returned as-is.
pub(crate) async fn poll_until_terminal<T, F, Fut>(
    transport: &T,
    context: &PollContext,
    mut fetch: F,
) -> Result<ExtractResponse, ApiError>
where
    T: Transport + ?Sized,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<ExtractResponse, ApiError>>,
{
    tracing::debug!(
        document_id = %context.document_id,
        interval_ms = context.interval.as_millis() as u64,
        bounded = context.deadline.is_some(),
        "Polling for document completion"
    );
    let mut response = fetch().await?;
    let mut checks = 1u32;

    while !response.status.is_terminal() && !context.single_check {
        transport.sleep(context.interval).await;

        if context.expired_at(Instant::now()) {
            tracing::debug!(
                document_id = %context.document_id,
                checks,
                status = %response.status,
                "Wait budget exhausted before completion"
            );
            break;
        }

        response = fetch().await?;
        checks += 1;
        tracing::debug!(
            document_id = %context.document_id,
            checks,
            status = %response.status,
            "Polled document"
        );
    }

    Ok(response)
}
