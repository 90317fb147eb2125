//! Request lifecycle: retries, response mapping, and completion polling.
//!
//! Both clients run the same code from this module; only the [`crate::transport::Transport`]
//! they plug in differs.

mod poll;
mod retry;

pub(crate) use poll::{PollContext, poll_until_terminal};
pub(crate) use retry::call;

use std::time::{Duration, Instant};

/// Attempts made per call unless overridden.
pub const DEFAULT_RETRIES: u32 = 3;
/// Delay between status checks while waiting for an extraction.
pub const POLLING_INTERVAL: Duration = Duration::from_secs(5);
/// Longest the service is asked to hold a submission open before polling takes over.
pub const WAIT_TIME_BEFORE_POLLING: Duration = Duration::from_secs(10);
/// Request timeout used when no wait-derived timeout applies.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// Wait budget used unless overridden.
pub const DEFAULT_WAIT: Duration = Duration::from_secs(30);

/// How long an extraction call may wait for the document to reach a terminal status.
///
/// Running out of budget is not an error: the call returns the last observed response,
/// typically still `pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitBudget {
    /// Return the submission response as-is, without polling.
    Immediate,
    /// Wait at most this long.
    Limited(Duration),
    /// Wait until the document completes or fails.
    Unbounded,
}

impl Default for WaitBudget {
    fn default() -> Self {
        Self::Limited(DEFAULT_WAIT)
    }
}

impl WaitBudget {
    /// Map the API's integer convention: `-1` (any negative) is unbounded, `0` immediate.
    pub fn from_secs(secs: i64) -> Self {
        match secs {
            secs if secs < 0 => Self::Unbounded,
            0 => Self::Immediate,
            secs => Self::Limited(Duration::from_secs(secs.unsigned_abs())),
        }
    }

    /// Bounded budget; a zero duration means [`WaitBudget::Immediate`].
    pub fn limited(duration: Duration) -> Self {
        if duration.is_zero() {
            Self::Immediate
        } else {
            Self::Limited(duration)
        }
    }

    /// Whether the call returns without polling.
    pub fn is_immediate(self) -> bool {
        match self {
            Self::Immediate => true,
            Self::Limited(duration) => duration.is_zero(),
            Self::Unbounded => false,
        }
    }

    /// Integer seconds in the API's convention, rounding partial seconds up.
    pub fn as_wire_secs(self) -> i64 {
        match self {
            Self::Immediate => 0,
            Self::Limited(duration) => i64::try_from(ceil_secs(duration)).unwrap_or(i64::MAX),
            Self::Unbounded => -1,
        }
    }

    /// `wait` field sent with an extraction submission.
    ///
    /// With polling enabled the service holds the request for at most
    /// [`WAIT_TIME_BEFORE_POLLING`]; otherwise it is asked to hold it for the whole budget.
    pub(crate) fn submission_wait(self, polling_enabled: bool) -> i64 {
        if self.is_immediate() {
            return 0;
        }
        if !polling_enabled {
            return self.as_wire_secs();
        }
        let initial = WaitBudget::Limited(WAIT_TIME_BEFORE_POLLING).as_wire_secs();
        match self {
            Self::Unbounded => initial,
            _ => initial.min(self.as_wire_secs()),
        }
    }

    /// Request timeout for an extraction submission: the budget plus one second, so the
    /// service can answer with the document id right at the deadline.
    pub(crate) fn submission_timeout(self) -> Option<Duration> {
        match self {
            Self::Limited(duration) if !duration.is_zero() => {
                Some(duration.saturating_add(Duration::from_secs(1)))
            }
            Self::Unbounded => None,
            _ => Some(DEFAULT_REQUEST_TIMEOUT),
        }
    }

    /// Absolute deadline for a wait starting at `start`; `None` when unbounded, including
    /// budgets too large to represent as an instant.
    pub(crate) fn deadline_from(self, start: Instant) -> Option<Instant> {
        match self {
            Self::Immediate => Some(start),
            Self::Limited(duration) => start.checked_add(duration),
            Self::Unbounded => None,
        }
    }
}

fn ceil_secs(duration: Duration) -> u64 {
    let secs = duration.as_secs();
    if duration.subsec_nanos() > 0 {
        secs.saturating_add(1)
    } else {
        secs
    }
}
