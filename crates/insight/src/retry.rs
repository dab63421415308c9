//! Per-call state machine for the Superwise client.
//!
//! ```text
//! NotStarted -> Sending -> Succeeded
//!                       -> Retrying -> Sending
//!                       -> Failed
//! ```
//!
//! `RetryPolicy::on_outcome` is the only place that decides between retrying and giving up, so
//! the retry and timeout boundaries can be tested without a network.

use crate::result::AnalysisResult;
use std::time::Duration;

/// What a single HTTP attempt produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// HTTP 200 with an answer field.
    Answered(String),
    /// The per-attempt timeout expired.
    TimedOut,
    /// Connection refused/reset or another transport failure.
    NetworkFailure(String),
    /// Any status other than 200.
    Status { status_code: u16, body: String },
    /// HTTP 200 whose body is not JSON or lacks the answer field.
    Malformed { reason: String, body: String },
    /// The HTTP stack refused to build the request from the configured URL or credential.
    Rejected(String),
}

impl AttemptOutcome {
    /// Transport failures, timeouts and 5xx statuses are transient; everything else is final.
    pub fn is_retryable(&self) -> bool {
        match self {
            AttemptOutcome::TimedOut | AttemptOutcome::NetworkFailure(_) => true,
            AttemptOutcome::Status { status_code, .. } => (500..600).contains(status_code),
            AttemptOutcome::Answered(_)
            | AttemptOutcome::Malformed { .. }
            | AttemptOutcome::Rejected(_) => false,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AttemptOutcome::Answered(_) => "answered",
            AttemptOutcome::TimedOut => "timed_out",
            AttemptOutcome::NetworkFailure(_) => "network_failure",
            AttemptOutcome::Status { .. } => "http_status",
            AttemptOutcome::Malformed { .. } => "malformed",
            AttemptOutcome::Rejected(_) => "rejected",
        }
    }
}

impl From<AttemptOutcome> for AnalysisResult {
    fn from(outcome: AttemptOutcome) -> Self {
        match outcome {
            AttemptOutcome::Answered(text) => AnalysisResult::Success { text },
            AttemptOutcome::TimedOut => AnalysisResult::Timeout,
            AttemptOutcome::NetworkFailure(reason) => AnalysisResult::NetworkError { reason },
            AttemptOutcome::Status { status_code, body } => {
                AnalysisResult::ApiError { status_code, body }
            }
            AttemptOutcome::Malformed { reason, .. } => AnalysisResult::UnexpectedError { reason },
            AttemptOutcome::Rejected(reason) => AnalysisResult::ConfigError { reason },
        }
    }
}

/// State of one `analyze` call. Attempts are numbered from 1.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CallState {
    NotStarted,
    Sending { attempt: u32 },
    Retrying { attempt: u32, last: AttemptOutcome },
    Succeeded { text: String },
    Failed { result: AnalysisResult },
}

impl CallState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, CallState::Succeeded { .. } | CallState::Failed { .. })
    }

    /// Moves the states that do not wait on an attempt outcome.
    ///
    /// `NotStarted` begins attempt 1 and `Retrying` begins the next attempt. Every other state is
    /// returned unchanged.
    pub fn advance(self) -> CallState {
        match self {
            CallState::NotStarted => CallState::Sending { attempt: 1 },
            CallState::Retrying { attempt, .. } => CallState::Sending {
                attempt: attempt.saturating_add(1),
            },
            other => other,
        }
    }
}

/// Fixed-delay retry policy: up to `max_retries` retries after the first attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    max_retries: u32,
    delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, delay: Duration) -> Self {
        Self { max_retries, delay }
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Decide the next state after attempt number `attempt` produced `outcome`.
    pub fn on_outcome(&self, attempt: u32, outcome: AttemptOutcome) -> CallState {
        match outcome {
            AttemptOutcome::Answered(text) => CallState::Succeeded { text },
            outcome if outcome.is_retryable() && attempt <= self.max_retries => {
                CallState::Retrying {
                    attempt,
                    last: outcome,
                }
            }
            outcome => CallState::Failed {
                result: outcome.into(),
            },
        }
    }
}
