//! Blocking Superwise client.
//!
//! `analyze` never returns an error and never panics: every exit path is a classified
//! `AnalysisResult`. Each call builds its own HTTP client, so calls share no connection and no
//! retry counter.

use crate::config::{SuperwiseConfig, SuperwiseEndpoint};
use crate::constants::{ANSWER_FIELDS, USER_AGENT};
use crate::excerpt::PatientClinicalExcerpt;
use crate::request::AnalysisRequest;
use crate::result::AnalysisResult;
use crate::retry::{AttemptOutcome, CallState};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Anything that can turn a clinical excerpt into an `AnalysisResult`.
///
/// The REST layer holds a `dyn InsightProvider` so handlers can be tested with a canned
/// provider instead of a live endpoint.
pub trait InsightProvider: Send + Sync {
    /// Run one analysis. `correlation_id` only tags log entries.
    fn analyze(&self, excerpt: &PatientClinicalExcerpt, correlation_id: &str) -> AnalysisResult;

    /// Whether the provider has enough configuration to attempt a call.
    fn is_configured(&self) -> bool;
}

/// Client for the Superwise `ask` endpoint.
#[derive(Clone, Debug)]
pub struct SuperwiseClient {
    cfg: Arc<SuperwiseConfig>,
}

impl SuperwiseClient {
    pub fn new(cfg: Arc<SuperwiseConfig>) -> Self {
        Self { cfg }
    }

    pub fn config(&self) -> &SuperwiseConfig {
        &self.cfg
    }

    /// Send the excerpt for analysis, retrying transient failures per the configured policy.
    ///
    /// Configuration is validated here rather than at load time; a missing URL or app id yields
    /// `AnalysisResult::ConfigError` without touching the network.
    pub fn analyze(
        &self,
        excerpt: &PatientClinicalExcerpt,
        correlation_id: &str,
    ) -> AnalysisResult {
        let started = Instant::now();

        let endpoint = match self.cfg.endpoint() {
            Ok(endpoint) => endpoint,
            Err(e) => {
                let result = AnalysisResult::ConfigError {
                    reason: e.to_string(),
                };
                return finish(correlation_id, 0, started, result);
            }
        };

        // One client per call; nothing is pooled across analyses.
        let http = match Client::builder()
            .timeout(self.cfg.timeout())
            .user_agent(USER_AGENT)
            .build()
        {
            Ok(http) => http,
            Err(e) => {
                let result = AnalysisResult::UnexpectedError {
                    reason: format!("failed to build HTTP client: {}", e),
                };
                return finish(correlation_id, 0, started, result);
            }
        };

        let request = AnalysisRequest::from_excerpt(excerpt);
        let policy = self.cfg.retry_policy();

        tracing::info!(
            correlation_id,
            url = %endpoint.url(),
            max_attempts = policy.max_attempts(),
            "calling Superwise API"
        );

        let mut attempts = 0;
        let mut state = CallState::NotStarted;
        loop {
            state = match state {
                CallState::NotStarted => CallState::NotStarted.advance(),
                CallState::Sending { attempt } => {
                    attempts = attempt;
                    let attempt_started = Instant::now();
                    let outcome = send_once(&http, &endpoint, &request);
                    log_attempt(correlation_id, attempt, attempt_started.elapsed(), &outcome);
                    policy.on_outcome(attempt, outcome)
                }
                CallState::Retrying { attempt, last } => {
                    tracing::warn!(
                        correlation_id,
                        attempt,
                        outcome = last.label(),
                        delay_ms = millis(policy.delay()),
                        "Superwise attempt failed, retrying"
                    );
                    std::thread::sleep(policy.delay());
                    CallState::Retrying { attempt, last }.advance()
                }
                CallState::Succeeded { text } => {
                    return finish(
                        correlation_id,
                        attempts,
                        started,
                        AnalysisResult::Success { text },
                    );
                }
                CallState::Failed { result } => {
                    return finish(correlation_id, attempts, started, result);
                }
            };
        }
    }
}

impl InsightProvider for SuperwiseClient {
    fn analyze(&self, excerpt: &PatientClinicalExcerpt, correlation_id: &str) -> AnalysisResult {
        SuperwiseClient::analyze(self, excerpt, correlation_id)
    }

    fn is_configured(&self) -> bool {
        self.cfg.is_valid()
    }
}

fn send_once(
    http: &Client,
    endpoint: &SuperwiseEndpoint,
    request: &AnalysisRequest,
) -> AttemptOutcome {
    let response = match http
        .post(endpoint.url().clone())
        .bearer_auth(endpoint.app_id())
        .json(request)
        .send()
    {
        Ok(response) => response,
        Err(e) => return classify_transport_error(&e),
    };

    let status = response.status();
    let body = match response.text() {
        Ok(body) => body,
        Err(e) => return classify_transport_error(&e),
    };

    if status == StatusCode::OK {
        extract_answer(&body)
    } else {
        AttemptOutcome::Status {
            status_code: status.as_u16(),
            body,
        }
    }
}

fn classify_transport_error(e: &reqwest::Error) -> AttemptOutcome {
    if e.is_builder() {
        AttemptOutcome::Rejected(e.to_string())
    } else if e.is_timeout() {
        AttemptOutcome::TimedOut
    } else {
        AttemptOutcome::NetworkFailure(e.to_string())
    }
}

/// Pull the answer text out of a 200 response body.
///
/// Looks for a string under `answer`, then `output`. Anything else is `Malformed`, never an
/// empty answer.
pub fn extract_answer(body: &str) -> AttemptOutcome {
    let value: serde_json::Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(e) => {
            return AttemptOutcome::Malformed {
                reason: format!("response body is not valid JSON: {}", e),
                body: body.to_string(),
            }
        }
    };

    ANSWER_FIELDS
        .iter()
        .find_map(|field| value.get(field).and_then(serde_json::Value::as_str))
        .map(|text| AttemptOutcome::Answered(text.to_string()))
        .unwrap_or_else(|| AttemptOutcome::Malformed {
            reason: format!(
                "response body has no string field named any of: {}",
                ANSWER_FIELDS.join(", ")
            ),
            body: body.to_string(),
        })
}

fn log_attempt(correlation_id: &str, attempt: u32, elapsed: Duration, outcome: &AttemptOutcome) {
    let elapsed_ms = millis(elapsed);
    match outcome {
        AttemptOutcome::Malformed { reason, body } => tracing::error!(
            correlation_id,
            attempt,
            elapsed_ms,
            outcome = outcome.label(),
            %reason,
            raw_body = %body,
            "Superwise attempt returned a malformed answer"
        ),
        AttemptOutcome::Status { status_code, body } => tracing::warn!(
            correlation_id,
            attempt,
            elapsed_ms,
            outcome = outcome.label(),
            status_code,
            %body,
            "Superwise attempt returned an error status"
        ),
        _ => tracing::info!(
            correlation_id,
            attempt,
            elapsed_ms,
            outcome = outcome.label(),
            "Superwise attempt finished"
        ),
    }
}

fn finish(
    correlation_id: &str,
    attempts: u32,
    started: Instant,
    result: AnalysisResult,
) -> AnalysisResult {
    let elapsed_ms = millis(started.elapsed());
    if result.is_success() {
        tracing::info!(
            correlation_id,
            attempts,
            elapsed_ms,
            result = result.kind(),
            "Superwise call succeeded"
        );
    } else {
        tracing::error!(
            correlation_id,
            attempts,
            elapsed_ms,
            result = result.kind(),
            message = %result.user_message(),
            "Superwise call failed"
        );
    }
    result
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
