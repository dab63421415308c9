//! Superwise runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the client behind an
//! `Arc`. Nothing in this crate reads environment variables while a call is in flight.
//!
//! Required settings (URL and app id) are validated lazily: a missing value is recorded as
//! `None` and only reported when a call is attempted, so the dashboard can run with the
//! integration unconfigured. Malformed numeric settings are rejected at load time.

use crate::constants::{
    DEFAULT_API_TIMEOUT_SECS, DEFAULT_API_VERSION, DEFAULT_MAX_RETRIES, DEFAULT_RETRY_DELAY_SECS,
    ENV_API_TIMEOUT, ENV_API_URL, ENV_API_VERSION, ENV_APP_ID, ENV_MAX_RETRIES, ENV_RETRY_DELAY,
};
use crate::error::{InsightError, InsightResult};
use crate::retry::RetryPolicy;
use std::time::Duration;

/// Superwise configuration resolved at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SuperwiseConfig {
    api_url: Option<String>,
    api_version: String,
    app_id: Option<String>,
    timeout: Duration,
    max_retries: u32,
    retry_delay: Duration,
}

/// A fully resolved request target: where to POST and which credential to present.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SuperwiseEndpoint {
    url: reqwest::Url,
    app_id: String,
}

impl SuperwiseEndpoint {
    pub fn url(&self) -> &reqwest::Url {
        &self.url
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }
}

impl SuperwiseConfig {
    /// Create a configuration with default timeout and retry settings.
    ///
    /// Blank strings are treated the same as absent values.
    pub fn new(
        api_url: Option<String>,
        api_version: Option<String>,
        app_id: Option<String>,
    ) -> Self {
        Self {
            api_url: non_blank(api_url),
            api_version: non_blank(api_version).unwrap_or_else(|| DEFAULT_API_VERSION.into()),
            app_id: non_blank(app_id),
            timeout: Duration::from_secs(DEFAULT_API_TIMEOUT_SECS),
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: Duration::from_secs(DEFAULT_RETRY_DELAY_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `InsightError::InvalidNumber` if `API_TIMEOUT`, `MAX_RETRIES` or `RETRY_DELAY`
    /// is set to something other than a non-negative integer.
    pub fn from_env() -> InsightResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// `from_env` delegates here; tests pass a closure over a fixed map instead of mutating the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> InsightResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let timeout_secs =
            seconds_from_env_value(ENV_API_TIMEOUT, lookup(ENV_API_TIMEOUT), DEFAULT_API_TIMEOUT_SECS)?;
        let max_retries =
            retries_from_env_value(ENV_MAX_RETRIES, lookup(ENV_MAX_RETRIES), DEFAULT_MAX_RETRIES)?;
        let retry_delay_secs = seconds_from_env_value(
            ENV_RETRY_DELAY,
            lookup(ENV_RETRY_DELAY),
            DEFAULT_RETRY_DELAY_SECS,
        )?;

        Ok(Self::new(
            lookup(ENV_API_URL),
            lookup(ENV_API_VERSION),
            lookup(ENV_APP_ID),
        )
        .with_timeout(Duration::from_secs(timeout_secs))
        .with_max_retries(max_retries)
        .with_retry_delay(Duration::from_secs(retry_delay_secs)))
    }

    /// Returns `true` when both the API URL and the app id are present.
    ///
    /// This is the cheap pre-flight check used to decide whether to offer the insight action at
    /// all. It does not parse the URL; `endpoint` does.
    pub fn is_valid(&self) -> bool {
        self.api_url.is_some() && self.app_id.is_some()
    }

    /// Resolve the request target.
    ///
    /// The path layout is
    /// `{api_url}/{api_version}/app-worker/{app_id}/{api_version}/ask`.
    ///
    /// # Errors
    ///
    /// Returns `InsightError::MissingSetting` when the URL or app id is absent,
    /// `InsightError::InvalidUrl` when the assembled URL does not parse or is not http(s) with a
    /// host, and `InsightError::InvalidAppId` when the app id is not a legal header value.
    pub fn endpoint(&self) -> InsightResult<SuperwiseEndpoint> {
        let base = self
            .api_url
            .as_deref()
            .ok_or(InsightError::MissingSetting(ENV_API_URL))?;
        let app_id = self
            .app_id
            .as_deref()
            .ok_or(InsightError::MissingSetting(ENV_APP_ID))?;

        let version = self.api_version.trim_matches('/');
        let raw = format!(
            "{}/{}/app-worker/{}/{}/ask",
            base.trim_end_matches('/'),
            version,
            app_id,
            version
        );
        let url = reqwest::Url::parse(&raw).map_err(|e| InsightError::InvalidUrl {
            url: raw.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
            return Err(InsightError::InvalidUrl {
                url: raw,
                reason: "expected an http:// or https:// URL with a host".into(),
            });
        }
        reqwest::header::HeaderValue::from_str(&format!("Bearer {}", app_id))
            .map_err(|e| InsightError::InvalidAppId(ENV_APP_ID, e.to_string()))?;

        Ok(SuperwiseEndpoint {
            url,
            app_id: app_id.to_string(),
        })
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_retries, self.retry_delay)
    }

    pub fn api_url(&self) -> Option<&str> {
        self.api_url.as_deref()
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    pub fn app_id(&self) -> Option<&str> {
        self.app_id.as_deref()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    pub fn retry_delay(&self) -> Duration {
        self.retry_delay
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse a whole number of seconds from an optional environment value.
///
/// If `value` is `None` or empty/whitespace, returns `default`.
pub fn seconds_from_env_value(
    name: &'static str,
    value: Option<String>,
    default: u64,
) -> InsightResult<u64> {
    match non_blank(value) {
        None => Ok(default),
        Some(v) => v
            .parse::<u64>()
            .map_err(|_| InsightError::InvalidNumber { name, value: v }),
    }
}

fn retries_from_env_value(
    name: &'static str,
    value: Option<String>,
    default: u32,
) -> InsightResult<u32> {
    match non_blank(value) {
        None => Ok(default),
        Some(v) => v
            .parse::<u32>()
            .map_err(|_| InsightError::InvalidNumber { name, value: v }),
    }
}
