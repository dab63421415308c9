//! Constants for the Superwise integration.
//!
//! Environment variable names and defaults live here so the loader, the CLI and the REST
//! server agree on them.

/// Base URL of the Superwise API.
pub const ENV_API_URL: &str = "SUPERWISE_API_URL";

/// API version segment inserted into the request path.
pub const ENV_API_VERSION: &str = "SUPERWISE_API_VERSION";

/// Application id of the hosted agent. Also used as the bearer credential.
pub const ENV_APP_ID: &str = "SUPERWISE_APP_ID";

/// Per-attempt request timeout in whole seconds.
pub const ENV_API_TIMEOUT: &str = "API_TIMEOUT";

/// Number of retries after the first attempt.
pub const ENV_MAX_RETRIES: &str = "MAX_RETRIES";

/// Fixed pause between attempts in whole seconds.
pub const ENV_RETRY_DELAY: &str = "RETRY_DELAY";

pub const DEFAULT_API_VERSION: &str = "v1";
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_RETRY_DELAY_SECS: u64 = 1;

/// User agent sent with every request.
pub const USER_AGENT: &str = "MediNext-AI/1.0";

/// Response fields that may carry the answer text, in lookup order.
pub const ANSWER_FIELDS: &[&str] = &["answer", "output"];
