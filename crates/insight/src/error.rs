/// Errors raised while resolving the Superwise configuration.
///
/// These never escape `SuperwiseClient::analyze`; there they are folded into
/// `AnalysisResult::ConfigError`.
#[derive(Debug, thiserror::Error)]
pub enum InsightError {
    #[error("{0} is not set")]
    MissingSetting(&'static str),
    #[error("invalid value for {name}: {value:?} (expected a non-negative integer)")]
    InvalidNumber { name: &'static str, value: String },
    #[error("invalid Superwise endpoint URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("{0} cannot be sent as a bearer token: {1}")]
    InvalidAppId(&'static str, String),
}

pub type InsightResult<T> = std::result::Result<T, InsightError>;
