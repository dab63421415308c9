//! The classified outcome of one analysis call.

use serde::Serialize;

/// Result of `SuperwiseClient::analyze`. Exactly one variant per call.
///
/// Serialises with a `kind` tag, e.g. `{"kind": "api_error", "status_code": 503, "body": "..."}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnalysisResult {
    Success { text: String },
    ConfigError { reason: String },
    Timeout,
    NetworkError { reason: String },
    ApiError { status_code: u16, body: String },
    UnexpectedError { reason: String },
}

impl AnalysisResult {
    pub fn is_success(&self) -> bool {
        matches!(self, AnalysisResult::Success { .. })
    }

    /// The answer text for `Success`, `None` otherwise.
    pub fn text(&self) -> Option<&str> {
        match self {
            AnalysisResult::Success { text } => Some(text),
            _ => None,
        }
    }

    /// Stable snake_case name of the variant, matching the serialised `kind` tag.
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisResult::Success { .. } => "success",
            AnalysisResult::ConfigError { .. } => "config_error",
            AnalysisResult::Timeout => "timeout",
            AnalysisResult::NetworkError { .. } => "network_error",
            AnalysisResult::ApiError { .. } => "api_error",
            AnalysisResult::UnexpectedError { .. } => "unexpected_error",
        }
    }

    /// Message suitable for showing to a clinician.
    ///
    /// Configuration problems are surfaced verbatim since only an operator can fix them.
    pub fn user_message(&self) -> String {
        match self {
            AnalysisResult::Success { .. } => "Analysis completed successfully".into(),
            AnalysisResult::ConfigError { reason } => format!(
                "Superwise API configuration is missing or invalid: {}. Please set the environment variables in the .env file.",
                reason
            ),
            AnalysisResult::Timeout => "Request timed out. Please try again.".into(),
            AnalysisResult::NetworkError { reason } => {
                format!("Failed to connect to Superwise API: {}", reason)
            }
            AnalysisResult::ApiError { status_code, .. } => format!(
                "Failed to get analysis from Superwise (API Error: {})",
                status_code
            ),
            AnalysisResult::UnexpectedError { reason } => {
                format!("An unexpected error occurred: {}", reason)
            }
        }
    }
}

impl std::fmt::Display for AnalysisResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalysisResult::Success { text } => write!(f, "{}", text),
            other => write!(f, "{}", other.user_message()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_matches_serialised_tag() {
        let results = [
            AnalysisResult::Success { text: "ok".into() },
            AnalysisResult::ConfigError { reason: "x".into() },
            AnalysisResult::Timeout,
            AnalysisResult::NetworkError { reason: "x".into() },
            AnalysisResult::ApiError {
                status_code: 500,
                body: "x".into(),
            },
            AnalysisResult::UnexpectedError { reason: "x".into() },
        ];

        for result in results {
            let value = serde_json::to_value(&result).expect("result should serialise");
            assert_eq!(value["kind"], result.kind());
        }
    }

    #[test]
    fn test_only_success_carries_text() {
        assert_eq!(
            AnalysisResult::Success {
                text: "Moderate risk".into()
            }
            .text(),
            Some("Moderate risk")
        );
        assert_eq!(AnalysisResult::Timeout.text(), None);
        assert!(!AnalysisResult::Timeout.is_success());
    }

    #[test]
    fn test_config_error_message_includes_reason() {
        let result = AnalysisResult::ConfigError {
            reason: "SUPERWISE_APP_ID is not set".into(),
        };
        assert!(result.user_message().contains("SUPERWISE_APP_ID is not set"));
    }
}
