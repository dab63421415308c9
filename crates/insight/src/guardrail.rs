//! Detection of guardrail refusals returned by the hosted agent.
//!
//! The platform reports a blocked request as an ordinary successful answer whose text explains
//! the block, so the client cannot classify it from the status code.

const GUARDRAIL_PHRASES: &[&str] = &[
    "guardrail violation",
    "message has been blocked",
    "blocked due to a guardrail",
    "rephrase your message",
];

/// Returns `true` when an answer text reads as a guardrail refusal.
pub fn is_guardrail_violation(text: &str) -> bool {
    let lowered = text.to_lowercase();
    GUARDRAIL_PHRASES
        .iter()
        .any(|phrase| lowered.contains(phrase))
}
