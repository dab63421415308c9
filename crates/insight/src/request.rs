//! Request payload for the Superwise `ask` endpoint.

use crate::excerpt::PatientClinicalExcerpt;
use crate::prompt::render_prompt;
use serde::{Deserialize, Serialize};

/// One prior turn of a conversation with the agent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: String,
    pub content: String,
}

/// JSON body of an analysis call: `{"input": <prompt>, "chat_history": [...]}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AnalysisRequest {
    #[serde(rename = "input")]
    pub prompt: String,
    pub chat_history: Vec<ChatTurn>,
}

impl AnalysisRequest {
    /// A fresh request with no chat history.
    pub fn new(prompt: String) -> Self {
        Self {
            prompt,
            chat_history: Vec::new(),
        }
    }

    pub fn from_excerpt(excerpt: &PatientClinicalExcerpt) -> Self {
        Self::new(render_prompt(excerpt))
    }
}
