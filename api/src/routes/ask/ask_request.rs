use rag_answer::{Answer, Outcome, UsedChunk};
use serde::{Deserialize, Serialize};

/// Request payload for `POST /ask`.
#[derive(Debug, Deserialize)]
pub struct AskRequest {
    /// Visitor question in natural language.
    pub question: String,
}

/// Response payload for `POST /ask`.
#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub answer: String,
    pub outcome: Outcome,
    /// Passages the answer was drawn from, most relevant first.
    pub context: Vec<UsedChunk>,
}

impl From<Answer> for AskResponse {
    fn from(a: Answer) -> Self {
        Self {
            answer: a.text,
            outcome: a.outcome,
            context: a.context,
        }
    }
}
