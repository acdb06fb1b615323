//! Public answer types re-used by the HTTP layer.

use serde::Serialize;

/// Why a question was answered with a fallback message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    EmptyQuery,
    NoRelevantContext,
    ModelUnavailable,
    GenerationUnavailable,
    Timeout,
    Internal,
}

/// Terminal state of one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    /// Language model answered from the supplied context.
    Generated,
    /// Top-ranked passage returned verbatim (extractive mode).
    Extracted,
    /// Canned reply for a recognised intent (greeting, thanks, ...).
    Canned { intent: String },
    /// Fallback message; see the reason.
    Rejected { reason: RejectReason },
}

/// A context passage that was used to produce the answer.
///
/// # Example
/// ```
/// use rag_answer::UsedChunk;
/// let c = UsedChunk { source_offset: 1200, distance: 0.31, preview: "Fibre 500 costs…".into() };
/// assert!(c.distance < 1.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsedChunk {
    /// Character offset of the passage in the corpus.
    pub source_offset: usize,
    pub distance: f32,
    pub preview: String,
}

/// Final answer for one question. Always present, even on failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Answer {
    pub text: String,
    pub outcome: Outcome,
    pub context: Vec<UsedChunk>,
}

impl Answer {
    pub fn rejected(reason: RejectReason, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            outcome: Outcome::Rejected { reason },
            context: Vec::new(),
        }
    }

    pub fn canned(intent: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            outcome: Outcome::Canned {
                intent: intent.into(),
            },
            context: Vec::new(),
        }
    }
}
