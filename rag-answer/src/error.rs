//! Typed error for the answering pipeline.
//!
//! Every variant is recoverable: [`crate::RagPipeline::answer_query`] turns
//! each one into a user-facing [`crate::Answer`].

use std::time::Duration;

use rag_index::IndexError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Blank or whitespace-only question.
    #[error("empty query")]
    EmptyQuery,

    /// Retrieval found nothing close enough to the question.
    #[error("no relevant context above the similarity floor")]
    NoRelevantContext,

    /// Embedding backend unreachable while embedding the question.
    #[error("embedding model unavailable: {0}")]
    ModelUnavailable(String),

    /// Completion backend unreachable, failing or returning nothing.
    #[error("generation unavailable: {0}")]
    GenerationUnavailable(String),

    /// Caller-imposed deadline elapsed.
    #[error("answer not ready within {0:?}")]
    Timeout(Duration),

    /// Index-side failure other than model availability.
    #[error("index error: {0}")]
    Index(IndexError),

    /// Invalid configuration (startup only).
    #[error("config error: {0}")]
    Config(String),
}

impl From<IndexError> for PipelineError {
    fn from(e: IndexError) -> Self {
        match e {
            IndexError::ModelUnavailable(msg) => PipelineError::ModelUnavailable(msg),
            other => PipelineError::Index(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_errors_keep_their_meaning() {
        let e = PipelineError::from(IndexError::ModelUnavailable("down".into()));
        assert!(matches!(e, PipelineError::ModelUnavailable(ref m) if m == "down"));

        let e = PipelineError::from(IndexError::DimensionMismatch { got: 1, want: 2 });
        assert!(matches!(e, PipelineError::Index(_)));
    }
}
