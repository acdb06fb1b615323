//! Answering side of the website question-answering backend.
//!
//! [`RagPipeline`] classifies a question, retrieves the closest corpus
//! passages, builds a grounded prompt and asks the chat model. Every failure
//! ends in a user-facing [`Answer`], never in an error.

pub mod api_types;
pub mod cfg;
pub mod classify;
pub mod error;
pub mod llm;
pub mod pipeline;
pub mod prompt;
pub mod retrieve;

pub use api_types::{Answer, Outcome, RejectReason, UsedChunk};
pub use cfg::{AnswerConfig, AnswerMode};
pub use classify::{Classification, Classifier, Intent};
pub use error::PipelineError;
pub use llm::{AnswerGenerator, CompletionProvider, ServiceCompleter};
pub use pipeline::{PipelineParts, RagPipeline};
pub use prompt::{DEFAULT_PERSONA, PromptAssembler};
pub use retrieve::Retriever;
