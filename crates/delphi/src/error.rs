//! Error types for the answer pipeline.

use thiserror::Error;

/// Failure from one of the HTTP collaborators.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected payload: {0}")]
    Payload(String),
}

/// Everything that can go wrong between a raw question and an answer.
///
/// Classification and extraction failures are terminal; the only retry in
/// the whole pipeline is the bounded singularization fallback inside
/// relation resolution, which happens before `RelationNotFound` is raised.
#[derive(Debug, Error)]
pub enum AnswerError {
    #[error("Question is ill-formed, cannot answer this question")]
    IllFormed,

    #[error("Could not find the {role} of this question")]
    IncompleteExtraction { role: &'static str },

    #[error("No knowledge-graph entity matches \"{0}\"")]
    EntityNotFound(String),

    #[error("No knowledge-graph property matches \"{0}\"")]
    RelationNotFound(String),

    #[error("Could not find an answer to this question")]
    NoAnswerFound,

    #[error("Collaborator request failed: {0}")]
    Transport(#[from] TransportError),
}

impl AnswerError {
    /// True for failures that should not abort a batch run.
    pub fn is_question_failure(&self) -> bool {
        !matches!(self, AnswerError::Transport(_))
    }
}
