//! Error types for the `dqa-qa` crate.

use thiserror::Error;

/// Errors that can occur while answering a question.
///
/// Every failure inside `answer_question` surfaces as exactly one of these;
/// the interactive loop above decides how to present it and then continues.
#[derive(Debug, Error)]
pub enum QaError {
    /// Engine construction failed validation.
    #[error("QA configuration error: {0}")]
    Config(String),

    /// Embedding the question or searching the vector store failed.
    #[error("Retrieval error: {0}")]
    Retrieval(String),

    /// The context-compression pass failed.
    #[error("Context filter error: {0}")]
    Filter(String),

    /// The generation call failed.
    #[error("Generation error: {0}")]
    Generation(String),
}

/// A convenience result type for question answering.
pub type Result<T> = std::result::Result<T, QaError>;
