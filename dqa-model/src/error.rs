//! Error types for the `dqa-model` crate.

use thiserror::Error;

/// Errors that can occur when calling a generation model.
#[derive(Debug, Error)]
pub enum ModelError {
    /// A model configuration error (e.g. a missing API key).
    #[error("Model configuration error: {0}")]
    Config(String),

    /// A failure reported by the model API or the transport to it.
    #[error("Model API error ({model}): {message}")]
    Api {
        /// The model the request was addressed to.
        model: String,
        /// A description of the failure.
        message: String,
    },

    /// The API replied with something this client cannot interpret.
    #[error("Invalid model response: {0}")]
    InvalidResponse(String),
}

/// A convenience result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
