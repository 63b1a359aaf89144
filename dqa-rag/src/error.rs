//! Error types for the `dqa-rag` crate.

use thiserror::Error;

/// Errors that can occur during ingestion and retrieval plumbing.
#[derive(Debug, Error)]
pub enum RagError {
    /// A configuration validation error. Fatal at startup.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A document-loading failure that aborts the whole batch.
    ///
    /// Per-file read errors are logged and skipped instead; this variant is
    /// reserved for failures of the load operation itself.
    #[error("Loader error: {0}")]
    Loader(String),

    /// An error from the embedding service.
    #[error("Embedding error ({provider}): {message}")]
    Embedding {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// An error from the vector store backend.
    #[error("Vector store error ({backend}): {message}")]
    VectorStore {
        /// The vector store backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// An error in ingestion pipeline orchestration.
    #[error("Pipeline error: {0}")]
    Pipeline(String),
}

/// A convenience result type for ingestion and retrieval operations.
pub type Result<T> = std::result::Result<T, RagError>;
