//! Application configuration.
//!
//! [`AppConfig`] is the explicitly constructed context value handed by
//! reference to every component constructor. Build one with
//! [`AppConfig::builder()`] or read it from the environment with
//! [`AppConfig::from_env()`].

use std::path::PathBuf;

use crate::error::{RagError, Result};

/// Default maximum chunk size in characters.
const DEFAULT_CHUNK_SIZE: usize = 500;
/// Default overlap between consecutive chunks in characters.
const DEFAULT_CHUNK_OVERLAP: usize = 50;
/// Default embedding model.
const DEFAULT_EMBEDDINGS_MODEL: &str = "text-embedding-3-small";
/// Default chat model used for answering and context extraction.
const DEFAULT_QA_MODEL: &str = "gpt-4o-mini";
/// Default on-disk location of the vector store.
const DEFAULT_VECTOR_STORE_PATH: &str = "vector_store";
/// Default number of chunks retrieved per question.
const DEFAULT_TOP_K: usize = 5;

/// Read-only configuration for the whole pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Maximum chunk size in characters.
    pub chunk_size: usize,
    /// Number of overlapping characters between consecutive chunks.
    pub chunk_overlap: usize,
    /// Embedding model identifier.
    pub embeddings_model: String,
    /// Chat model identifier used for answering questions.
    pub qa_model: String,
    /// Directory holding the vector store's on-disk representation.
    pub vector_store_path: PathBuf,
    /// Number of chunks retrieved per question.
    pub top_k: usize,
    /// API key for the embedding and generation services.
    pub api_key: String,
}

impl AppConfig {
    /// Create a new builder for constructing an [`AppConfig`].
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Build a configuration from the process environment.
    ///
    /// Reads the required `OPENAI_API_KEY` plus optional `DQA_*` overrides:
    /// `DQA_CHUNK_SIZE`, `DQA_CHUNK_OVERLAP`, `DQA_EMBEDDINGS_MODEL`,
    /// `DQA_QA_MODEL`, `DQA_VECTOR_STORE_PATH`, and `DQA_TOP_K`.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if the API key is absent or an override
    /// fails to parse.
    pub fn from_env() -> Result<Self> {
        let mut builder = Self::builder().api_key(std::env::var("OPENAI_API_KEY").unwrap_or_default());

        if let Some(size) = env_usize("DQA_CHUNK_SIZE")? {
            builder = builder.chunk_size(size);
        }
        if let Some(overlap) = env_usize("DQA_CHUNK_OVERLAP")? {
            builder = builder.chunk_overlap(overlap);
        }
        if let Ok(model) = std::env::var("DQA_EMBEDDINGS_MODEL") {
            builder = builder.embeddings_model(model);
        }
        if let Ok(model) = std::env::var("DQA_QA_MODEL") {
            builder = builder.qa_model(model);
        }
        if let Ok(path) = std::env::var("DQA_VECTOR_STORE_PATH") {
            builder = builder.vector_store_path(path);
        }
        if let Some(top_k) = env_usize("DQA_TOP_K")? {
            builder = builder.top_k(top_k);
        }

        builder.build()
    }
}

/// Read an optional `usize` environment variable.
fn env_usize(name: &str) -> Result<Option<usize>> {
    match std::env::var(name) {
        Ok(raw) => raw
            .parse::<usize>()
            .map(Some)
            .map_err(|_| RagError::Config(format!("{name} must be a positive integer, got '{raw}'"))),
        Err(_) => Ok(None),
    }
}

/// Builder for constructing a validated [`AppConfig`].
#[derive(Debug, Clone)]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl Default for AppConfigBuilder {
    fn default() -> Self {
        Self {
            config: AppConfig {
                chunk_size: DEFAULT_CHUNK_SIZE,
                chunk_overlap: DEFAULT_CHUNK_OVERLAP,
                embeddings_model: DEFAULT_EMBEDDINGS_MODEL.to_string(),
                qa_model: DEFAULT_QA_MODEL.to_string(),
                vector_store_path: PathBuf::from(DEFAULT_VECTOR_STORE_PATH),
                top_k: DEFAULT_TOP_K,
                api_key: String::new(),
            },
        }
    }
}

impl AppConfigBuilder {
    /// Set the maximum chunk size in characters.
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.config.chunk_size = size;
        self
    }

    /// Set the overlap between consecutive chunks in characters.
    pub fn chunk_overlap(mut self, overlap: usize) -> Self {
        self.config.chunk_overlap = overlap;
        self
    }

    /// Set the embedding model identifier.
    pub fn embeddings_model(mut self, model: impl Into<String>) -> Self {
        self.config.embeddings_model = model.into();
        self
    }

    /// Set the chat model identifier.
    pub fn qa_model(mut self, model: impl Into<String>) -> Self {
        self.config.qa_model = model.into();
        self
    }

    /// Set the vector store directory.
    pub fn vector_store_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.vector_store_path = path.into();
        self
    }

    /// Set the number of chunks retrieved per question.
    pub fn top_k(mut self, top_k: usize) -> Self {
        self.config.top_k = top_k;
        self
    }

    /// Set the API key for the embedding and generation services.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = key.into();
        self
    }

    /// Build the [`AppConfig`], validating that parameters are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if:
    /// - `api_key` is empty
    /// - `chunk_overlap >= chunk_size`
    /// - `top_k == 0`
    pub fn build(self) -> Result<AppConfig> {
        if self.config.api_key.is_empty() {
            return Err(RagError::Config(
                "OPENAI_API_KEY environment variable not set. Please set it in your .env file or environment.".to_string(),
            ));
        }
        if self.config.chunk_overlap >= self.config.chunk_size {
            return Err(RagError::Config(format!(
                "chunk_overlap ({}) must be less than chunk_size ({})",
                self.config.chunk_overlap, self.config.chunk_size
            )));
        }
        if self.config.top_k == 0 {
            return Err(RagError::Config("top_k must be greater than zero".to_string()));
        }
        Ok(self.config)
    }
}
