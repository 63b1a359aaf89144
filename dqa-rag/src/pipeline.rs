//! Ingestion pipeline: embed chunks and persist them into a vector store.
//!
//! # Example
//!
//! ```rust,ignore
//! use dqa_rag::{IngestPipeline, InMemoryStore, OpenAIEmbedder};
//!
//! let pipeline = IngestPipeline::builder()
//!     .embedder(Arc::new(OpenAIEmbedder::new("sk-...")?))
//!     .vector_store(Arc::new(InMemoryStore::new()))
//!     .build()?;
//!
//! pipeline.create_collection("documents").await?;
//! let stored = pipeline.ingest_chunks("documents", chunks).await?;
//! ```

use std::sync::Arc;

use tracing::{error, info};

use crate::document::Chunk;
use crate::embedding::Embedder;
use crate::error::{RagError, Result};
use crate::vectorstore::VectorStore;

/// Turns loaded chunks into embedded, persisted vector records.
///
/// Composes an [`Embedder`] and a [`VectorStore`] behind one ingest
/// operation. Construct one via [`IngestPipeline::builder()`].
pub struct IngestPipeline {
    embedder: Arc<dyn Embedder>,
    vector_store: Arc<dyn VectorStore>,
}

impl IngestPipeline {
    /// Create a new [`IngestPipelineBuilder`].
    pub fn builder() -> IngestPipelineBuilder {
        IngestPipelineBuilder::default()
    }

    /// Create a named collection sized for the configured embedder.
    pub async fn create_collection(&self, name: &str) -> Result<()> {
        let dimensions = self.embedder.dimensions();
        self.vector_store.create_collection(name, dimensions).await.map_err(|e| {
            error!(collection = name, error = %e, "failed to create collection");
            RagError::Pipeline(format!("failed to create collection '{name}': {e}"))
        })
    }

    /// Delete a named collection from the vector store.
    pub async fn delete_collection(&self, name: &str) -> Result<()> {
        self.vector_store.delete_collection(name).await.map_err(|e| {
            error!(collection = name, error = %e, "failed to delete collection");
            RagError::Pipeline(format!("failed to delete collection '{name}': {e}"))
        })
    }

    /// Embed every chunk and write the records into `collection`.
    ///
    /// Returns the number of stored chunks. An empty input is "nothing to
    /// ingest": the call returns 0 without touching the embedding service.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Pipeline`] if embedding or storage fails; there
    /// is no partial-success contract and the whole batch aborts.
    pub async fn ingest_chunks(&self, collection: &str, mut chunks: Vec<Chunk>) -> Result<usize> {
        if chunks.is_empty() {
            info!("nothing to ingest");
            return Ok(0);
        }

        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await.map_err(|e| {
            error!(error = %e, "embedding failed during ingestion");
            RagError::Pipeline(format!("embedding failed during ingestion: {e}"))
        })?;

        if embeddings.len() != chunks.len() {
            return Err(RagError::Pipeline(format!(
                "embedding service returned {} vectors for {} chunks",
                embeddings.len(),
                chunks.len()
            )));
        }
        for (chunk, embedding) in chunks.iter_mut().zip(embeddings) {
            chunk.embedding = embedding;
        }

        self.vector_store.upsert(collection, &chunks).await.map_err(|e| {
            error!(collection, error = %e, "upsert failed during ingestion");
            RagError::Pipeline(format!("upsert failed for collection '{collection}': {e}"))
        })?;

        info!(collection, chunk_count = chunks.len(), "ingested chunks");
        Ok(chunks.len())
    }
}

/// Builder for constructing an [`IngestPipeline`].
#[derive(Default)]
pub struct IngestPipelineBuilder {
    embedder: Option<Arc<dyn Embedder>>,
    vector_store: Option<Arc<dyn VectorStore>>,
}

impl IngestPipelineBuilder {
    /// Set the embedding service.
    pub fn embedder(mut self, embedder: Arc<dyn Embedder>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// Set the vector store backend.
    pub fn vector_store(mut self, store: Arc<dyn VectorStore>) -> Self {
        self.vector_store = Some(store);
        self
    }

    /// Build the [`IngestPipeline`], validating that all fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if a required field is missing.
    pub fn build(self) -> Result<IngestPipeline> {
        let embedder =
            self.embedder.ok_or_else(|| RagError::Config("embedder is required".to_string()))?;
        let vector_store = self
            .vector_store
            .ok_or_else(|| RagError::Config("vector_store is required".to_string()))?;
        Ok(IngestPipeline { embedder, vector_store })
    }
}
