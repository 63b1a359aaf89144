//! Data types for documents, chunks, and search results.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Metadata key carrying the originating source of a document or chunk.
pub const SOURCE_KEY: &str = "source";

/// A source document containing text content and metadata.
///
/// The loader produces exactly one `Document` per readable input file, with
/// the file's path recorded under the [`SOURCE_KEY`] metadata entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    /// Unique identifier for the document.
    pub id: String,
    /// The text content of the document.
    pub text: String,
    /// Key-value metadata associated with the document.
    pub metadata: HashMap<String, String>,
    /// Optional URI pointing to the original source.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_uri: Option<String>,
}

/// A segment of a [`Document`] with its vector embedding.
///
/// Chunks inherit the parent document's metadata (including [`SOURCE_KEY`])
/// plus a `chunk_index` entry. The embedding is empty until the ingestion
/// pipeline attaches one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// Unique identifier for the chunk.
    pub id: String,
    /// The text content of the chunk.
    pub text: String,
    /// The vector embedding for this chunk's text.
    pub embedding: Vec<f32>,
    /// Key-value metadata inherited from the parent document plus chunk-specific fields.
    pub metadata: HashMap<String, String>,
    /// The ID of the parent [`Document`].
    pub document_id: String,
}

impl Chunk {
    /// The chunk's originating source, or `"Unknown"` when the metadata is missing.
    pub fn source(&self) -> String {
        self.metadata.get(SOURCE_KEY).cloned().unwrap_or_else(|| "Unknown".to_string())
    }
}

/// A retrieved [`Chunk`] paired with a relevance score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// The retrieved chunk.
    pub chunk: Chunk,
    /// The similarity score (higher is more relevant).
    pub score: f32,
}
