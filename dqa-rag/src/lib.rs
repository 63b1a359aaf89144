//! # dqa-rag
//!
//! Document ingestion and retrieval plumbing for dqa: filesystem loading,
//! recursive chunking, an embedding seam with an OpenAI backend, and a
//! vector store seam with in-memory and LanceDB backends.
//!
//! The flow is loader → chunks → [`IngestPipeline`] (embed + persist);
//! question answering on top of the stored chunks lives in `dqa-qa`.
//!
//! ## Feature flags
//!
//! - `lancedb` — enables [`LanceStore`], the durable on-disk backend.

pub mod chunking;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod inmemory;
#[cfg(feature = "lancedb")]
pub mod lance;
pub mod loader;
pub mod openai;
pub mod pipeline;
pub mod vectorstore;

pub use chunking::{Chunker, RecursiveChunker};
pub use config::AppConfig;
pub use document::{Chunk, Document, SearchResult, SOURCE_KEY};
pub use embedding::Embedder;
pub use error::{RagError, Result};
pub use inmemory::InMemoryStore;
#[cfg(feature = "lancedb")]
pub use lance::LanceStore;
pub use loader::DocumentLoader;
pub use openai::OpenAIEmbedder;
pub use pipeline::IngestPipeline;
pub use vectorstore::VectorStore;
