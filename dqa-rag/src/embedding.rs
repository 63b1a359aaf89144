//! Embedding seam for turning text into vectors.

use async_trait::async_trait;

use crate::error::Result;

/// A service that produces fixed-dimensional vector embeddings from text.
///
/// Implementations wrap an external embedding backend behind a narrow async
/// interface; the rest of the system never sees anything beyond this trait.
/// The default [`embed_batch`](Embedder::embed_batch) calls
/// [`embed`](Embedder::embed) sequentially; backends with native batching
/// should override it.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Generate an embedding vector for a single text input.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embedding vectors for a batch of text inputs.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.embed(text).await?);
        }
        Ok(results)
    }

    /// The dimensionality of embeddings produced by this service.
    fn dimensions(&self) -> usize;
}
