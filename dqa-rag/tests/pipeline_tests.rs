//! Ingestion pipeline behaviour with deterministic and failing embedders.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use dqa_rag::document::Chunk;
use dqa_rag::embedding::Embedder;
use dqa_rag::error::{RagError, Result};
use dqa_rag::inmemory::InMemoryStore;
use dqa_rag::pipeline::IngestPipeline;
use dqa_rag::vectorstore::VectorStore;

const DIM: usize = 16;

/// Deterministic hash-based embedder that counts how often it is called.
struct CountingEmbedder {
    calls: AtomicUsize,
}

impl CountingEmbedder {
    fn new() -> Self {
        Self { calls: AtomicUsize::new(0) }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Embedder for CountingEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        // Hash the text into a normalised direction so equal text embeds
        // equally and different text (usually) does not.
        let hash = text.bytes().fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64));
        let mut embedding = vec![0.0f32; DIM];
        for (i, v) in embedding.iter_mut().enumerate() {
            *v = ((hash.wrapping_add(i as u64)) as f32).sin();
        }
        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            embedding.iter_mut().for_each(|x| *x /= norm);
        }
        Ok(embedding)
    }

    fn dimensions(&self) -> usize {
        DIM
    }
}

/// An embedder that always fails.
struct FailingEmbedder;

#[async_trait]
impl Embedder for FailingEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Err(RagError::Embedding { provider: "test".into(), message: "service down".into() })
    }

    fn dimensions(&self) -> usize {
        DIM
    }
}

fn chunk(id: &str, text: &str) -> Chunk {
    Chunk {
        id: id.to_string(),
        text: text.to_string(),
        embedding: Vec::new(),
        metadata: HashMap::from([("source".to_string(), format!("{id}.txt"))]),
        document_id: id.to_string(),
    }
}

#[tokio::test]
async fn ingesting_nothing_never_calls_the_embedder() {
    let embedder = Arc::new(CountingEmbedder::new());
    let pipeline = IngestPipeline::builder()
        .embedder(embedder.clone())
        .vector_store(Arc::new(InMemoryStore::new()))
        .build()
        .unwrap();

    let stored = pipeline.ingest_chunks("documents", Vec::new()).await.unwrap();
    assert_eq!(stored, 0);
    assert_eq!(embedder.calls(), 0);
}

#[tokio::test]
async fn ingested_chunks_are_searchable_with_embeddings_attached() {
    let embedder = Arc::new(CountingEmbedder::new());
    let store = Arc::new(InMemoryStore::new());
    let pipeline = IngestPipeline::builder()
        .embedder(embedder.clone())
        .vector_store(store.clone())
        .build()
        .unwrap();

    pipeline.create_collection("documents").await.unwrap();
    let stored = pipeline
        .ingest_chunks(
            "documents",
            vec![chunk("a", "the sky is blue"), chunk("b", "grass is green")],
        )
        .await
        .unwrap();
    assert_eq!(stored, 2);

    let query = embedder.embed("the sky is blue").await.unwrap();
    let results = store.search("documents", &query, 2).await.unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].chunk.id, "a", "the matching chunk should rank first");
    assert_eq!(results[0].chunk.embedding.len(), DIM);
    assert_eq!(results[0].chunk.metadata["source"], "a.txt");
}

#[tokio::test]
async fn embedding_failure_aborts_the_batch() {
    let store = Arc::new(InMemoryStore::new());
    let pipeline = IngestPipeline::builder()
        .embedder(Arc::new(FailingEmbedder))
        .vector_store(store.clone())
        .build()
        .unwrap();

    pipeline.create_collection("documents").await.unwrap();
    let result = pipeline.ingest_chunks("documents", vec![chunk("a", "text")]).await;
    assert!(matches!(result, Err(RagError::Pipeline(_))));

    // Nothing was stored.
    let results = store.search("documents", &[0.0; DIM], 5).await.unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn builder_requires_all_collaborators() {
    let result = IngestPipeline::builder().vector_store(Arc::new(InMemoryStore::new())).build();
    assert!(matches!(result, Err(RagError::Config(_))));
}
