//! The question-answering engine.
//!
//! [`QaEngine`] coordinates one answer per call: retrieve candidate chunks,
//! select a diverse subset with MMR, compress them, compose a grounded
//! prompt, run one deterministic completion, and attribute sources.
//!
//! # Example
//!
//! ```rust,ignore
//! use dqa_qa::QaEngine;
//!
//! let engine = QaEngine::builder()
//!     .embedder(embedder)
//!     .vector_store(store)
//!     .llm(model)
//!     .top_k(5)
//!     .build()?;
//!
//! let answer = engine.answer_question("What color is the sky?").await?;
//! println!("{} — {:?}", answer.text, answer.sources);
//! ```

use std::sync::Arc;

use tracing::{debug, error, info};

use dqa_model::Llm;
use dqa_rag::{Chunk, Embedder, VectorStore};

use crate::error::{QaError, Result};
use crate::filter::{ContextFilter, NoOpFilter};
use crate::mmr;

/// The fixed reply the model is instructed to give when the supplied
/// context cannot answer the question.
pub const INSUFFICIENT_CONTEXT_ANSWER: &str =
    "I don't have enough information to answer this question.";

/// How many candidates to fetch per selected result. MMR needs headroom to
/// trade relevance for diversity.
const MMR_FETCH_MULTIPLIER: usize = 4;

/// Relevance/diversity balance for MMR selection.
const MMR_LAMBDA: f32 = 0.5;

/// An answer with the sources that contributed to it.
///
/// Derived per question, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Answer {
    /// The generated answer text.
    pub text: String,
    /// `source` metadata of every chunk that reached the prompt, in
    /// retrieval order; `"Unknown"` where the metadata was missing.
    pub sources: Vec<String>,
}

/// Answers questions against an ingested chunk collection.
///
/// Construct one via [`QaEngine::builder()`]. All collaborators are shared
/// seams; the engine only reads the vector store.
pub struct QaEngine {
    embedder: Arc<dyn Embedder>,
    vector_store: Arc<dyn VectorStore>,
    llm: Arc<dyn Llm>,
    filter: Arc<dyn ContextFilter>,
    collection: String,
    top_k: usize,
}

impl QaEngine {
    /// Create a new [`QaEngineBuilder`].
    pub fn builder() -> QaEngineBuilder {
        QaEngineBuilder::default()
    }

    /// Answer a question from the ingested collection.
    ///
    /// Runs the retrieve → compress → compose → generate → attribute flow
    /// once. No state survives between calls.
    ///
    /// # Errors
    ///
    /// Every failure maps to a single descriptive [`QaError`]; this method
    /// never panics. Callers in an interactive loop should present the
    /// error text and continue.
    pub async fn answer_question(&self, question: &str) -> Result<Answer> {
        info!(question, "answering question");

        // Retrieve a wide candidate set, then narrow it with MMR.
        let query_embedding = self.embedder.embed(question).await.map_err(|e| {
            error!(error = %e, "query embedding failed");
            QaError::Retrieval(format!("query embedding failed: {e}"))
        })?;

        let fetch_k = self.top_k * MMR_FETCH_MULTIPLIER;
        let candidates = self
            .vector_store
            .search(&self.collection, &query_embedding, fetch_k)
            .await
            .map_err(|e| {
                error!(collection = %self.collection, error = %e, "vector search failed");
                QaError::Retrieval(format!("search failed in '{}': {e}", self.collection))
            })?;

        let selected = mmr::mmr_select(&query_embedding, candidates, self.top_k, MMR_LAMBDA);
        debug!(selected = selected.len(), "retrieved context chunks");

        // Compress.
        let chunks: Vec<Chunk> = selected.into_iter().map(|result| result.chunk).collect();
        let surviving = self.filter.filter(question, chunks).await?;

        // Attribute before the prompt consumes the chunks.
        let sources: Vec<String> = surviving.iter().map(Chunk::source).collect();

        // Compose and generate.
        let prompt = compose_prompt(question, &surviving);
        let text = self.llm.generate(&prompt).await.map_err(|e| {
            error!(model = %self.llm.name(), error = %e, "generation failed");
            QaError::Generation(format!("generation failed: {e}"))
        })?;

        info!(source_count = sources.len(), "question answered");
        Ok(Answer { text: text.trim().to_string(), sources })
    }
}

/// Build the grounded prompt: context, question, and the instruction to
/// answer only from the context.
fn compose_prompt(question: &str, chunks: &[Chunk]) -> String {
    let context = chunks.iter().map(|c| c.text.as_str()).collect::<Vec<_>>().join("\n\n");
    format!(
        "Answer the question based only on the following context. If the answer is not in the \
         context, say \"{INSUFFICIENT_CONTEXT_ANSWER}\"\n\n\
         Context:\n{context}\n\n\
         Question: {question}\n\n\
         Answer:"
    )
}

/// Builder for constructing a [`QaEngine`].
///
/// `embedder`, `vector_store`, and `llm` are required; the filter defaults
/// to [`NoOpFilter`], the collection to `"documents"`, and `top_k` to 5.
#[derive(Default)]
pub struct QaEngineBuilder {
    embedder: Option<Arc<dyn Embedder>>,
    vector_store: Option<Arc<dyn VectorStore>>,
    llm: Option<Arc<dyn Llm>>,
    filter: Option<Arc<dyn ContextFilter>>,
    collection: Option<String>,
    top_k: Option<usize>,
}

impl QaEngineBuilder {
    /// Set the embedding service used for query embeddings.
    pub fn embedder(mut self, embedder: Arc<dyn Embedder>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// Set the vector store to retrieve from.
    pub fn vector_store(mut self, store: Arc<dyn VectorStore>) -> Self {
        self.vector_store = Some(store);
        self
    }

    /// Set the generation model.
    pub fn llm(mut self, llm: Arc<dyn Llm>) -> Self {
        self.llm = Some(llm);
        self
    }

    /// Set the context filter applied between retrieval and composition.
    pub fn filter(mut self, filter: Arc<dyn ContextFilter>) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Set the collection to answer from.
    pub fn collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = Some(collection.into());
        self
    }

    /// Set how many chunks reach the prompt per question.
    pub fn top_k(mut self, top_k: usize) -> Self {
        self.top_k = Some(top_k);
        self
    }

    /// Build the [`QaEngine`], validating that required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`QaError::Config`] if a required collaborator is missing or
    /// `top_k` is zero.
    pub fn build(self) -> Result<QaEngine> {
        let embedder =
            self.embedder.ok_or_else(|| QaError::Config("embedder is required".to_string()))?;
        let vector_store = self
            .vector_store
            .ok_or_else(|| QaError::Config("vector_store is required".to_string()))?;
        let llm = self.llm.ok_or_else(|| QaError::Config("llm is required".to_string()))?;
        let top_k = self.top_k.unwrap_or(5);
        if top_k == 0 {
            return Err(QaError::Config("top_k must be greater than zero".to_string()));
        }

        Ok(QaEngine {
            embedder,
            vector_store,
            llm,
            filter: self.filter.unwrap_or_else(|| Arc::new(NoOpFilter)),
            collection: self.collection.unwrap_or_else(|| "documents".to_string()),
            top_k,
        })
    }
}
