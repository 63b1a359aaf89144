//! Pluggable context filtering between retrieval and prompt composition.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use dqa_model::Llm;
use dqa_rag::Chunk;

use crate::error::{QaError, Result};

/// Sentinel the extraction model uses to mark a chunk as irrelevant.
const NO_OUTPUT: &str = "NO_OUTPUT";

/// A pass over retrieved chunks before they reach the prompt.
///
/// The engine calls the filter with the question and the retrieved chunks;
/// whatever comes back is what the prompt is composed from. Swapping or
/// disabling compression never changes the engine's control flow.
#[async_trait]
pub trait ContextFilter: Send + Sync {
    /// Filter (and possibly rewrite) the retrieved chunks for `question`.
    async fn filter(&self, question: &str, chunks: Vec<Chunk>) -> Result<Vec<Chunk>>;
}

/// A filter that passes every chunk through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpFilter;

#[async_trait]
impl ContextFilter for NoOpFilter {
    async fn filter(&self, _question: &str, chunks: Vec<Chunk>) -> Result<Vec<Chunk>> {
        Ok(chunks)
    }
}

/// Compresses each chunk down to the passages relevant to the question.
///
/// Runs one extraction completion per chunk: the model returns the relevant
/// parts verbatim, or [`NO_OUTPUT`] to discard the chunk entirely. Chunk
/// metadata is kept as-is so source attribution is unaffected.
pub struct LlmExtractor {
    llm: Arc<dyn Llm>,
}

impl LlmExtractor {
    /// Create an extractor driven by the given model.
    pub fn new(llm: Arc<dyn Llm>) -> Self {
        Self { llm }
    }

    fn extraction_prompt(question: &str, context: &str) -> String {
        format!(
            "Given the following question and context, extract any part of the context that is \
             relevant to answering the question, exactly as it appears. Do not edit the extracted \
             text. If no part of the context is relevant, reply with exactly {NO_OUTPUT}.\n\n\
             Question: {question}\n\n\
             Context:\n{context}\n\n\
             Relevant parts:"
        )
    }
}

#[async_trait]
impl ContextFilter for LlmExtractor {
    async fn filter(&self, question: &str, chunks: Vec<Chunk>) -> Result<Vec<Chunk>> {
        let mut surviving = Vec::with_capacity(chunks.len());

        for mut chunk in chunks {
            let prompt = Self::extraction_prompt(question, &chunk.text);
            let extracted = self
                .llm
                .generate(&prompt)
                .await
                .map_err(|e| QaError::Filter(format!("extraction failed: {e}")))?;
            let extracted = extracted.trim();

            if extracted.is_empty() || extracted == NO_OUTPUT {
                debug!(chunk.id = %chunk.id, "chunk discarded by extraction");
                continue;
            }
            chunk.text = extracted.to_string();
            surviving.push(chunk);
        }

        debug!(surviving = surviving.len(), "context filtering complete");
        Ok(surviving)
    }
}
