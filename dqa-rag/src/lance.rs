//! LanceDB-backed vector store.
//!
//! The durable backend: collections are Lance tables under a single
//! database directory, and the on-disk layout belongs entirely to LanceDB.
//! Only available when the `lancedb` feature is enabled.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use arrow_array::{
    Array, FixedSizeListArray, Float32Array, RecordBatch, RecordBatchIterator, StringArray,
};
use arrow_schema::{DataType, Field, Schema};
use async_trait::async_trait;
use futures::TryStreamExt;
use lancedb::query::{ExecutableQuery, QueryBase};
use lancedb::{Connection, DistanceType};
use tracing::{debug, info};

use crate::document::{Chunk, SearchResult};
use crate::error::{RagError, Result};
use crate::vectorstore::VectorStore;

/// A [`VectorStore`] persisted on the local filesystem via LanceDB.
///
/// Chunk metadata rides in a JSON column so arbitrary key-value maps
/// round-trip without schema changes. `upsert` appends records; rebuild
/// semantics come from deleting and recreating a collection.
pub struct LanceStore {
    db: Connection,
}

impl LanceStore {
    /// Open (or create) the database directory at `path`.
    pub async fn connect(path: &Path) -> Result<Self> {
        let db = lancedb::connect(path.to_string_lossy().as_ref())
            .execute()
            .await
            .map_err(|e| store_error(format!("failed to open database at {}: {e}", path.display())))?;
        info!(path = %path.display(), "connected to vector store");
        Ok(Self { db })
    }

    async fn table_exists(&self, name: &str) -> Result<bool> {
        let names = self
            .db
            .table_names()
            .execute()
            .await
            .map_err(|e| store_error(format!("failed to list tables: {e}")))?;
        Ok(names.iter().any(|t| t == name))
    }
}

fn store_error(message: String) -> RagError {
    RagError::VectorStore { backend: "Lance".into(), message }
}

/// Arrow schema for a chunk collection with the given vector dimensionality.
fn collection_schema(dimensions: usize) -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("id", DataType::Utf8, false),
        Field::new("document_id", DataType::Utf8, false),
        Field::new("text", DataType::Utf8, false),
        Field::new("metadata", DataType::Utf8, false),
        Field::new(
            "vector",
            DataType::FixedSizeList(
                Arc::new(Field::new("item", DataType::Float32, true)),
                dimensions as i32,
            ),
            true,
        ),
    ]))
}

/// Convert a batch of embedded chunks into an Arrow record batch.
fn chunks_to_batch(chunks: &[Chunk], dimensions: usize) -> Result<RecordBatch> {
    let mut ids = Vec::with_capacity(chunks.len());
    let mut document_ids = Vec::with_capacity(chunks.len());
    let mut texts = Vec::with_capacity(chunks.len());
    let mut metadata = Vec::with_capacity(chunks.len());
    let mut vectors: Vec<Option<Vec<Option<f32>>>> = Vec::with_capacity(chunks.len());

    for chunk in chunks {
        ids.push(chunk.id.clone());
        document_ids.push(chunk.document_id.clone());
        texts.push(chunk.text.clone());
        metadata.push(
            serde_json::to_string(&chunk.metadata)
                .map_err(|e| store_error(format!("failed to encode chunk metadata: {e}")))?,
        );
        vectors.push(Some(chunk.embedding.iter().map(|&v| Some(v)).collect()));
    }

    RecordBatch::try_new(
        collection_schema(dimensions),
        vec![
            Arc::new(StringArray::from(ids)),
            Arc::new(StringArray::from(document_ids)),
            Arc::new(StringArray::from(texts)),
            Arc::new(StringArray::from(metadata)),
            Arc::new(FixedSizeListArray::from_iter_primitive::<arrow_array::types::Float32Type, _, _>(
                vectors.into_iter(),
                dimensions as i32,
            )),
        ],
    )
    .map_err(|e| store_error(format!("failed to build record batch: {e}")))
}

fn string_value(batch: &RecordBatch, column: &str, row: usize) -> Result<String> {
    batch
        .column_by_name(column)
        .and_then(|c| c.as_any().downcast_ref::<StringArray>())
        .map(|a| a.value(row).to_string())
        .ok_or_else(|| store_error(format!("missing column '{column}' in search result")))
}

/// Decode one search-result row back into a scored chunk.
fn row_to_result(batch: &RecordBatch, row: usize) -> Result<SearchResult> {
    let id = string_value(batch, "id", row)?;
    let document_id = string_value(batch, "document_id", row)?;
    let text = string_value(batch, "text", row)?;
    let metadata: HashMap<String, String> =
        serde_json::from_str(&string_value(batch, "metadata", row)?).unwrap_or_default();

    let values = batch
        .column_by_name("vector")
        .and_then(|c| c.as_any().downcast_ref::<FixedSizeListArray>())
        .map(|a| a.value(row))
        .ok_or_else(|| store_error("missing column 'vector' in search result".to_string()))?;
    let embedding: Vec<f32> = values
        .as_any()
        .downcast_ref::<Float32Array>()
        .ok_or_else(|| store_error("unexpected vector column type".to_string()))?
        .iter()
        .flatten()
        .collect();

    // Cosine distance comes back in `_distance`; similarity is its complement.
    let score = batch
        .column_by_name("_distance")
        .and_then(|c| c.as_any().downcast_ref::<Float32Array>())
        .map(|a| 1.0 - a.value(row))
        .unwrap_or(0.0);

    Ok(SearchResult { chunk: Chunk { id, text, embedding, metadata, document_id }, score })
}

#[async_trait]
impl VectorStore for LanceStore {
    async fn create_collection(&self, name: &str, dimensions: usize) -> Result<()> {
        if self.table_exists(name).await? {
            return Ok(());
        }
        self.db
            .create_empty_table(name, collection_schema(dimensions))
            .execute()
            .await
            .map_err(|e| store_error(format!("failed to create table '{name}': {e}")))?;
        debug!(collection = name, dimensions, "created collection");
        Ok(())
    }

    async fn delete_collection(&self, name: &str) -> Result<()> {
        match self.db.drop_table(name).await {
            Ok(()) => {
                debug!(collection = name, "dropped collection");
                Ok(())
            }
            Err(lancedb::Error::TableNotFound { .. }) => Ok(()),
            Err(e) => Err(store_error(format!("failed to drop table '{name}': {e}"))),
        }
    }

    async fn upsert(&self, collection: &str, chunks: &[Chunk]) -> Result<()> {
        if chunks.is_empty() {
            return Ok(());
        }

        let dimensions = chunks[0].embedding.len();
        let batch = chunks_to_batch(chunks, dimensions)?;
        let schema = batch.schema();
        let reader = Box::new(RecordBatchIterator::new(vec![Ok(batch)].into_iter(), schema));

        if self.table_exists(collection).await? {
            let table = self
                .db
                .open_table(collection)
                .execute()
                .await
                .map_err(|e| store_error(format!("failed to open table '{collection}': {e}")))?;
            table
                .add(reader)
                .execute()
                .await
                .map_err(|e| store_error(format!("failed to append to '{collection}': {e}")))?;
        } else {
            self.db
                .create_table(collection, reader)
                .execute()
                .await
                .map_err(|e| store_error(format!("failed to create table '{collection}': {e}")))?;
        }

        debug!(collection, count = chunks.len(), "stored chunks");
        Ok(())
    }

    async fn search(
        &self,
        collection: &str,
        embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<SearchResult>> {
        let table = self
            .db
            .open_table(collection)
            .execute()
            .await
            .map_err(|e| store_error(format!("failed to open table '{collection}': {e}")))?;

        let mut stream = table
            .vector_search(embedding.to_vec())
            .map_err(|e| store_error(format!("failed to build query: {e}")))?
            .distance_type(DistanceType::Cosine)
            .limit(top_k)
            .execute()
            .await
            .map_err(|e| store_error(format!("search failed in '{collection}': {e}")))?;

        let mut results = Vec::new();
        while let Some(batch) = stream
            .try_next()
            .await
            .map_err(|e| store_error(format!("failed to read search results: {e}")))?
        {
            for row in 0..batch.num_rows() {
                results.push(row_to_result(&batch, row)?);
            }
        }
        Ok(results)
    }
}
