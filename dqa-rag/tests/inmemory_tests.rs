//! Property tests for in-memory store search ordering.

use std::collections::HashMap;

use dqa_rag::document::Chunk;
use dqa_rag::inmemory::InMemoryStore;
use dqa_rag::vectorstore::VectorStore;
use proptest::prelude::*;

/// Generate a non-zero L2-normalized embedding of the given dimension.
fn arb_normalized_embedding(dim: usize) -> impl Strategy<Value = Vec<f32>> {
    proptest::collection::vec(-1.0f32..1.0f32, dim).prop_filter_map("non-zero embedding", |mut v| {
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm < 1e-8 {
            return None;
        }
        for val in &mut v {
            *val /= norm;
        }
        Some(v)
    })
}

/// Generate a chunk with a normalized embedding.
fn arb_chunk(dim: usize) -> impl Strategy<Value = Chunk> {
    ("[a-z]{3,8}", "[a-z ]{5,30}", arb_normalized_embedding(dim)).prop_map(
        |(id, text, embedding)| Chunk {
            id,
            text,
            embedding,
            metadata: HashMap::new(),
            document_id: "doc_1".to_string(),
        },
    )
}

/// Searching any set of stored chunks returns results ordered by descending
/// cosine similarity, never more than `top_k` of them.
mod search_ordering {
    use super::*;

    const DIM: usize = 16;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn results_ordered_descending_and_bounded_by_top_k(
            chunks in proptest::collection::vec(arb_chunk(DIM), 1..20),
            query in arb_normalized_embedding(DIM),
            top_k in 1usize..25,
        ) {
            let rt = tokio::runtime::Runtime::new().unwrap();
            let (results, unique_count) = rt.block_on(async {
                let store = InMemoryStore::new();
                store.create_collection("test", DIM).await.unwrap();

                // Deduplicate by id so upsert overwrites don't skew the count.
                let mut deduped: HashMap<String, Chunk> = HashMap::new();
                for chunk in &chunks {
                    deduped.entry(chunk.id.clone()).or_insert_with(|| chunk.clone());
                }
                let unique_chunks: Vec<Chunk> = deduped.into_values().collect();
                let count = unique_chunks.len();

                store.upsert("test", &unique_chunks).await.unwrap();
                let results = store.search("test", &query, top_k).await.unwrap();
                (results, count)
            });

            prop_assert!(results.len() <= top_k);
            prop_assert!(results.len() <= unique_count);

            for window in results.windows(2) {
                prop_assert!(
                    window[0].score >= window[1].score,
                    "results not in descending order: {} < {}",
                    window[0].score,
                    window[1].score,
                );
            }
        }
    }
}

#[tokio::test]
async fn upsert_into_missing_collection_fails() {
    let store = InMemoryStore::new();
    let chunk = Chunk {
        id: "c1".to_string(),
        text: "text".to_string(),
        embedding: vec![1.0, 0.0],
        metadata: HashMap::new(),
        document_id: "doc".to_string(),
    };
    assert!(store.upsert("nope", &[chunk]).await.is_err());
}

#[tokio::test]
async fn deleting_a_missing_collection_is_a_no_op() {
    let store = InMemoryStore::new();
    assert!(store.delete_collection("nope").await.is_ok());
}

#[tokio::test]
async fn delete_then_recreate_gives_an_empty_collection() {
    let store = InMemoryStore::new();
    store.create_collection("docs", 2).await.unwrap();
    let chunk = Chunk {
        id: "c1".to_string(),
        text: "text".to_string(),
        embedding: vec![1.0, 0.0],
        metadata: HashMap::new(),
        document_id: "doc".to_string(),
    };
    store.upsert("docs", &[chunk]).await.unwrap();

    store.delete_collection("docs").await.unwrap();
    store.create_collection("docs", 2).await.unwrap();
    let results = store.search("docs", &[1.0, 0.0], 5).await.unwrap();
    assert!(results.is_empty());
}
