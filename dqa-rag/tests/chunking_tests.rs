//! Property and scenario tests for recursive chunking invariants.

use std::collections::HashMap;

use dqa_rag::chunking::{Chunker, RecursiveChunker};
use dqa_rag::document::{Document, SOURCE_KEY};
use proptest::prelude::*;

fn doc(text: &str) -> Document {
    Document {
        id: "doc".to_string(),
        text: text.to_string(),
        metadata: HashMap::from([(SOURCE_KEY.to_string(), "notes/a.txt".to_string())]),
        source_uri: Some("notes/a.txt".to_string()),
    }
}

/// Chunk size with an overlap strictly smaller than half of it.
fn arb_chunking_params() -> impl Strategy<Value = (usize, usize)> {
    (20usize..200).prop_flat_map(|size| (Just(size), 0usize..size / 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Every produced chunk respects the configured maximum size.
    #[test]
    fn chunk_size_is_bounded(
        text in "[a-zA-Z0-9 \n]{0,1200}",
        (chunk_size, chunk_overlap) in arb_chunking_params(),
    ) {
        let chunker = RecursiveChunker::new(chunk_size, chunk_overlap);
        for chunk in chunker.chunk(&doc(&text)) {
            prop_assert!(
                chunk.text.len() <= chunk_size,
                "chunk of {} bytes exceeds chunk_size {}",
                chunk.text.len(),
                chunk_size,
            );
        }
    }

    /// Chunks are verbatim slices of the source document.
    #[test]
    fn chunks_are_substrings_of_the_document(
        text in "[a-zA-Z0-9 \n]{0,1200}",
        (chunk_size, chunk_overlap) in arb_chunking_params(),
    ) {
        let document = doc(&text);
        let chunker = RecursiveChunker::new(chunk_size, chunk_overlap);
        for chunk in chunker.chunk(&document) {
            prop_assert!(
                document.text.contains(&chunk.text),
                "chunk {:?} is not a substring of the document",
                chunk.text,
            );
        }
    }

    /// Source metadata survives on every chunk, ids are unique, and the
    /// chunk index counts up from zero.
    #[test]
    fn metadata_and_ids_are_consistent(
        text in "[a-z \n]{1,600}",
        (chunk_size, chunk_overlap) in arb_chunking_params(),
    ) {
        let document = doc(&text);
        let chunker = RecursiveChunker::new(chunk_size, chunk_overlap);
        let chunks = chunker.chunk(&document);

        for (i, chunk) in chunks.iter().enumerate() {
            prop_assert_eq!(chunk.metadata.get(SOURCE_KEY), Some(&"notes/a.txt".to_string()));
            prop_assert_eq!(chunk.metadata.get("chunk_index"), Some(&i.to_string()));
            prop_assert_eq!(&chunk.id, &format!("doc_{i}"));
            prop_assert_eq!(&chunk.document_id, "doc");
        }
    }
}

/// Longest `l` such that `a` ends with the first `l` bytes of `b`.
fn suffix_prefix_overlap(a: &str, b: &str) -> usize {
    (0..=a.len().min(b.len())).rev().find(|&l| a.ends_with(&b[..l])).unwrap_or(0)
}

#[test]
fn empty_document_yields_no_chunks() {
    let chunker = RecursiveChunker::new(100, 10);
    assert!(chunker.chunk(&doc("")).is_empty());
}

#[test]
fn whitespace_document_yields_no_chunks() {
    let chunker = RecursiveChunker::new(100, 10);
    assert!(chunker.chunk(&doc("\n\n  \n")).is_empty());
}

#[test]
fn short_document_is_a_single_trimmed_chunk() {
    let chunker = RecursiveChunker::new(500, 50);
    let chunks = chunker.chunk(&doc("The sky is blue.\n"));
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].text, "The sky is blue.");
}

#[test]
fn adjacent_chunks_overlap_within_the_configured_bound() {
    // Sixty distinct words, so any suffix/prefix match is real overlap and
    // not a coincidence of repeated text.
    let words: Vec<String> = (0..60).map(|i| format!("w{i:03}")).collect();
    let text = words.join(" ");
    let chunker = RecursiveChunker::new(50, 10);
    let chunks = chunker.chunk(&doc(&text));

    assert!(chunks.len() > 1, "expected the text to split");
    for pair in chunks.windows(2) {
        let overlap = suffix_prefix_overlap(&pair[0].text, &pair[1].text);
        assert!(overlap >= 1, "adjacent chunks share no overlap: {:?} / {:?}", pair[0].text, pair[1].text);
        assert!(overlap <= 10, "overlap {overlap} exceeds the configured 10 bytes");
    }
}

#[test]
fn unbroken_text_falls_back_to_character_windows() {
    let text = "x".repeat(100);
    let chunker = RecursiveChunker::new(20, 5);
    let chunks = chunker.chunk(&doc(&text));

    // Windows advance by chunk_size − overlap: 0, 15, 30, …, 90.
    assert_eq!(chunks.len(), 7);
    assert!(chunks.iter().all(|c| c.text.len() <= 20));
    assert_eq!(chunks[0].text.len(), 20);
    assert_eq!(chunks[6].text.len(), 10);
}

#[test]
fn paragraph_boundaries_take_priority() {
    let text = "first paragraph here.\n\nsecond paragraph here.\n\nthird paragraph here.";
    let chunker = RecursiveChunker::new(30, 0);
    let chunks = chunker.chunk(&doc(&text));

    assert_eq!(chunks.len(), 3);
    assert_eq!(chunks[0].text, "first paragraph here.");
    assert_eq!(chunks[1].text, "second paragraph here.");
    assert_eq!(chunks[2].text, "third paragraph here.");
}
