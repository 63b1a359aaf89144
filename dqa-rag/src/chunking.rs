//! Document chunking.
//!
//! [`RecursiveChunker`] splits text on a priority ladder of separators:
//! paragraph breaks first, then line breaks, then spaces, and finally a
//! plain character window when nothing else fits. Consecutive chunks carry
//! an overlapping tail so context survives chunk boundaries.

use crate::document::{Chunk, Document};

/// Separator ladder, largest unit first. Segments that still exceed the
/// chunk size after the last separator fall back to a character window.
const SEPARATORS: [&str; 3] = ["\n\n", "\n", " "];

/// A strategy for splitting documents into chunks.
///
/// Implementations produce [`Chunk`]s with text and metadata but no
/// embeddings; embeddings are attached later by the ingestion pipeline.
pub trait Chunker: Send + Sync {
    /// Split a document into chunks.
    ///
    /// Returns an empty `Vec` if the document has empty text.
    fn chunk(&self, document: &Document) -> Vec<Chunk>;
}

/// Splits text recursively by separator priority with configurable overlap.
///
/// Each produced chunk is at most `chunk_size` bytes; a chunk starting
/// after a full one is seeded with up to `chunk_overlap` trailing bytes of
/// its predecessor. Chunk IDs are generated as `{document_id}_{index}` and
/// each chunk inherits the parent document's metadata plus a `chunk_index`
/// field.
#[derive(Debug, Clone)]
pub struct RecursiveChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl RecursiveChunker {
    /// Create a new `RecursiveChunker`.
    ///
    /// # Arguments
    ///
    /// * `chunk_size` — maximum number of bytes per chunk
    /// * `chunk_overlap` — number of overlapping bytes between consecutive chunks
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self { chunk_size, chunk_overlap }
    }
}

impl Chunker for RecursiveChunker {
    fn chunk(&self, document: &Document) -> Vec<Chunk> {
        if document.text.is_empty() {
            return Vec::new();
        }

        let raw_chunks =
            split_and_merge(&document.text, self.chunk_size, self.chunk_overlap, &SEPARATORS);

        raw_chunks
            .into_iter()
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .enumerate()
            .map(|(i, text)| {
                let mut metadata = document.metadata.clone();
                metadata.insert("chunk_index".to_string(), i.to_string());
                Chunk {
                    id: format!("{}_{i}", document.id),
                    text,
                    embedding: Vec::new(),
                    metadata,
                    document_id: document.id.clone(),
                }
            })
            .collect()
    }
}

/// Split text by a separator, then merge segments into chunks that respect
/// `chunk_size`. A segment run that exceeds `chunk_size` is split further
/// using the next separator in the ladder.
fn split_and_merge(
    text: &str,
    chunk_size: usize,
    chunk_overlap: usize,
    separators: &[&str],
) -> Vec<String> {
    if text.len() <= chunk_size || separators.is_empty() {
        return split_by_size(text, chunk_size, chunk_overlap);
    }

    let separator = separators[0];
    let remaining = &separators[1..];
    let segments = split_keeping_separator(text, separator);

    let mut chunks = Vec::new();
    let mut current = String::new();

    for segment in segments {
        if current.is_empty() {
            current = segment.to_string();
            continue;
        }
        if current.len() + segment.len() <= chunk_size {
            current.push_str(segment);
            continue;
        }

        // Current chunk is full — emit it, then start the next one seeded
        // with the overlap tail of whatever was just emitted.
        flush(std::mem::take(&mut current), chunk_size, chunk_overlap, remaining, &mut chunks);
        current = match chunks.last() {
            Some(prev) => {
                let tail = overlap_tail(prev, chunk_overlap);
                if !tail.is_empty() && tail.len() + segment.len() <= chunk_size {
                    let mut seeded = tail.to_string();
                    seeded.push_str(segment);
                    seeded
                } else {
                    segment.to_string()
                }
            }
            None => segment.to_string(),
        };
    }

    if !current.is_empty() {
        flush(current, chunk_size, chunk_overlap, remaining, &mut chunks);
    }

    chunks
}

/// Emit a merged buffer: directly if it fits, otherwise recursing into the
/// next separator level.
fn flush(
    buffer: String,
    chunk_size: usize,
    chunk_overlap: usize,
    separators: &[&str],
    out: &mut Vec<String>,
) {
    if buffer.len() > chunk_size {
        out.extend(split_and_merge(&buffer, chunk_size, chunk_overlap, separators));
    } else {
        out.push(buffer);
    }
}

/// Split text at a separator while keeping the separator attached to the
/// preceding segment, so that concatenating the segments reproduces the
/// input exactly.
fn split_keeping_separator<'a>(text: &'a str, separator: &str) -> Vec<&'a str> {
    let mut result = Vec::new();
    let mut start = 0;

    while let Some(pos) = text[start..].find(separator) {
        let end = start + pos + separator.len();
        result.push(&text[start..end]);
        start = end;
    }

    if start < text.len() {
        result.push(&text[start..]);
    }

    result
}

/// Character-window splitting with overlap. The final fallback for text
/// with no usable separators.
fn split_by_size(text: &str, chunk_size: usize, chunk_overlap: usize) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }

    let step = chunk_size.saturating_sub(chunk_overlap).max(1);
    let mut chunks = Vec::new();
    let mut start = 0;

    while start < text.len() {
        let mut end = floor_boundary(text, start + chunk_size);
        if end <= start {
            // A single multi-byte character exceeds the window; take it whole.
            end = ceil_boundary(text, start + 1);
        }
        chunks.push(text[start..end].to_string());
        if end >= text.len() {
            break;
        }
        start = ceil_boundary(text, start + step);
    }

    chunks
}

/// The trailing at-most-`overlap` bytes of `s`, on a char boundary.
fn overlap_tail(s: &str, overlap: usize) -> &str {
    if overlap == 0 {
        return "";
    }
    if s.len() <= overlap {
        return s;
    }
    &s[ceil_boundary(s, s.len() - overlap)..]
}

/// Largest char boundary at or below `index`.
fn floor_boundary(s: &str, index: usize) -> usize {
    let mut i = index.min(s.len());
    while !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

/// Smallest char boundary at or above `index`.
fn ceil_boundary(s: &str, index: usize) -> usize {
    let mut i = index.min(s.len());
    while !s.is_char_boundary(i) {
        i += 1;
    }
    i
}
