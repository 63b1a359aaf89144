//! Filesystem document loading.
//!
//! [`DocumentLoader`] turns a list of file and directory paths into
//! source-tagged, overlapping chunks ready for embedding. Unreadable files
//! are skipped with a diagnostic; they never abort the batch.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{error, info, warn};
use walkdir::WalkDir;

use crate::chunking::{Chunker, RecursiveChunker};
use crate::config::AppConfig;
use crate::document::{Chunk, Document, SOURCE_KEY};
use crate::error::Result;

/// Loads documents from the filesystem and splits them into chunks.
pub struct DocumentLoader {
    chunker: RecursiveChunker,
}

impl DocumentLoader {
    /// Create a loader whose chunking follows the given configuration.
    pub fn new(config: &AppConfig) -> Self {
        Self { chunker: RecursiveChunker::new(config.chunk_size, config.chunk_overlap) }
    }

    /// Load every readable file under `paths` and split the results into
    /// chunks.
    ///
    /// Paths may name files or directories; directories are expanded
    /// recursively. Surrounding whitespace on each entry is ignored. A path
    /// that is neither file nor directory is skipped with a warning, as is
    /// any file that cannot be read or decoded.
    ///
    /// Returns an empty `Vec` when nothing readable was found; callers must
    /// treat this as "nothing to ingest", not as an error.
    pub fn load_documents(&self, paths: &[String]) -> Result<Vec<Chunk>> {
        let mut documents = Vec::new();

        for raw in paths {
            let path = PathBuf::from(raw.trim());
            if path.is_file() {
                documents.extend(self.load_file(&path));
            } else if path.is_dir() {
                for entry in WalkDir::new(&path).into_iter().filter_map(|e| e.ok()) {
                    if entry.file_type().is_file() {
                        documents.extend(self.load_file(entry.path()));
                    }
                }
            } else {
                warn!(path = %path.display(), "invalid path, skipping");
            }
        }

        if documents.is_empty() {
            warn!("no documents found to process");
            return Ok(Vec::new());
        }
        info!(document_count = documents.len(), "loaded documents");

        let chunks: Vec<Chunk> =
            documents.iter().flat_map(|doc| self.chunker.chunk(doc)).collect();
        info!(chunk_count = chunks.len(), "split documents into chunks");
        Ok(chunks)
    }

    /// Read a single file into a [`Document`], or `None` if it had to be
    /// skipped.
    fn load_file(&self, path: &Path) -> Option<Document> {
        let text = if is_pdf(path) { read_pdf(path)? } else { read_text(path)? };

        let source = path.to_string_lossy().to_string();
        let metadata = HashMap::from([(SOURCE_KEY.to_string(), source.clone())]);
        Some(Document { id: source.clone(), text, metadata, source_uri: Some(source) })
    }
}

fn is_pdf(path: &Path) -> bool {
    path.extension().and_then(|ext| ext.to_str()).is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

/// Read a file as UTF-8 text. Non-text content is skipped with a warning,
/// other I/O failures with an error diagnostic.
fn read_text(path: &Path) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(text) => Some(text),
        Err(e) if e.kind() == ErrorKind::InvalidData => {
            warn!(path = %path.display(), "skipping non-text or unsupported file");
            None
        }
        Err(e) => {
            error!(path = %path.display(), error = %e, "error reading file");
            None
        }
    }
}

/// Extract the concatenated text of all pages of a PDF file.
fn read_pdf(path: &Path) -> Option<String> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            error!(path = %path.display(), error = %e, "error reading file");
            return None;
        }
    };
    match pdf_extract::extract_text_from_mem(&bytes) {
        Ok(text) => Some(text),
        Err(e) => {
            error!(path = %path.display(), error = %e, "error extracting PDF text");
            None
        }
    }
}
