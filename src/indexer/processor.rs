use super::category::detect_category;
use super::chunker::TextSplitter;
use super::pdf_extractor::{ExtractedPdf, extract_pdf};
use super::text_cleaner::clean_text;
use crate::config::ChunkingConfig;
use crate::error::IngestionError;
use crate::types::{ChunkMetadata, DocumentChunk};
use rayon::prelude::*;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Chunks extracted from a directory, with per-file bookkeeping
#[derive(Debug, Default)]
pub struct DirectoryOutcome {
    pub chunks: Vec<DocumentChunk>,
    pub files_processed: usize,
    pub files_failed: usize,
    pub errors: Vec<String>,
}

/// Turns PDFs into cleaned, chunked, metadata-stamped text
#[derive(Debug, Clone, Default)]
pub struct PdfProcessor {
    splitter: TextSplitter,
}

impl PdfProcessor {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            splitter: TextSplitter::new(chunk_size, chunk_overlap),
        }
    }

    pub fn from_config(config: &ChunkingConfig) -> Self {
        Self::new(config.chunk_size, config.chunk_overlap)
    }

    /// Extract, clean and chunk one PDF file
    pub fn process_pdf(
        &self,
        path: &Path,
        category: &str,
    ) -> Result<Vec<DocumentChunk>, IngestionError> {
        let document = extract_pdf(path)?;
        Ok(self.process_document(&document, category))
    }

    /// Clean and chunk an already extracted document
    ///
    /// Pages whose cleaned text is empty are skipped; page numbers stay physical.
    pub fn process_document(&self, document: &ExtractedPdf, category: &str) -> Vec<DocumentChunk> {
        let title = document
            .title
            .clone()
            .unwrap_or_else(|| document.source.clone());
        let author = document
            .author
            .clone()
            .unwrap_or_else(|| "Unknown".to_string());
        let total_pages = document.total_pages();

        let mut chunks = Vec::new();
        for (page_idx, page_text) in document.pages.iter().enumerate() {
            let cleaned = clean_text(page_text);
            if cleaned.is_empty() {
                continue;
            }

            let page = page_idx as u32 + 1;
            for (chunk_index, content) in self.splitter.split(&cleaned).into_iter().enumerate() {
                chunks.push(DocumentChunk {
                    content,
                    metadata: ChunkMetadata {
                        source: document.source.clone(),
                        title: title.clone(),
                        author: author.clone(),
                        total_pages,
                        page,
                        chunk_index: chunk_index as u32,
                        category: category.to_string(),
                    },
                });
            }
        }

        chunks
    }

    /// Process every `*.pdf` directly inside `directory` in parallel
    ///
    /// When `category` is `None` each file's category is detected from its
    /// filename. A file that fails is logged and counted; the batch continues.
    pub fn process_directory(
        &self,
        directory: &Path,
        category: Option<&str>,
    ) -> Result<DirectoryOutcome, IngestionError> {
        if !directory.exists() {
            return Err(IngestionError::DirectoryNotFound(
                directory.display().to_string(),
            ));
        }
        if !directory.is_dir() {
            return Err(IngestionError::NotADirectory(directory.display().to_string()));
        }

        let files = list_pdfs(directory);
        tracing::info!(
            directory = %directory.display(),
            files = files.len(),
            "Processing PDF directory"
        );

        let results: Vec<(PathBuf, Result<Vec<DocumentChunk>, IngestionError>)> = files
            .par_iter()
            .map(|path| {
                let category = category.unwrap_or_else(|| {
                    detect_category(
                        &path
                            .file_name()
                            .map(|name| name.to_string_lossy().into_owned())
                            .unwrap_or_default(),
                    )
                });
                let result = isolate_panics(path, || self.process_pdf(path, category));
                (path.clone(), result)
            })
            .collect();

        let mut outcome = DirectoryOutcome::default();
        for (path, result) in results {
            match result {
                Ok(chunks) => {
                    if chunks.is_empty() {
                        tracing::warn!(file = %path.display(), "PDF produced no extractable text");
                    } else {
                        tracing::info!(file = %path.display(), chunks = chunks.len(), "Processed PDF");
                    }
                    outcome.files_processed += 1;
                    outcome.chunks.extend(chunks);
                }
                Err(e) => {
                    tracing::warn!(file = %path.display(), error = %e, "Failed to process PDF");
                    outcome.files_failed += 1;
                    outcome.errors.push(e.to_string());
                }
            }
        }

        Ok(outcome)
    }
}

/// Run one file's work, turning a panic into a parse failure for that file
fn isolate_panics<T>(
    path: &Path,
    work: impl FnOnce() -> Result<T, IngestionError>,
) -> Result<T, IngestionError> {
    panic::catch_unwind(AssertUnwindSafe(work)).unwrap_or_else(|_| {
        Err(IngestionError::ParseFailed {
            file: path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            reason: "processing aborted on malformed content".to_string(),
        })
    })
}

/// PDFs directly inside `directory` (case-insensitive extension), sorted by path
fn list_pdfs(directory: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(directory)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
        })
        .collect();
    files.sort();
    files
}
