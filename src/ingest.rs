//! Ingestion pipeline: directory of PDFs → chunks → vector index

use crate::error::RagError;
use crate::indexer::PdfProcessor;
use crate::types::IngestReport;
use crate::vector_index::VectorIndex;
use anyhow::Context;
use std::path::Path;
use std::time::Instant;

/// Extract every PDF in `directory` and add the chunks to `index`
///
/// Extraction runs on the blocking pool (in parallel across files); embedding
/// and storage happen afterwards. Per-file failures are reported, not raised.
pub async fn ingest_directory(
    processor: &PdfProcessor,
    index: &VectorIndex,
    directory: &Path,
    category: Option<&str>,
) -> Result<IngestReport, RagError> {
    let start = Instant::now();

    let processor = processor.clone();
    let dir = directory.to_path_buf();
    let category_owned = category.map(str::to_string);
    let outcome = tokio::task::spawn_blocking(move || {
        processor.process_directory(&dir, category_owned.as_deref())
    })
    .await
    .context("PDF extraction task panicked")??;

    let chunks_created = outcome.chunks.len();
    let mut report = IngestReport {
        files_processed: outcome.files_processed,
        files_failed: outcome.files_failed,
        chunks_created,
        errors: outcome.errors,
        ..IngestReport::default()
    };

    if chunks_created == 0 {
        tracing::warn!(directory = %directory.display(), "No chunks extracted, nothing to index");
        report
            .errors
            .push("No text chunks found to index".to_string());
    } else {
        tracing::info!(
            files = report.files_processed,
            chunks = chunks_created,
            "Embedding and storing chunks"
        );
        report.chunks_added = index.add(outcome.chunks).await?;
    }

    report.duration_ms = start.elapsed().as_millis() as u64;
    tracing::info!(
        files_processed = report.files_processed,
        files_failed = report.files_failed,
        chunks_added = report.chunks_added,
        duration_ms = report.duration_ms,
        "Ingestion complete"
    );
    Ok(report)
}
