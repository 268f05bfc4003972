//! Vector index adapter
//!
//! Pairs an [`EmbeddingProvider`] with a [`VectorDatabase`] so callers deal in
//! text: chunks go in, scored chunks come out.

use crate::config::Config;
use crate::embedding::{EmbeddingProvider, FastEmbedManager};
use crate::error::{EmbeddingError, RagError, VectorDbError};
use crate::types::{DocumentChunk, IndexStats, IndexedEntry, RetrievalResult, SearchFilter};
use crate::vector_db::{DatabaseStats, LanceVectorDB, VectorDatabase};
use std::sync::Arc;
use std::time::Duration;

pub struct VectorIndex {
    embedder: Arc<dyn EmbeddingProvider>,
    database: Arc<dyn VectorDatabase>,
    batch_size: usize,
    embed_timeout: Duration,
}

impl VectorIndex {
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        database: Arc<dyn VectorDatabase>,
        batch_size: usize,
        embed_timeout: Duration,
    ) -> Self {
        Self {
            embedder,
            database,
            batch_size: batch_size.max(1),
            embed_timeout,
        }
    }

    /// Build the FastEmbed + LanceDB index described by `config` and make
    /// sure its collection matches the embedding dimension
    pub async fn open(config: &Config) -> Result<Self, RagError> {
        tracing::info!(
            "Opening vector index '{}' at {}",
            config.vector_db.collection_name,
            config.vector_db.path.display()
        );

        let model_name = config.embedding.model_name.clone();
        let embedder = tokio::task::spawn_blocking(move || FastEmbedManager::from_model_name(&model_name))
            .await
            .map_err(|e| {
                EmbeddingError::InitializationFailed(format!("Model loading task panicked: {}", e))
            })??;

        let database = LanceVectorDB::with_path(
            &config.vector_db.path.to_string_lossy(),
            &config.vector_db.collection_name,
        )
        .await
        .map_err(|e| db_error(e, VectorDbError::ConnectionFailed))?;

        let index = Self::new(
            Arc::new(embedder),
            Arc::new(database),
            config.embedding.batch_size,
            Duration::from_secs(config.embedding.timeout_secs),
        );
        index.initialize().await?;
        Ok(index)
    }

    /// Create the collection if missing; reject a collection built with a
    /// different embedding dimension
    pub async fn initialize(&self) -> Result<(), RagError> {
        self.database
            .initialize(self.embedder.dimension())
            .await
            .map_err(|e| db_error(e, VectorDbError::ConnectionFailed))
    }

    /// Embed and store chunks, returning how many were stored
    pub async fn add(&self, chunks: Vec<DocumentChunk>) -> Result<usize, RagError> {
        if chunks.is_empty() {
            return Ok(0);
        }

        let total = chunks.len();
        let mut entries = Vec::with_capacity(total);
        let mut remaining = chunks.into_iter().peekable();

        while remaining.peek().is_some() {
            let batch: Vec<DocumentChunk> = remaining.by_ref().take(self.batch_size).collect();
            let texts: Vec<String> = batch.iter().map(|chunk| chunk.content.clone()).collect();
            let vectors = self.embed(texts).await?;

            entries.extend(
                batch
                    .into_iter()
                    .zip(vectors)
                    .map(|(chunk, vector)| IndexedEntry::from_chunk(chunk, vector)),
            );
            tracing::debug!("Embedded {}/{} chunks", entries.len(), total);
        }

        let stored = self
            .database
            .store(entries)
            .await
            .map_err(|e| db_error(e, VectorDbError::StoreFailed))?;

        tracing::info!(
            collection = %self.database.collection_name(),
            stored,
            "Added chunks to index"
        );
        Ok(stored)
    }

    /// Return the `k` chunks most similar to `query`, best first
    pub async fn search(
        &self,
        query: &str,
        k: usize,
        filter: Option<&SearchFilter>,
    ) -> Result<Vec<RetrievalResult>, RagError> {
        let query_vector = self
            .embed(vec![query.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or(EmbeddingError::CountMismatch {
                expected: 1,
                actual: 0,
            })?;

        let no_filter = SearchFilter::default();
        self.database
            .search(query_vector, k, filter.unwrap_or(&no_filter))
            .await
            .map_err(|e| db_error(e, VectorDbError::SearchFailed))
    }

    /// Entry count and identity; an empty or missing collection reports 0
    pub async fn stats(&self) -> Result<IndexStats, RagError> {
        let count = self
            .database
            .count()
            .await
            .map_err(|e| db_error(e, VectorDbError::SearchFailed))?;

        Ok(IndexStats {
            count,
            collection: self.database.collection_name().to_string(),
            embedding_model: self.embedder.model_name().to_string(),
        })
    }

    /// Per-category breakdown of the collection
    pub async fn statistics(&self) -> Result<DatabaseStats, RagError> {
        self.database
            .get_statistics()
            .await
            .map_err(|e| db_error(e, VectorDbError::SearchFailed))
    }

    /// Drop every entry in the collection
    pub async fn clear(&self) -> Result<(), RagError> {
        self.database
            .clear()
            .await
            .map_err(|e| db_error(e, VectorDbError::StoreFailed))
    }

    pub fn embedding_model(&self) -> &str {
        self.embedder.model_name()
    }

    /// Run the blocking embedder on the blocking pool under the configured timeout
    async fn embed(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let expected = texts.len();
        let provider = Arc::clone(&self.embedder);
        let embed_future = tokio::task::spawn_blocking(move || provider.embed_batch(texts));

        let vectors = match tokio::time::timeout(self.embed_timeout, embed_future).await {
            Ok(Ok(Ok(vectors))) => vectors,
            Ok(Ok(Err(e))) => return Err(EmbeddingError::GenerationFailed(format!("{:#}", e))),
            Ok(Err(e)) => {
                return Err(EmbeddingError::GenerationFailed(format!(
                    "Embedding task panicked: {}",
                    e
                )));
            }
            Err(_) => return Err(EmbeddingError::Timeout(self.embed_timeout.as_millis() as u64)),
        };

        if vectors.len() != expected {
            return Err(EmbeddingError::CountMismatch {
                expected,
                actual: vectors.len(),
            });
        }
        Ok(vectors)
    }
}

/// Keep typed database errors, wrap everything else in the given variant
fn db_error(err: anyhow::Error, wrap: fn(String) -> VectorDbError) -> RagError {
    match err.downcast::<VectorDbError>() {
        Ok(typed) => typed.into(),
        Err(other) => wrap(format!("{:#}", other)).into(),
    }
}
