// LanceDB is the embedded vector database (persisted on disk, no server required)
pub mod lance_client;
pub use lance_client::LanceVectorDB;

use crate::types::{CategoryStats, IndexedEntry, RetrievalResult, SearchFilter};
use anyhow::Result;

/// Trait for vector database operations
#[async_trait::async_trait]
pub trait VectorDatabase: Send + Sync {
    /// Create the collection if needed; fails if an existing collection
    /// stores vectors of a different dimension
    async fn initialize(&self, dimension: usize) -> Result<()>;

    /// Store entries, creating the collection on first use
    async fn store(&self, entries: Vec<IndexedEntry>) -> Result<usize>;

    /// Return up to `limit` nearest entries, best first
    async fn search(
        &self,
        query_vector: Vec<f32>,
        limit: usize,
        filter: &SearchFilter,
    ) -> Result<Vec<RetrievalResult>>;

    /// Number of stored entries; 0 when the collection does not exist yet
    async fn count(&self) -> Result<usize>;

    /// Drop the whole collection
    async fn clear(&self) -> Result<()>;

    /// Get statistics
    async fn get_statistics(&self) -> Result<DatabaseStats>;

    /// Name of the collection this database reads and writes
    fn collection_name(&self) -> &str;
}

#[derive(Debug, Clone, Default)]
pub struct DatabaseStats {
    pub total_chunks: usize,
    pub total_documents: usize,
    pub category_breakdown: Vec<CategoryStats>,
}
