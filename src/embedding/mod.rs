mod fastembed_manager;

pub use fastembed_manager::FastEmbedManager;

use anyhow::Result;

/// Trait for embedding generation
///
/// Implementations are blocking; async callers run them on the blocking pool.
pub trait EmbeddingProvider: Send + Sync {
    /// Generate one embedding per input text, in input order
    fn embed_batch(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>>;

    /// Get the dimension of the embeddings
    fn dimension(&self) -> usize;

    /// Get the model name
    fn model_name(&self) -> &str;
}
