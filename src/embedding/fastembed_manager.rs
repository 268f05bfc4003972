use super::EmbeddingProvider;
use crate::error::EmbeddingError;
use anyhow::{Context, Result, anyhow};
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use std::sync::Mutex;

/// Supported model names, their fastembed identifiers and output dimensions
const SUPPORTED_MODELS: &[(&str, EmbeddingModel, usize)] = &[
    ("all-MiniLM-L6-v2", EmbeddingModel::AllMiniLML6V2, 384),
    ("all-MiniLM-L12-v2", EmbeddingModel::AllMiniLML12V2, 384),
    ("BAAI/bge-small-en-v1.5", EmbeddingModel::BGESmallENV15, 384),
    ("BAAI/bge-base-en-v1.5", EmbeddingModel::BGEBaseENV15, 768),
];

/// FastEmbed-based embedding provider running a local ONNX model
pub struct FastEmbedManager {
    model: Mutex<TextEmbedding>,
    model_name: String,
    dimension: usize,
}

impl FastEmbedManager {
    /// Create a new FastEmbedManager with the default model (all-MiniLM-L6-v2)
    pub fn new() -> Result<Self, EmbeddingError> {
        Self::from_model_name("all-MiniLM-L6-v2")
    }

    /// Create a manager from a configured model name
    ///
    /// Accepts the bare name or the `sentence-transformers/` prefixed form.
    pub fn from_model_name(name: &str) -> Result<Self, EmbeddingError> {
        let (model_name, model, dimension) = resolve_model(name)?;
        Self::with_model(model_name, model, dimension)
    }

    fn with_model(
        model_name: &str,
        model: EmbeddingModel,
        dimension: usize,
    ) -> Result<Self, EmbeddingError> {
        tracing::info!("Initializing FastEmbed model: {}", model_name);

        let options = InitOptions::new(model).with_show_download_progress(true);
        let embedding_model = TextEmbedding::try_new(options)
            .map_err(|e| EmbeddingError::InitializationFailed(format!("{:#}", e)))?;

        Ok(Self {
            model: Mutex::new(embedding_model),
            model_name: model_name.to_string(),
            dimension,
        })
    }
}

/// Map a configured model name to its fastembed model and dimension
fn resolve_model(name: &str) -> Result<(&'static str, EmbeddingModel, usize), EmbeddingError> {
    let bare = name.strip_prefix("sentence-transformers/").unwrap_or(name);

    SUPPORTED_MODELS
        .iter()
        .find(|(known, _, _)| known.eq_ignore_ascii_case(bare))
        .map(|(known, model, dimension)| (*known, model.clone(), *dimension))
        .ok_or_else(|| EmbeddingError::UnknownModel(name.to_string()))
}

impl EmbeddingProvider for FastEmbedManager {
    fn embed_batch(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        tracing::debug!("Generating embeddings for {} texts", texts.len());

        let mut model = self
            .model
            .lock()
            .map_err(|e| anyhow!(EmbeddingError::LockPoisoned(e.to_string())))?;
        let embeddings = model
            .embed(texts, None)
            .context("Failed to generate embeddings")?;

        Ok(embeddings)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}
