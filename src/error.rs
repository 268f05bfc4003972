/// Centralized error types for gymrat-rag using thiserror
///
/// Domain errors are typed so the HTTP layer can tell caller mistakes apart from
/// failures of the embedding model, the vector database or the language model.
use thiserror::Error;

/// Main error type for the RAG system
#[derive(Error, Debug)]
pub enum RagError {
    #[error("Embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("Vector database error: {0}")]
    VectorDb(#[from] VectorDbError),

    #[error("Ingestion error: {0}")]
    Ingestion(#[from] IngestionError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Language model error: {0}")]
    Llm(#[from] LlmError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

/// Errors related to embedding generation
#[derive(Error, Debug)]
pub enum EmbeddingError {
    #[error("Failed to initialize embedding model: {0}")]
    InitializationFailed(String),

    #[error("Unknown embedding model: {0}")]
    UnknownModel(String),

    #[error("Failed to generate embeddings: {0}")]
    GenerationFailed(String),

    #[error("Embedding generation timed out after {0} ms")]
    Timeout(u64),

    #[error("Expected {expected} embeddings, got {actual}")]
    CountMismatch { expected: usize, actual: usize },

    #[error("Model lock was poisoned: {0}")]
    LockPoisoned(String),
}

/// Errors related to vector database operations
#[derive(Error, Debug)]
pub enum VectorDbError {
    #[error("Failed to connect to vector database: {0}")]
    ConnectionFailed(String),

    #[error(
        "Collection '{collection}' stores {stored}-dimensional vectors but the embedding model produces {expected}"
    )]
    DimensionMismatch {
        collection: String,
        stored: usize,
        expected: usize,
    },

    #[error("Failed to store entries: {0}")]
    StoreFailed(String),

    #[error("Failed to search entries: {0}")]
    SearchFailed(String),
}

/// Errors related to PDF ingestion
#[derive(Error, Debug)]
pub enum IngestionError {
    #[error("Directory not found: {0}")]
    DirectoryNotFound(String),

    #[error("Path is not a directory: {0}")]
    NotADirectory(String),

    #[error("Failed to read PDF '{file}': {reason}")]
    ReadFailed { file: String, reason: String },

    #[error("Failed to parse PDF '{file}': {reason}")]
    ParseFailed { file: String, reason: String },
}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration file: {0}")]
    LoadFailed(String),

    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    #[error("Invalid configuration value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Failed to save configuration: {0}")]
    SaveFailed(String),

    #[error("Configuration file not found: {0}")]
    FileNotFound(String),
}

/// Errors related to input validation
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Empty {0}")]
    Empty(String),

    #[error("{field} must be at most {max} characters, got {actual}")]
    TooLong {
        field: String,
        max: usize,
        actual: usize,
    },
}

/// Errors raised while calling the hosted language model
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Language model unavailable: {0}")]
    Unavailable(String),

    #[error("Language model request timed out after {0} seconds")]
    Timeout(u64),

    #[error("Language model returned status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Malformed language model response: {0}")]
    InvalidResponse(String),

    #[error("Language model returned no text")]
    EmptyResponse,
}

impl From<anyhow::Error> for RagError {
    fn from(err: anyhow::Error) -> Self {
        RagError::Other(format!("{:#}", err))
    }
}

impl RagError {
    /// Check if this is a caller error (bad request) vs system error
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            RagError::Validation(_) | RagError::Config(ConfigError::InvalidValue { .. })
        )
    }
}
