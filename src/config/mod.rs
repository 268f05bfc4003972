/// Configuration system for gymrat-rag
///
/// Supports loading from multiple sources with priority:
/// CLI args > Environment variables (including `.env`) > Config file > Defaults
use crate::error::{ConfigError, RagError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Environment variable holding the Gemini API key
pub const API_KEY_ENV: &str = "GOOGLE_GEMINI_API_KEY";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Vector database configuration
    #[serde(default)]
    pub vector_db: VectorDbConfig,

    /// Embedding model configuration
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Language model configuration
    #[serde(default)]
    pub llm: LlmConfig,

    /// PDF chunking configuration
    #[serde(default)]
    pub chunking: ChunkingConfig,

    /// Retrieval configuration
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
}

/// Vector database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorDbConfig {
    /// LanceDB data directory path
    #[serde(default = "default_lancedb_path")]
    pub path: PathBuf,

    /// Collection (table) name; re-opening the same name resumes the collection
    #[serde(default = "default_collection_name")]
    pub collection_name: String,
}

/// Embedding model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Model name (e.g., "all-MiniLM-L6-v2", "BAAI/bge-small-en-v1.5")
    #[serde(default = "default_embedding_model")]
    pub model_name: String,

    /// Batch size for embedding generation
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Timeout in seconds for a single embedding batch
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Hosted language model configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// API key; only ever read from the environment, never written back to disk
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    /// Model identifier (e.g., "gemini-2.0-flash")
    #[serde(default = "default_llm_model")]
    pub model_name: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum number of output tokens
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Base URL of the Gemini REST API
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,
}

/// PDF chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Target chunk size in characters
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Characters shared between consecutive chunks
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,
}

/// Retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Number of chunks retrieved per question
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Origins allowed to call the API from a browser
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

fn default_lancedb_path() -> PathBuf {
    crate::paths::PlatformPaths::default_lancedb_path()
}

fn default_collection_name() -> String {
    "fitness_knowledge".to_string()
}

fn default_embedding_model() -> String {
    "all-MiniLM-L6-v2".to_string()
}

fn default_batch_size() -> usize {
    32
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_llm_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_output_tokens() -> u32 {
    1024
}

fn default_llm_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_chunk_size() -> usize {
    1000
}

fn default_chunk_overlap() -> usize {
    200
}

fn default_top_k() -> usize {
    5
}

fn default_port() -> u16 {
    8000
}

fn default_cors_origins() -> Vec<String> {
    vec!["http://localhost:3000".to_string()]
}

impl Default for VectorDbConfig {
    fn default() -> Self {
        Self {
            path: default_lancedb_path(),
            collection_name: default_collection_name(),
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model_name: default_embedding_model(),
            batch_size: default_batch_size(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model_name: default_llm_model(),
            temperature: default_temperature(),
            max_output_tokens: default_max_output_tokens(),
            timeout_secs: default_timeout_secs(),
            base_url: default_llm_base_url(),
        }
    }
}

impl fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model_name", &self.model_name)
            .field("temperature", &self.temperature)
            .field("max_output_tokens", &self.max_output_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
        }
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            cors_origins: default_cors_origins(),
        }
    }
}

impl LlmConfig {
    /// Return the API key or fail with the startup-fatal configuration error
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingRequired(API_KEY_ENV.to_string()))
    }
}

impl Config {
    /// Load configuration from file
    pub fn from_file(path: &Path) -> Result<Self, RagError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()).into());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::LoadFailed(format!("Failed to read config file: {}", e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| ConfigError::ParseFailed(format!("Invalid TOML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from default location or create default
    pub fn load_or_default() -> Result<Self, RagError> {
        let config_path = crate::paths::PlatformPaths::default_config_path();

        if config_path.exists() {
            tracing::info!("Loading config from: {}", config_path.display());
            Self::from_file(&config_path)
        } else {
            tracing::info!("No config file found, using defaults");
            Ok(Self::default())
        }
    }

    /// Write a default config file, refusing to replace one unless `force`
    pub fn init_file(path: &Path, force: bool) -> Result<(), RagError> {
        if path.exists() && !force {
            return Err(ConfigError::SaveFailed(format!(
                "{} already exists (pass --force to overwrite)",
                path.display()
            ))
            .into());
        }
        Self::default().save(path)
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<(), RagError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ConfigError::SaveFailed(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SaveFailed(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| ConfigError::SaveFailed(format!("Failed to write config file: {}", e)))?;

        tracing::info!("Saved config to: {}", path.display());
        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), RagError> {
        if self.vector_db.collection_name.trim().is_empty() {
            return Err(invalid("vector_db.collection_name", "must not be empty"));
        }

        if self.embedding.batch_size == 0 {
            return Err(invalid("embedding.batch_size", "must be greater than 0"));
        }

        if self.chunking.chunk_size == 0 {
            return Err(invalid("chunking.chunk_size", "must be greater than 0"));
        }

        if self.chunking.chunk_overlap >= self.chunking.chunk_size {
            return Err(invalid(
                "chunking.chunk_overlap",
                &format!(
                    "must be smaller than chunk_size ({}), got {}",
                    self.chunking.chunk_size, self.chunking.chunk_overlap
                ),
            ));
        }

        if self.retrieval.top_k == 0 {
            return Err(invalid("retrieval.top_k", "must be greater than 0"));
        }

        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(invalid(
                "llm.temperature",
                &format!("must be between 0.0 and 2.0, got {}", self.llm.temperature),
            ));
        }

        if self.llm.max_output_tokens == 0 {
            return Err(invalid("llm.max_output_tokens", "must be greater than 0"));
        }

        Ok(())
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary key lookup (the process environment in production)
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(model) = lookup("GYMRAT_EMBEDDING_MODEL") {
            self.embedding.model_name = model;
        }

        if let Some(batch_size) = lookup("GYMRAT_EMBEDDING_BATCH_SIZE")
            && let Ok(size) = batch_size.parse()
        {
            self.embedding.batch_size = size;
        }

        if let Some(path) = lookup("GYMRAT_INDEX_PATH") {
            self.vector_db.path = PathBuf::from(path);
        }

        if let Some(collection) = lookup("GYMRAT_COLLECTION") {
            self.vector_db.collection_name = collection;
        }

        if let Some(api_key) = lookup(API_KEY_ENV) {
            self.llm.api_key = Some(api_key);
        }

        if let Some(model) = lookup("GYMRAT_LLM_MODEL") {
            self.llm.model_name = model;
        }

        if let Some(temperature) = lookup("GYMRAT_TEMPERATURE")
            && let Ok(value) = temperature.parse()
        {
            self.llm.temperature = value;
        }

        if let Some(max_tokens) = lookup("GYMRAT_MAX_TOKENS")
            && let Ok(value) = max_tokens.parse()
        {
            self.llm.max_output_tokens = value;
        }

        if let Some(top_k) = lookup("GYMRAT_TOP_K")
            && let Ok(value) = top_k.parse()
        {
            self.retrieval.top_k = value;
        }

        if let Some(chunk_size) = lookup("GYMRAT_CHUNK_SIZE")
            && let Ok(value) = chunk_size.parse()
        {
            self.chunking.chunk_size = value;
        }

        if let Some(chunk_overlap) = lookup("GYMRAT_CHUNK_OVERLAP")
            && let Ok(value) = chunk_overlap.parse()
        {
            self.chunking.chunk_overlap = value;
        }

        if let Some(port) = lookup("GYMRAT_PORT")
            && let Ok(value) = port.parse()
        {
            self.server.port = value;
        }

        if let Some(origins) = lookup("CORS_ORIGINS") {
            self.server.cors_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(str::to_string)
                .collect();
        }
    }

    /// Create a new Config from `.env`, the config file and environment overrides
    pub fn new() -> Result<Self, RagError> {
        dotenvy::dotenv().ok();
        let mut config = Self::load_or_default()?;
        config.apply_env_overrides();
        config.validate()?;
        tracing::debug!(
            index_path = %config.vector_db.path.display(),
            collection = %config.vector_db.collection_name,
            embedding_model = %config.embedding.model_name,
            llm_model = %config.llm.model_name,
            "Loaded configuration"
        );
        Ok(config)
    }
}

fn invalid(key: &str, reason: &str) -> RagError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        reason: reason.to_string(),
    }
    .into()
}
