use serde::{Deserialize, Serialize};

/// Positional and descriptive metadata stamped on every chunk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Source filename (no directory component)
    pub source: String,
    /// Document title, falling back to the filename
    pub title: String,
    /// Document author, falling back to "Unknown"
    pub author: String,
    /// Number of physical pages in the source document
    pub total_pages: u32,
    /// 1-based physical page number
    pub page: u32,
    /// 0-based index of the chunk within its page
    pub chunk_index: u32,
    /// Knowledge category (e.g., "workout", "nutrition", "anatomy")
    pub category: String,
}

/// A bounded window of cleaned text from one page of one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentChunk {
    pub content: String,
    pub metadata: ChunkMetadata,
}

impl DocumentChunk {
    /// Stable identifier of the chunk inside a collection
    pub fn id(&self) -> String {
        format!(
            "{}:{}:{}",
            self.metadata.source, self.metadata.page, self.metadata.chunk_index
        )
    }
}

/// A persisted record in the vector index
#[derive(Debug, Clone)]
pub struct IndexedEntry {
    pub id: String,
    pub vector: Vec<f32>,
    pub content: String,
    pub metadata: ChunkMetadata,
}

impl IndexedEntry {
    pub fn from_chunk(chunk: DocumentChunk, vector: Vec<f32>) -> Self {
        Self {
            id: chunk.id(),
            vector,
            content: chunk.content,
            metadata: chunk.metadata,
        }
    }
}

/// A chunk returned by similarity search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalResult {
    pub content: String,
    pub metadata: ChunkMetadata,
    /// Similarity score in (0, 1]; higher is more similar
    pub score: f32,
}

/// Optional restriction applied to a similarity search
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilter {
    pub category: Option<String>,
    pub source: Option<String>,
}

impl SearchFilter {
    pub fn category(category: impl Into<String>) -> Self {
        Self {
            category: Some(category.into()),
            source: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.category.is_none() && self.source.is_none()
    }
}

/// A reference to the passage an answer was grounded on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceCitation {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    pub snippet: String,
    pub category: String,
}

/// Answer produced by the query engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatAnswer {
    pub response: String,
    /// Empty whenever the answer was produced without retrieval
    pub sources: Vec<SourceCitation>,
}

impl ChatAnswer {
    pub fn without_sources(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            sources: Vec::new(),
        }
    }
}

/// Which query path a chat request takes
///
/// `direct` (alias `gemini`) selects the model-only path; any other value,
/// including an unknown one, selects coaching.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatMode {
    /// Retrieval-augmented coaching answer
    #[default]
    Coach,
    /// Model-only answer
    Direct,
}

impl ChatMode {
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "direct" | "gemini" => ChatMode::Direct,
            _ => ChatMode::Coach,
        }
    }
}

impl<'de> Deserialize<'de> for ChatMode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let name = Option::<String>::deserialize(deserializer)?;
        Ok(name.as_deref().map(ChatMode::from_name).unwrap_or_default())
    }
}

/// Chat request accepted by the HTTP API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub query: String,
    pub user_id: String,
    /// Optional free-form user context (goals, injuries, equipment)
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub mode: ChatMode,
}

/// Chat response returned by the HTTP API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    pub sources: Vec<SourceCitation>,
    /// UTC timestamp formatted as `%Y-%m-%dT%H:%M:%SZ`
    pub timestamp: String,
}

/// Health report returned by the HTTP API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// "ok", "no_documents" or "error: <message>"
    pub status: String,
    pub version: String,
    pub document_count: usize,
    pub model: String,
}

/// Size and identity of the vector index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
    pub count: usize,
    pub collection: String,
    pub embedding_model: String,
}

/// Per-category share of the knowledge base
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryStats {
    pub category: String,
    pub document_count: usize,
    pub chunk_count: usize,
}

/// Result of ingesting one directory of PDFs
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngestReport {
    /// Number of PDFs that produced chunks
    pub files_processed: usize,
    /// Number of PDFs that could not be read or parsed
    pub files_failed: usize,
    /// Number of chunks produced by extraction
    pub chunks_created: usize,
    /// Number of chunks stored in the index
    pub chunks_added: usize,
    /// Time taken in milliseconds
    pub duration_ms: u64,
    /// Per-file errors (non-fatal)
    #[serde(default)]
    pub errors: Vec<String>,
}
