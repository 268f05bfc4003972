use super::*;
use crate::embedding::EmbeddingProvider;
use crate::error::LlmError;
use crate::types::{ChunkMetadata, DocumentChunk, IndexedEntry, RetrievalResult, SearchFilter};
use crate::vector_db::{DatabaseStats, VectorDatabase};
use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;

/// Embeds by keyword presence so similarity is predictable
struct KeywordEmbedder;

impl EmbeddingProvider for KeywordEmbedder {
    fn embed_batch(&self, texts: Vec<String>) -> anyhow::Result<Vec<Vec<f32>>> {
        Ok(texts
            .iter()
            .map(|text| {
                let text = text.to_lowercase();
                ["squat", "protein", "sleep"]
                    .iter()
                    .map(|word| if text.contains(word) { 1.0 } else { 0.0 })
                    .collect()
            })
            .collect())
    }

    fn dimension(&self) -> usize {
        3
    }

    fn model_name(&self) -> &str {
        "keyword-test"
    }
}

/// Brute-force in-memory database
#[derive(Default)]
struct MemoryDatabase {
    entries: Mutex<Vec<IndexedEntry>>,
}

#[async_trait]
impl VectorDatabase for MemoryDatabase {
    async fn initialize(&self, _dimension: usize) -> anyhow::Result<()> {
        Ok(())
    }

    async fn store(&self, entries: Vec<IndexedEntry>) -> anyhow::Result<usize> {
        let count = entries.len();
        self.entries.lock().unwrap().extend(entries);
        Ok(count)
    }

    async fn search(
        &self,
        query_vector: Vec<f32>,
        limit: usize,
        _filter: &SearchFilter,
    ) -> anyhow::Result<Vec<RetrievalResult>> {
        let entries = self.entries.lock().unwrap();
        let mut results: Vec<RetrievalResult> = entries
            .iter()
            .map(|entry| {
                let distance: f32 = entry
                    .vector
                    .iter()
                    .zip(&query_vector)
                    .map(|(a, b)| (a - b) * (a - b))
                    .sum();
                RetrievalResult {
                    content: entry.content.clone(),
                    metadata: entry.metadata.clone(),
                    score: 1.0 / (1.0 + distance),
                }
            })
            .collect();
        results.sort_by(|a, b| b.score.total_cmp(&a.score));
        results.truncate(limit);
        Ok(results)
    }

    async fn count(&self) -> anyhow::Result<usize> {
        Ok(self.entries.lock().unwrap().len())
    }

    async fn clear(&self) -> anyhow::Result<()> {
        self.entries.lock().unwrap().clear();
        Ok(())
    }

    async fn get_statistics(&self) -> anyhow::Result<DatabaseStats> {
        Ok(DatabaseStats::default())
    }

    fn collection_name(&self) -> &str {
        "memory"
    }
}

/// Reports documents but fails every search; optionally fails stats too
struct BrokenDatabase {
    count_fails: bool,
}

#[async_trait]
impl VectorDatabase for BrokenDatabase {
    async fn initialize(&self, _dimension: usize) -> anyhow::Result<()> {
        Ok(())
    }

    async fn store(&self, _entries: Vec<IndexedEntry>) -> anyhow::Result<usize> {
        anyhow::bail!("store unavailable")
    }

    async fn search(
        &self,
        _query_vector: Vec<f32>,
        _limit: usize,
        _filter: &SearchFilter,
    ) -> anyhow::Result<Vec<RetrievalResult>> {
        anyhow::bail!("index file is corrupt")
    }

    async fn count(&self) -> anyhow::Result<usize> {
        if self.count_fails {
            anyhow::bail!("cannot open collection")
        }
        Ok(3)
    }

    async fn clear(&self) -> anyhow::Result<()> {
        Ok(())
    }

    async fn get_statistics(&self) -> anyhow::Result<DatabaseStats> {
        anyhow::bail!("cannot open collection")
    }

    fn collection_name(&self) -> &str {
        "broken"
    }
}

/// Returns the prompt it was given
struct EchoModel;

#[async_trait]
impl LanguageModel for EchoModel {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        Ok(prompt.to_string())
    }

    fn model_name(&self) -> &str {
        "echo"
    }
}

/// Fails grounded prompts, echoes everything else; `always` fails every call
struct FailingModel {
    always: bool,
}

#[async_trait]
impl LanguageModel for FailingModel {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        if self.always || prompt.contains("CONTEXT:") {
            return Err(LlmError::Api {
                status: 500,
                message: "internal model failure".to_string(),
            });
        }
        Ok(prompt.to_string())
    }

    fn model_name(&self) -> &str {
        "failing"
    }
}

fn chunk(source: &str, page: u32, chunk_index: u32, content: &str) -> DocumentChunk {
    DocumentChunk {
        content: content.to_string(),
        metadata: ChunkMetadata {
            source: source.to_string(),
            title: source.to_string(),
            author: "Unknown".to_string(),
            total_pages: 4,
            page,
            chunk_index,
            category: "workout".to_string(),
        },
    }
}

fn index_over(database: Arc<dyn VectorDatabase>) -> Arc<VectorIndex> {
    Arc::new(VectorIndex::new(
        Arc::new(KeywordEmbedder),
        database,
        16,
        Duration::from_secs(5),
    ))
}

async fn populated_index() -> Arc<VectorIndex> {
    let index = index_over(Arc::new(MemoryDatabase::default()));
    index
        .add(vec![
            chunk("legs.pdf", 1, 0, "Squat to depth with a braced core."),
            chunk("legs.pdf", 1, 1, "Squat variations include front and box squats."),
            chunk("legs.pdf", 2, 0, "Squat twice a week for strength."),
            chunk("food.pdf", 1, 0, "Protein at every meal supports recovery."),
        ])
        .await
        .unwrap();
    index
}

#[tokio::test]
async fn test_empty_index_disables_retrieval() {
    let engine = QueryEngine::new(
        index_over(Arc::new(MemoryDatabase::default())),
        Arc::new(EchoModel),
        5,
    )
    .await;
    assert_eq!(engine.mode(), RetrievalMode::Disabled);

    let answer = engine.query("How deep should I squat?").await;
    assert!(answer.sources.is_empty());
    assert!(answer.response.contains("How deep should I squat?"));

    let direct = engine.query_direct("How deep should I squat?").await;
    assert!(direct.sources.is_empty());
}

#[tokio::test]
async fn test_query_uses_retrieved_context() {
    let engine = QueryEngine::new(populated_index().await, Arc::new(EchoModel), 3).await;
    assert_eq!(engine.mode(), RetrievalMode::Enabled);

    let answer = engine.query("How often should I squat?").await;

    assert!(answer.response.contains("CONTEXT:"));
    assert!(answer.response.contains("Squat twice a week for strength."));
    assert!(!answer.sources.is_empty());
    assert!(answer.sources.iter().all(|s| s.title == "legs.pdf"));

    // Two chunks of legs.pdf page 1 collapse into one citation
    let pages: Vec<Option<u32>> = answer.sources.iter().map(|s| s.page).collect();
    assert_eq!(pages.len(), 2);
    assert!(pages.contains(&Some(1)));
    assert!(pages.contains(&Some(2)));
}

#[tokio::test]
async fn test_query_direct_never_retrieves() {
    let engine = QueryEngine::new(populated_index().await, Arc::new(EchoModel), 3).await;

    let answer = engine.query_direct("How often should I squat?").await;
    assert!(answer.sources.is_empty());
    assert!(!answer.response.contains("CONTEXT:"));
}

#[tokio::test]
async fn test_search_error_falls_back_to_model() {
    let engine = QueryEngine::new(
        index_over(Arc::new(BrokenDatabase { count_fails: false })),
        Arc::new(EchoModel),
        5,
    )
    .await;
    assert_eq!(engine.mode(), RetrievalMode::Enabled);

    let answer = engine.query("Is creatine safe?").await;
    assert!(answer.sources.is_empty());
    assert!(answer.response.contains("Question: Is creatine safe?"));
    assert!(!answer.response.contains("corrupt"));
}

#[tokio::test]
async fn test_stats_error_disables_retrieval() {
    let engine = QueryEngine::new(
        index_over(Arc::new(BrokenDatabase { count_fails: true })),
        Arc::new(EchoModel),
        5,
    )
    .await;
    assert_eq!(engine.mode(), RetrievalMode::Disabled);

    let answer = engine.query("Is creatine safe?").await;
    assert!(answer.sources.is_empty());
}

#[tokio::test]
async fn test_grounded_generation_failure_falls_back() {
    let engine = QueryEngine::new(
        populated_index().await,
        Arc::new(FailingModel { always: false }),
        3,
    )
    .await;

    let answer = engine.query("How often should I squat?").await;
    assert!(answer.sources.is_empty());
    assert!(answer.response.contains("Question: How often should I squat?"));
}

#[tokio::test]
async fn test_model_failure_returns_apology() {
    let engine = QueryEngine::new(
        populated_index().await,
        Arc::new(FailingModel { always: true }),
        3,
    )
    .await;

    let answer = engine.query("How often should I squat?").await;
    assert_eq!(answer.response, FALLBACK_MESSAGE);
    assert!(answer.sources.is_empty());
    assert!(!answer.response.contains("internal model failure"));

    let direct = engine.query_direct("Anything").await;
    assert_eq!(direct.response, FALLBACK_MESSAGE);
}

#[tokio::test]
async fn test_mode_is_fixed_at_construction() {
    let database = Arc::new(MemoryDatabase::default());
    let index = index_over(database);
    let engine = QueryEngine::new(Arc::clone(&index), Arc::new(EchoModel), 3).await;
    assert_eq!(engine.mode(), RetrievalMode::Disabled);

    index
        .add(vec![chunk("legs.pdf", 1, 0, "Squat deep.")])
        .await
        .unwrap();

    assert_eq!(engine.mode(), RetrievalMode::Disabled);
    assert!(engine.query("squat tips").await.sources.is_empty());
}
