//! Shared stand-ins for integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use gymrat_rag::embedding::EmbeddingProvider;
use gymrat_rag::error::LlmError;
use gymrat_rag::llm::LanguageModel;
use gymrat_rag::types::{IndexedEntry, RetrievalResult, SearchFilter};
use gymrat_rag::vector_db::{DatabaseStats, VectorDatabase};
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};
use std::collections::HashMap;

/// One dimension per keyword, 1.0 when the text mentions it
pub struct KeywordEmbedder {
    keywords: Vec<&'static str>,
}

impl KeywordEmbedder {
    pub fn new(keywords: &[&'static str]) -> Self {
        Self {
            keywords: keywords.to_vec(),
        }
    }
}

impl EmbeddingProvider for KeywordEmbedder {
    fn embed_batch(&self, texts: Vec<String>) -> anyhow::Result<Vec<Vec<f32>>> {
        Ok(texts
            .iter()
            .map(|text| {
                let text = text.to_lowercase();
                self.keywords
                    .iter()
                    .map(|word| if text.contains(word) { 1.0 } else { 0.0 })
                    .collect()
            })
            .collect())
    }

    fn dimension(&self) -> usize {
        self.keywords.len()
    }

    fn model_name(&self) -> &str {
        "keyword-test"
    }
}

/// Fixed vectors per exact text; unknown text embeds to zeros
pub struct LookupEmbedder {
    vectors: HashMap<String, Vec<f32>>,
    dimension: usize,
}

impl LookupEmbedder {
    pub fn new(dimension: usize, pairs: &[(&str, Vec<f32>)]) -> Self {
        Self {
            vectors: pairs
                .iter()
                .map(|(text, vector)| (text.to_string(), vector.clone()))
                .collect(),
            dimension,
        }
    }
}

impl EmbeddingProvider for LookupEmbedder {
    fn embed_batch(&self, texts: Vec<String>) -> anyhow::Result<Vec<Vec<f32>>> {
        Ok(texts
            .iter()
            .map(|text| {
                self.vectors
                    .get(text)
                    .cloned()
                    .unwrap_or_else(|| vec![0.0; self.dimension])
            })
            .collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        "lookup-test"
    }
}

/// Returns the prompt it was given
pub struct EchoModel;

#[async_trait]
impl LanguageModel for EchoModel {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        Ok(prompt.to_string())
    }

    fn model_name(&self) -> &str {
        "echo"
    }
}

/// Fails every call
pub struct FailingModel;

#[async_trait]
impl LanguageModel for FailingModel {
    async fn generate(&self, _prompt: &str) -> Result<String, LlmError> {
        Err(LlmError::Unavailable("connection refused".to_string()))
    }

    fn model_name(&self) -> &str {
        "failing"
    }
}

/// Claims to hold documents but fails every search
pub struct FailingDatabase;

#[async_trait]
impl VectorDatabase for FailingDatabase {
    async fn initialize(&self, _dimension: usize) -> anyhow::Result<()> {
        Ok(())
    }

    async fn store(&self, _entries: Vec<IndexedEntry>) -> anyhow::Result<usize> {
        anyhow::bail!("read-only")
    }

    async fn search(
        &self,
        _query_vector: Vec<f32>,
        _limit: usize,
        _filter: &SearchFilter,
    ) -> anyhow::Result<Vec<RetrievalResult>> {
        anyhow::bail!("lance file truncated")
    }

    async fn count(&self) -> anyhow::Result<usize> {
        Ok(10)
    }

    async fn clear(&self) -> anyhow::Result<()> {
        Ok(())
    }

    async fn get_statistics(&self) -> anyhow::Result<DatabaseStats> {
        Ok(DatabaseStats::default())
    }

    fn collection_name(&self) -> &str {
        "failing"
    }
}

/// Build a PDF with one text line per page
pub fn build_pdf(pages: &[&str], title: Option<&str>) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    if let Some(title) = title {
        let info_id = doc.add_object(dictionary! { "Title" => Object::string_literal(title) });
        doc.trailer.set("Info", info_id);
    }

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}
