//! Retrieval-augmented query engine
//!
//! Answers a question from the indexed knowledge base when it can and falls
//! back to asking the model directly when it cannot. The engine never returns
//! an error to its caller: failures degrade to a model-only answer, and a
//! failing model degrades to a fixed apology.

mod citations;
mod prompts;

pub use citations::{SNIPPET_CHARS, build_citations, snippet};
pub use prompts::{coaching_prompt, direct_prompt, with_user_context};

use crate::llm::LanguageModel;
use crate::types::ChatAnswer;
use crate::vector_index::VectorIndex;
use std::sync::Arc;

/// Answer returned when the model itself cannot be reached
pub const FALLBACK_MESSAGE: &str =
    "Sorry, I couldn't generate a response right now. Please try again in a moment.";

/// Whether questions are answered from the index, fixed when the engine is built
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetrievalMode {
    /// The index held documents at startup
    Enabled,
    /// Empty or unreadable index; every question goes to the model alone
    Disabled,
}

pub struct QueryEngine {
    index: Arc<VectorIndex>,
    model: Arc<dyn LanguageModel>,
    top_k: usize,
    mode: RetrievalMode,
}

impl QueryEngine {
    /// Build the engine and decide the retrieval mode from the index size
    pub async fn new(index: Arc<VectorIndex>, model: Arc<dyn LanguageModel>, top_k: usize) -> Self {
        let mode = match index.stats().await {
            Ok(stats) if stats.count > 0 => {
                tracing::info!(
                    documents = stats.count,
                    collection = %stats.collection,
                    "Retrieval enabled"
                );
                RetrievalMode::Enabled
            }
            Ok(_) => {
                tracing::warn!("No documents in the index, answering with the model only");
                RetrievalMode::Disabled
            }
            Err(e) => {
                tracing::warn!(error = %e, "Could not read index stats, answering with the model only");
                RetrievalMode::Disabled
            }
        };

        Self {
            index,
            model,
            top_k: top_k.max(1),
            mode,
        }
    }

    pub fn mode(&self) -> RetrievalMode {
        self.mode
    }

    pub fn index(&self) -> &VectorIndex {
        &self.index
    }

    pub fn model_name(&self) -> &str {
        self.model.model_name()
    }

    /// Retrieval-augmented answer, falling back to a model-only answer
    pub async fn query(&self, question: &str) -> ChatAnswer {
        if self.mode == RetrievalMode::Disabled {
            return self.query_direct(question).await;
        }

        let results = match self.index.search(question, self.top_k, None).await {
            Ok(results) if !results.is_empty() => results,
            Ok(_) => {
                tracing::info!("Retrieval returned nothing, falling back to the model only");
                return self.query_direct(question).await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Retrieval failed, falling back to the model only");
                return self.query_direct(question).await;
            }
        };

        let prompt = coaching_prompt(question, &results);
        match self.model.generate(&prompt).await {
            Ok(response) => ChatAnswer {
                response,
                sources: build_citations(&results),
            },
            Err(e) => {
                tracing::warn!(error = %e, "Grounded generation failed, falling back to the model only");
                self.query_direct(question).await
            }
        }
    }

    /// Model-only answer; never carries sources
    pub async fn query_direct(&self, question: &str) -> ChatAnswer {
        match self.model.generate(&direct_prompt(question)).await {
            Ok(response) => ChatAnswer::without_sources(response),
            Err(e) => {
                tracing::error!(error = %e, "Language model failed");
                ChatAnswer::without_sources(FALLBACK_MESSAGE)
            }
        }
    }
}

#[cfg(test)]
mod tests;
