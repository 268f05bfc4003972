//! Hosted language model access
//!
//! The query engine only needs `generate(prompt) -> text`; [`GeminiClient`]
//! provides it over the Gemini REST API.

mod gemini;

pub use gemini::GeminiClient;

use crate::error::LlmError;
use async_trait::async_trait;

/// A text-in, text-out language model
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Generate a completion for a single prompt
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;

    /// Identifier of the underlying model, reported by the health check
    fn model_name(&self) -> &str;
}
