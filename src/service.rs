//! Service façade shared by the HTTP API and the CLI

use crate::error::{RagError, ValidationError};
use crate::rag::{QueryEngine, with_user_context};
use crate::types::{ChatMode, ChatRequest, ChatResponse, HealthResponse};
use std::sync::Arc;

/// Longest accepted question, in characters
pub const MAX_QUERY_CHARS: usize = 2000;

pub struct ChatService {
    engine: Arc<QueryEngine>,
}

impl ChatService {
    pub fn new(engine: Arc<QueryEngine>) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &QueryEngine {
        &self.engine
    }

    /// Report index readiness; never fails
    pub async fn health(&self) -> HealthResponse {
        let (status, document_count) = match self.engine.index().stats().await {
            Ok(stats) if stats.count > 0 => ("ok".to_string(), stats.count),
            Ok(_) => ("no_documents".to_string(), 0),
            Err(e) => {
                tracing::warn!(error = %e, "Health check could not read index stats");
                (format!("error: {}", e), 0)
            }
        };

        HealthResponse {
            status,
            version: env!("CARGO_PKG_VERSION").to_string(),
            document_count,
            model: self.engine.model_name().to_string(),
        }
    }

    /// Validate, route by mode and timestamp a chat request
    pub async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, RagError> {
        validate_chat_request(&request)?;

        let question = with_user_context(&request.query, request.context.as_deref());
        tracing::info!(
            user_id = %request.user_id,
            mode = ?request.mode,
            query_chars = request.query.chars().count(),
            "Chat request"
        );

        let answer = match request.mode {
            ChatMode::Coach => self.engine.query(&question).await,
            ChatMode::Direct => self.engine.query_direct(&question).await,
        };

        Ok(ChatResponse {
            response: answer.response,
            sources: answer.sources,
            timestamp: chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        })
    }
}

/// Check query length and user id before any model work happens
pub fn validate_chat_request(request: &ChatRequest) -> Result<(), ValidationError> {
    if request.query.trim().is_empty() {
        return Err(ValidationError::Empty("query".to_string()));
    }

    let query_chars = request.query.chars().count();
    if query_chars > MAX_QUERY_CHARS {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: MAX_QUERY_CHARS,
            actual: query_chars,
        });
    }

    if request.user_id.trim().is_empty() {
        return Err(ValidationError::Empty("user_id".to_string()));
    }

    Ok(())
}
