use super::LanguageModel;
use crate::config::LlmConfig;
use crate::error::{ConfigError, LlmError, RagError};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

/// Gemini `generateContent` client
pub struct GeminiClient {
    http: Client,
    api_key: String,
    model: String,
    base_url: String,
    temperature: f32,
    max_output_tokens: u32,
    timeout_secs: u64,
}

impl GeminiClient {
    /// Build a client from configuration; a missing API key is a configuration error
    pub fn from_config(config: &LlmConfig) -> Result<Self, RagError> {
        let api_key = config.require_api_key()?.to_string();

        let http = Client::builder()
            .user_agent(concat!("gymrat-rag/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                ConfigError::InvalidValue {
                    key: "llm".to_string(),
                    reason: format!("failed to construct HTTP client: {}", e),
                }
            })?;

        tracing::info!("Using Gemini model: {}", config.model_name);

        Ok(Self {
            http,
            api_key,
            model: config.model_name.clone(),
            base_url: config.base_url.clone(),
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
            timeout_secs: config.timeout_secs,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate
    fn into_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().filter_map(|part| part.text).collect();
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }
}

#[async_trait]
impl LanguageModel for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let payload = json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": prompt }]
            }],
            "generationConfig": {
                "temperature": self.temperature,
                "maxOutputTokens": self.max_output_tokens,
            }
        });

        tracing::debug!(model = %self.model, prompt_chars = prompt.len(), "Calling Gemini");

        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|error| {
                if error.is_timeout() {
                    LlmError::Timeout(self.timeout_secs)
                } else {
                    LlmError::Unavailable(format!("failed to reach Gemini: {error}"))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body: GenerateContentResponse = response.json().await.map_err(|error| {
            LlmError::InvalidResponse(format!("failed to decode Gemini response: {error}"))
        })?;

        body.into_text().ok_or(LlmError::EmptyResponse)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
