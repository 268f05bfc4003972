//! # GymRat RAG - Retrieval-Augmented Fitness Coaching
//!
//! Backend for a fitness coaching chat: fitness PDFs are extracted, cleaned,
//! chunked and embedded into a local LanceDB collection; questions are answered
//! by Gemini grounded in the most similar chunks, with page-level citations.
//!
//! ## Architecture
//!
//! ```text
//!  PDFs ──► indexer ──► vector_index ──► LanceDB
//!                           ▲
//!  HTTP/CLI ──► service ──► rag::QueryEngine ──► llm (Gemini)
//! ```
//!
//! When the index is empty or retrieval fails the engine answers with the
//! model alone; when the model fails it answers with a fixed apology.
//!
//! ## Modules
//!
//! - [`indexer`]: PDF extraction, text cleaning, chunking and categories
//! - [`embedding`]: Embedding generation using FastEmbed
//! - [`vector_db`]: Vector database abstraction and the LanceDB backend
//! - [`vector_index`]: Embedding plus storage behind one handle
//! - [`llm`]: Language model trait and the Gemini client
//! - [`rag`]: Prompting, citations and the fallback policy
//! - [`service`]: Health and chat operations shared by the API and the CLI
//! - [`api`]: axum router
//! - [`config`]: Configuration with environment variable overrides
//!
//! ## Usage Example
//!
//! ```no_run
//! use gymrat_rag::config::Config;
//! use gymrat_rag::llm::GeminiClient;
//! use gymrat_rag::rag::QueryEngine;
//! use gymrat_rag::vector_index::VectorIndex;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::new()?;
//!     let index = Arc::new(VectorIndex::open(&config).await?);
//!     let model = Arc::new(GeminiClient::from_config(&config.llm)?);
//!     let engine = QueryEngine::new(index, model, config.retrieval.top_k).await;
//!
//!     let answer = engine.query("How many sets per week for hypertrophy?").await;
//!     println!("{}", answer.response);
//!     Ok(())
//! }
//! ```

/// HTTP API (health and chat)
pub mod api;

/// Configuration management with environment variable overrides
pub mod config;

/// Embedding generation using FastEmbed
pub mod embedding;

/// Error types and utilities
pub mod error;

/// PDF extraction, cleaning, chunking and category detection
pub mod indexer;

/// Directory ingestion pipeline
pub mod ingest;

/// Language model abstraction and Gemini client
pub mod llm;

/// Tracing subscriber setup
pub mod logging;

/// Platform-specific default paths
pub mod paths;

/// Retrieval-augmented query engine
pub mod rag;

/// Service façade used by the HTTP API and the CLI
pub mod service;

/// Shared data types
pub mod types;

/// Vector database abstraction
pub mod vector_db;

/// Embedding model and vector database behind one handle
pub mod vector_index;
