use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gymrat_rag::config::Config;
use gymrat_rag::indexer::PdfProcessor;
use gymrat_rag::ingest::ingest_directory;
use gymrat_rag::llm::GeminiClient;
use gymrat_rag::paths::PlatformPaths;
use gymrat_rag::rag::QueryEngine;
use gymrat_rag::service::ChatService;
use gymrat_rag::vector_db::{LanceVectorDB, VectorDatabase};
use gymrat_rag::vector_index::VectorIndex;
use std::path::PathBuf;
use std::sync::Arc;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GIT_COMMIT_HASH"),
    ", built ",
    env!("BUILD_TIMESTAMP"),
    ")"
);

#[derive(Parser)]
#[command(
    name = "gymrat-rag",
    about = "Fitness coaching chat backend grounded in a PDF knowledge base",
    version,
    long_version = LONG_VERSION
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the HTTP chat API
    Serve {
        /// Listen port (overrides config and GYMRAT_PORT)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Extract, chunk and embed every PDF in a directory
    Ingest {
        /// Directory of PDFs (defaults to the platform data directory)
        dir: Option<PathBuf>,
        /// Category for every file; detected from the file name when omitted
        #[arg(long)]
        category: Option<String>,
        /// Empty the collection before ingesting
        #[arg(long)]
        clear: bool,
    },

    /// Show collection size and per-category breakdown
    Stats,

    /// Delete every entry in the collection
    Clear,

    /// Write a default config file to the platform config directory
    InitConfig {
        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Must not depend on the existing config file parsing
    if let Command::InitConfig { force } = cli.command {
        gymrat_rag::logging::init_tracing();
        let path = PlatformPaths::default_config_path();
        Config::init_file(&path, force)?;
        println!("Wrote default configuration to {}", path.display());
        return Ok(());
    }

    // Config::new loads `.env`, which may set RUST_LOG
    let mut config = Config::new().context("Failed to load configuration")?;
    gymrat_rag::logging::init_tracing();

    match cli.command {
        Command::Serve { port } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            serve(config).await
        }
        Command::Ingest {
            dir,
            category,
            clear,
        } => ingest(config, dir, category, clear).await,
        Command::Stats => stats(config).await,
        Command::Clear => {
            open_database(&config).await?.clear().await?;
            println!("Cleared collection '{}'", config.vector_db.collection_name);
            Ok(())
        }
        Command::InitConfig { .. } => Ok(()),
    }
}

async fn serve(config: Config) -> Result<()> {
    // Fail before loading the embedding model if the key is missing
    let model = Arc::new(GeminiClient::from_config(&config.llm)?);
    let index = Arc::new(VectorIndex::open(&config).await?);

    let engine = QueryEngine::new(index, model, config.retrieval.top_k).await;
    tracing::info!(mode = ?engine.mode(), model = engine.model_name(), "Query engine ready");

    let service = Arc::new(ChatService::new(Arc::new(engine)));
    gymrat_rag::api::serve(service, &config.server).await
}

async fn ingest(
    config: Config,
    dir: Option<PathBuf>,
    category: Option<String>,
    clear: bool,
) -> Result<()> {
    let directory = dir.unwrap_or_else(PlatformPaths::default_pdf_dir);
    let index = VectorIndex::open(&config).await?;
    if clear {
        index.clear().await?;
        index.initialize().await?;
    }

    let processor = PdfProcessor::from_config(&config.chunking);
    let report = ingest_directory(&processor, &index, &directory, category.as_deref()).await?;

    println!("Ingested {}", directory.display());
    println!("  files processed: {}", report.files_processed);
    println!("  files failed:    {}", report.files_failed);
    println!("  chunks created:  {}", report.chunks_created);
    println!("  chunks added:    {}", report.chunks_added);
    println!("  duration:        {} ms", report.duration_ms);
    for error in &report.errors {
        println!("  error: {}", error);
    }
    Ok(())
}

/// The collection alone, without loading the embedding model
async fn open_database(config: &Config) -> Result<LanceVectorDB> {
    LanceVectorDB::with_path(
        &config.vector_db.path.to_string_lossy(),
        &config.vector_db.collection_name,
    )
    .await
}

async fn stats(config: Config) -> Result<()> {
    let database = open_database(&config).await?;
    let statistics = database.get_statistics().await?;

    println!("Collection:      {}", database.collection_name());
    println!("Embedding model: {}", config.embedding.model_name);
    println!("Chunks:          {}", statistics.total_chunks);
    println!("Documents:       {}", statistics.total_documents);
    for category in &statistics.category_breakdown {
        println!(
            "  {:<12} {:>4} documents {:>6} chunks",
            category.category, category.document_count, category.chunk_count
        );
    }
    Ok(())
}
