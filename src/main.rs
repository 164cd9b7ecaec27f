use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use log::info;

use docqa::document;
use docqa::gemini::{GeminiClient, GeminiConfig};
use docqa::pipeline::{PipelineConfig, RagPipeline};
use docqa::session::SessionId;

/// Document question answering over a retrieval-augmented Gemini pipeline
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Path of the persisted index
    #[arg(long, global = true)]
    index: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract, chunk, embed, and index a batch of documents (text or PDF)
    Ingest {
        /// Files to ingest
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Target chunk length in characters
        #[arg(long)]
        chunk_size: Option<usize>,

        /// Characters shared between consecutive chunks
        #[arg(long)]
        chunk_overlap: Option<usize>,
    },
    /// Ask a single question against the persisted index
    Ask {
        /// The question to answer
        question: String,

        /// Session identifier to echo back (minted when absent)
        #[arg(long)]
        session: Option<String>,

        /// Number of chunks to retrieve
        #[arg(long)]
        top_k: Option<usize>,
    },
    /// Interactive question loop under a fresh session
    Chat,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize environment
    dotenv().ok();
    env_logger::init();

    let args = Args::parse();

    let mut config = PipelineConfig::from_env();
    if let Some(index) = args.index {
        config.index_path = index;
    }

    let gemini_config = GeminiConfig::from_env().context("Missing GEMINI_API_KEY")?;
    let gemini = GeminiClient::new(gemini_config);

    match args.command {
        Command::Ingest {
            files,
            chunk_size,
            chunk_overlap,
        } => {
            if let Some(size) = chunk_size {
                config.chunk_size = size;
            }
            if let Some(overlap) = chunk_overlap {
                config.chunk_overlap = overlap;
            }
            let pipeline = RagPipeline::new(gemini.clone(), gemini, config);

            let documents =
                document::extract_batch(&files).context("Failed to extract document text")?;
            let summary = pipeline.ingest(&documents).await?;

            println!(
                "Indexed {} chunks at {}",
                summary.chunk_count,
                summary.index_path.display()
            );
        }
        Command::Ask {
            question,
            session,
            top_k,
        } => {
            if let Some(top_k) = top_k {
                config.top_k = top_k;
            }
            let pipeline = RagPipeline::new(gemini.clone(), gemini, config);
            let session = session.map(SessionId::from_string).unwrap_or_default();

            let answered = pipeline.ask(&question).await?;
            info!(
                "Session {} answered from {} context characters",
                session,
                answered.context.chars().count()
            );

            println!("{}", answered.answer);
            println!("\nSession: {}", session);
        }
        Command::Chat => {
            let pipeline = RagPipeline::new(gemini.clone(), gemini, config);
            let session = SessionId::new();
            pipeline.run_query_loop(&session).await?;
        }
    }

    Ok(())
}
