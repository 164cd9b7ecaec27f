use std::env;
use std::io::{self, Write};
use std::path::PathBuf;

use log::{info, warn};

use crate::answer::{self, LanguageModel};
use crate::chunking::{self, DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE};
use crate::embeddings::Embedder;
use crate::error::Result;
use crate::index::VectorIndex;
use crate::retrieval::{self, DEFAULT_TOP_K};
use crate::session::SessionId;

/// Operating configuration for the pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Location of the persisted index on disk
    pub index_path: PathBuf,
    /// Target chunk length in characters
    pub chunk_size: usize,
    /// Characters shared between consecutive chunks
    pub chunk_overlap: usize,
    /// Number of chunks retrieved per question
    pub top_k: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            index_path: PathBuf::from("rag_index.json"),
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
            top_k: DEFAULT_TOP_K,
        }
    }
}

impl PipelineConfig {
    /// Create a configuration from environment variables, falling back to
    /// the defaults for anything unset.
    pub fn from_env() -> Self {
        let mut config = PipelineConfig::default();
        if let Ok(path) = env::var("INDEX_PATH") {
            config.index_path = PathBuf::from(path);
        }
        if let Some(size) = read_env_usize("CHUNK_SIZE") {
            config.chunk_size = size;
        }
        if let Some(overlap) = read_env_usize("CHUNK_OVERLAP") {
            config.chunk_overlap = overlap;
        }
        if let Some(top_k) = read_env_usize("TOP_K") {
            config.top_k = top_k;
        }
        config
    }
}

fn read_env_usize(name: &str) -> Option<usize> {
    let value = env::var(name).ok()?;
    match value.parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            warn!("Ignoring non-numeric {}: {}", name, value);
            None
        }
    }
}

/// Outcome of an ingestion run.
#[derive(Debug, Clone)]
pub struct IngestSummary {
    pub chunk_count: usize,
    pub index_path: PathBuf,
}

/// Outcome of answering a question: the model's answer and the joined
/// context it was grounded on.
#[derive(Debug, Clone)]
pub struct Answered {
    pub answer: String,
    pub context: String,
}

/// End-to-end retrieval-augmented question-answering pipeline.
///
/// Ingestion and querying are decoupled through the persisted index: each
/// question loads the index fresh from disk, so nothing is held in process
/// memory between the two request types.
pub struct RagPipeline<E, L> {
    embedder: E,
    model: L,
    config: PipelineConfig,
}

impl<E: Embedder, L: LanguageModel> RagPipeline<E, L> {
    /// Create a new pipeline over the given providers.
    pub fn new(embedder: E, model: L, config: PipelineConfig) -> Self {
        RagPipeline {
            embedder,
            model,
            config,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Ingest a batch of document texts: concatenate, chunk, embed, and
    /// persist a fresh index, replacing any previous one at the configured
    /// location.
    pub async fn ingest(&self, documents: &[String]) -> Result<IngestSummary> {
        let corpus: String = documents.concat();
        let chunks = chunking::chunk(&corpus, self.config.chunk_size, self.config.chunk_overlap)?;
        info!("Split corpus into {} chunks", chunks.len());

        let index = VectorIndex::build(&chunks, &self.embedder).await?;
        index.persist(&self.config.index_path)?;

        Ok(IngestSummary {
            chunk_count: chunks.len(),
            index_path: self.config.index_path.clone(),
        })
    }

    /// Answer a question from the persisted index.
    pub async fn ask(&self, question: &str) -> Result<Answered> {
        let retrieved = retrieval::retrieve(
            question,
            &self.config.index_path,
            &self.embedder,
            self.config.top_k,
        )
        .await?;

        let texts: Vec<String> = retrieved.into_iter().map(|chunk| chunk.text).collect();
        let context = answer::join_context(&texts);
        let answer = answer::answer(&self.model, question, &texts).await?;

        Ok(Answered { answer, context })
    }

    /// Interactive question loop over the persisted index.
    pub async fn run_query_loop(&self, session: &SessionId) -> Result<()> {
        println!(
            "Session {}. Ask questions about the ingested documents. Type 'exit' to quit.",
            session
        );

        let stdin = io::stdin();
        let mut stdout = io::stdout();
        let mut buffer = String::new();

        loop {
            print!("\nYour question: ");
            stdout.flush()?;

            buffer.clear();
            stdin.read_line(&mut buffer)?;

            let question = buffer.trim();
            if question.is_empty() {
                continue;
            }
            if question.eq_ignore_ascii_case("exit") {
                println!("Goodbye!");
                break;
            }

            let answered = self.ask(question).await?;
            println!("\n{}", answered.answer);
        }

        Ok(())
    }
}
