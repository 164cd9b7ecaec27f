use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by the question-answering pipeline.
///
/// Every variant keeps its kind all the way to the caller; the pipeline
/// never swallows a collaborator failure into a default value and never
/// retries internally.
#[derive(Error, Debug)]
pub enum RagError {
    #[error("Invalid chunking configuration: {0}")]
    Chunking(String),

    #[error("Embedding service failure: {0}")]
    EmbeddingService(String),

    #[error("Cannot build an index over an empty corpus")]
    EmptyCorpus,

    #[error("No index has been persisted at {}: ingest documents first", .0.display())]
    IndexNotFound(PathBuf),

    #[error("Persisted index is corrupt: {0}")]
    IndexCorrupt(String),

    #[error("Language model failure: {0}")]
    ModelService(String),

    #[error("Index I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Index serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RagError>;
