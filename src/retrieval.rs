use std::path::Path;

use log::debug;

use crate::embeddings::Embedder;
use crate::error::{RagError, Result};
use crate::index::{ScoredChunk, VectorIndex};

/// Default number of chunks retrieved per question.
pub const DEFAULT_TOP_K: usize = 4;

/// Retrieve the chunks most relevant to a question from a persisted index.
///
/// The index is loaded fresh on every call; nothing is cached between
/// queries. A missing index propagates as `RagError::IndexNotFound` (asking
/// before ingesting is a user error, distinct from an empty result). An
/// existing but small index yields fewer than `k` results without error.
pub async fn retrieve<E: Embedder + ?Sized>(
    question: &str,
    index_location: &Path,
    embedder: &E,
    k: usize,
) -> Result<Vec<ScoredChunk>> {
    let index = VectorIndex::load(index_location, embedder)?;

    let query_vectors = embedder.embed(&[question.to_string()]).await?;
    let query = query_vectors
        .into_iter()
        .next()
        .ok_or_else(|| RagError::EmbeddingService("no vector returned for the question".to_string()))?;

    let results = index.search(&query.values, k)?;
    for chunk in &results {
        debug!("Retrieved chunk at distance {:.4}: {:.60}", chunk.distance, chunk.text);
    }
    Ok(results)
}
