use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::embeddings::Embedder;
use crate::error::{RagError, Result};

const FORMAT_VERSION: u32 = 1;
const METRIC: &str = "cosine";

/// A retrieved chunk with its distance from the query (lower is closer).
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredChunk {
    pub text: String,
    pub distance: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct IndexEntry {
    text: String,
    vector: Vec<f32>,
}

/// On-disk snapshot format. Self-describing so that `load` can reject a
/// version, metric, or dimension mismatch instead of returning wrong
/// results.
#[derive(Serialize, Deserialize)]
struct IndexSnapshot {
    format_version: u32,
    metric: String,
    dimension: usize,
    entries: Vec<IndexEntry>,
}

/// In-memory vector index over chunk embeddings.
///
/// Entries keep their build-time order. Searches score every entry by
/// cosine distance (1 - cosine similarity) and return the closest first.
#[derive(Debug)]
pub struct VectorIndex {
    dimension: usize,
    entries: Vec<IndexEntry>,
}

impl VectorIndex {
    /// Embed a batch of chunks and build a searchable index over them.
    ///
    /// Each entry retains its source chunk text. An empty batch is rejected:
    /// an index over zero vectors would answer nothing and hide the real
    /// problem from the caller.
    pub async fn build<E: Embedder + ?Sized>(chunks: &[String], embedder: &E) -> Result<Self> {
        if chunks.is_empty() {
            return Err(RagError::EmptyCorpus);
        }

        let embeddings = embedder.embed(chunks).await?;
        if embeddings.len() != chunks.len() {
            return Err(RagError::EmbeddingService(format!(
                "expected {} vectors, got {}",
                chunks.len(),
                embeddings.len()
            )));
        }

        let dimension = embedder.dimension();
        let mut entries = Vec::with_capacity(chunks.len());
        for (text, embedding) in chunks.iter().zip(embeddings) {
            if embedding.values.len() != dimension {
                return Err(RagError::EmbeddingService(format!(
                    "embedding of dimension {} from a provider reporting {}",
                    embedding.values.len(),
                    dimension
                )));
            }
            entries.push(IndexEntry {
                text: text.clone(),
                vector: embedding.values,
            });
        }

        info!("Built index over {} chunks", entries.len());
        Ok(VectorIndex { dimension, entries })
    }

    /// Number of entries in the index.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Vector dimension of every entry.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Serialize the index to `location`, replacing any prior content.
    ///
    /// The snapshot is written to a temporary file in the destination
    /// directory and renamed into place, so a concurrent reader sees either
    /// the old or the new index, never a torn one.
    pub fn persist(&self, location: &Path) -> Result<()> {
        if let Some(parent) = location.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let snapshot = IndexSnapshot {
            format_version: FORMAT_VERSION,
            metric: METRIC.to_string(),
            dimension: self.dimension,
            entries: self.entries.clone(),
        };
        let bytes = serde_json::to_vec(&snapshot)?;

        let mut tmp = location.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, location)?;

        debug!(
            "Persisted {} entries to {}",
            self.entries.len(),
            location.display()
        );
        Ok(())
    }

    /// Load a previously persisted index.
    ///
    /// The embedder is consulted only to validate dimensional compatibility;
    /// no embeddings are recomputed.
    pub fn load<E: Embedder + ?Sized>(location: &Path, embedder: &E) -> Result<Self> {
        let bytes = match fs::read(location) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(RagError::IndexNotFound(location.to_path_buf()));
            }
            Err(e) => return Err(RagError::Io(e)),
        };

        let snapshot: IndexSnapshot = serde_json::from_slice(&bytes)
            .map_err(|e| RagError::IndexCorrupt(format!("unreadable snapshot: {}", e)))?;

        if snapshot.format_version != FORMAT_VERSION {
            return Err(RagError::IndexCorrupt(format!(
                "unsupported format version {}",
                snapshot.format_version
            )));
        }
        if snapshot.metric != METRIC {
            return Err(RagError::IndexCorrupt(format!(
                "unsupported distance metric {:?}",
                snapshot.metric
            )));
        }
        if snapshot.dimension != embedder.dimension() {
            return Err(RagError::IndexCorrupt(format!(
                "index dimension {} does not match embedder dimension {}",
                snapshot.dimension,
                embedder.dimension()
            )));
        }
        if let Some(entry) = snapshot
            .entries
            .iter()
            .find(|entry| entry.vector.len() != snapshot.dimension)
        {
            return Err(RagError::IndexCorrupt(format!(
                "entry vector of length {} in an index of dimension {}",
                entry.vector.len(),
                snapshot.dimension
            )));
        }

        debug!(
            "Loaded {} entries from {}",
            snapshot.entries.len(),
            location.display()
        );
        Ok(VectorIndex {
            dimension: snapshot.dimension,
            entries: snapshot.entries,
        })
    }

    /// Return up to `k` entries nearest to `query`, ascending by distance.
    ///
    /// Equal distances keep insertion order. Fewer than `k` results come
    /// back when the index holds fewer entries; nothing is padded.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<ScoredChunk>> {
        if query.len() != self.dimension {
            return Err(RagError::IndexCorrupt(format!(
                "query dimension {} does not match index dimension {}",
                query.len(),
                self.dimension
            )));
        }

        let mut scored: Vec<ScoredChunk> = self
            .entries
            .iter()
            .map(|entry| ScoredChunk {
                text: entry.text.clone(),
                distance: cosine_distance(query, &entry.vector),
            })
            .collect();

        // Stable sort keeps insertion order for equal distances
        scored.sort_by(|a, b| a.distance.partial_cmp(&b.distance).unwrap_or(Ordering::Equal));
        scored.truncate(k);
        Ok(scored)
    }
}

/// Cosine distance between two vectors: 1 - cosine similarity, so that the
/// best match has the smallest value.
fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    1.0 - cosine_similarity(a, b)
}

/// Cosine similarity between two vectors of equal length.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0.0;
    let mut norm_a = 0.0;
    let mut norm_b = 0.0;

    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denominator = (norm_a * norm_b).sqrt();
    if denominator == 0.0 {
        return 0.0;
    }
    dot / denominator
}
