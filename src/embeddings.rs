use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Representation of a vector embedding
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Embedding {
    pub values: Vec<f32>,
}

/// Capability interface for embedding providers.
///
/// A provider returns one vector per input text, in input order, and must
/// fail with `RagError::EmbeddingService` on transport or quota failure
/// rather than substituting placeholder vectors.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a batch of texts, one vector per text, same order.
    async fn embed(&self, texts: &[String]) -> Result<Vec<Embedding>>;

    /// Fixed output dimension of this provider's vectors.
    fn dimension(&self) -> usize;
}
