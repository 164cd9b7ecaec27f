use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use docqa::answer::LanguageModel;
use docqa::embeddings::{Embedder, Embedding};
use docqa::error::Result;

pub const DIMENSION: usize = 256;

/// Deterministic embedder hashing word tokens into a fixed number of
/// buckets. Texts sharing words land near each other under cosine
/// distance, which is enough to exercise retrieval ranking without a live
/// embedding service.
pub struct TokenHashEmbedder;

#[async_trait]
impl Embedder for TokenHashEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Embedding>> {
        Ok(texts
            .iter()
            .map(|text| Embedding {
                values: token_hash(text),
            })
            .collect())
    }

    fn dimension(&self) -> usize {
        DIMENSION
    }
}

fn token_hash(text: &str) -> Vec<f32> {
    let mut values = vec![0.0f32; DIMENSION];
    for token in text.to_lowercase().split(|c: char| !c.is_alphanumeric()) {
        if token.is_empty() {
            continue;
        }
        let bucket = token
            .bytes()
            .fold(0usize, |acc, b| (acc * 31 + b as usize) % DIMENSION);
        values[bucket] += 1.0;
    }
    let norm = values.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > 0.0 {
        for v in &mut values {
            *v /= norm;
        }
    }
    values
}

/// Language model double returning a canned answer and recording every
/// prompt it sees. Clones share the prompt log.
#[derive(Clone)]
pub struct CannedModel {
    reply: String,
    pub prompts: Arc<Mutex<Vec<String>>>,
}

impl CannedModel {
    pub fn new(reply: &str) -> Self {
        CannedModel {
            reply: reply.to_string(),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl LanguageModel for CannedModel {
    async fn generate(&self, prompt: &str, _temperature: f32) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.reply.clone())
    }
}
