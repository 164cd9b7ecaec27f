use std::env;

use anyhow::Context as _;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::answer::LanguageModel;
use crate::embeddings::{Embedder, Embedding};
use crate::error::{RagError, Result};

/// Output dimension of the text-embedding-004 model.
const EMBEDDING_DIMENSION: usize = 768;

const DEFAULT_EMBEDDINGS_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/text-embedding-004:embedContent";
const DEFAULT_GENERATE_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent";

/// Configuration for the Gemini API
#[derive(Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub embeddings_url: String,
    pub generate_url: String,
}

impl GeminiConfig {
    /// Create a new configuration from environment variables.
    ///
    /// Only the API key is required; the endpoint URLs default to the public
    /// text-embedding-004 and gemini-2.0-flash endpoints.
    pub fn from_env() -> anyhow::Result<Self> {
        let api_key = env::var("GEMINI_API_KEY").context("GEMINI_API_KEY is not set")?;
        let embeddings_url = env::var("GEMINI_EMBEDDINGS_URL")
            .unwrap_or_else(|_| DEFAULT_EMBEDDINGS_URL.to_string());
        let generate_url =
            env::var("GEMINI_GENERATE_URL").unwrap_or_else(|_| DEFAULT_GENERATE_URL.to_string());

        Ok(GeminiConfig {
            api_key,
            embeddings_url,
            generate_url,
        })
    }
}

/// Client for interacting with the Gemini API.
///
/// One client serves both provider roles: it embeds text batches and
/// generates answers, each failure surfacing under its own error kind.
#[derive(Clone)]
pub struct GeminiClient {
    config: GeminiConfig,
    client: reqwest::Client,
}

impl GeminiClient {
    /// Create a new Gemini client
    pub fn new(config: GeminiConfig) -> Self {
        let client = reqwest::Client::new();
        GeminiClient { config, client }
    }

    /// Request an embedding for a single text
    async fn embed_one(&self, text: &str) -> Result<Embedding> {
        let request = EmbedRequest {
            model: "models/text-embedding-004",
            content: EmbedContent {
                parts: vec![Part { text }],
            },
        };

        let url = format!("{}?key={}", self.config.embeddings_url, self.config.api_key);

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| RagError::EmbeddingService(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(RagError::EmbeddingService(format!(
                "API request failed: {} {}",
                status, error_text
            )));
        }

        let response_data: EmbedResponse = response
            .json()
            .await
            .map_err(|e| RagError::EmbeddingService(e.to_string()))?;

        Ok(Embedding {
            values: response_data.embedding.values,
        })
    }

    /// Generate text for a prompt with the given sampling temperature
    async fn generate_text(&self, prompt: &str, temperature: f32) -> Result<String> {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
                role: "user",
            }],
            generation_config: GenerationConfig {
                temperature,
                top_p: 0.8,
                top_k: 40,
                max_output_tokens: 1024,
            },
        };

        let url = format!("{}?key={}", self.config.generate_url, self.config.api_key);

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| RagError::ModelService(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(RagError::ModelService(format!(
                "API request failed: {} {}",
                status, error_text
            )));
        }

        let response_data: GenerateResponse = response
            .json()
            .await
            .map_err(|e| RagError::ModelService(e.to_string()))?;

        response_data
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| RagError::ModelService("no response generated".to_string()))
    }
}

#[async_trait]
impl Embedder for GeminiClient {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Embedding>> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for text in texts {
            embeddings.push(self.embed_one(text).await?);
        }
        Ok(embeddings)
    }

    fn dimension(&self) -> usize {
        EMBEDDING_DIMENSION
    }
}

#[async_trait]
impl LanguageModel for GeminiClient {
    async fn generate(&self, prompt: &str, temperature: f32) -> Result<String> {
        self.generate_text(prompt, temperature).await
    }
}

// Request/response structures for the Gemini API

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'static str,
    content: EmbedContent<'a>,
}

#[derive(Serialize)]
struct EmbedContent<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Deserialize, Debug)]
struct EmbedResponse {
    embedding: EmbeddingData,
}

#[derive(Deserialize, Debug)]
struct EmbeddingData {
    values: Vec<f32>,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
    role: &'static str,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    top_k: i32,
    max_output_tokens: i32,
}

#[derive(Deserialize, Debug)]
struct GenerateResponse {
    candidates: Vec<Candidate>,
}

#[derive(Deserialize, Debug)]
struct Candidate {
    content: ResponseContent,
}

#[derive(Deserialize, Debug)]
struct ResponseContent {
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize, Debug)]
struct ResponsePart {
    text: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(server_uri: &str) -> GeminiConfig {
        GeminiConfig {
            api_key: "test-key".to_string(),
            embeddings_url: format!("{}/embed", server_uri),
            generate_url: format!("{}/generate", server_uri),
        }
    }

    #[tokio::test]
    async fn embed_maps_server_failure_to_embedding_service_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = GeminiClient::new(test_config(&server.uri()));
        let err = client.embed(&["hello".to_string()]).await.unwrap_err();
        assert!(matches!(err, RagError::EmbeddingService(_)));
    }

    #[tokio::test]
    async fn embed_returns_one_vector_per_text_in_order() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "embedding": { "values": [0.1, 0.2, 0.3] }
            })))
            .mount(&server)
            .await;

        let client = GeminiClient::new(test_config(&server.uri()));
        let embeddings = client
            .embed(&["a".to_string(), "b".to_string()])
            .await
            .unwrap();
        assert_eq!(embeddings.len(), 2);
        assert_eq!(embeddings[0].values, vec![0.1, 0.2, 0.3]);
    }

    #[tokio::test]
    async fn generate_maps_server_failure_to_model_service_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = GeminiClient::new(test_config(&server.uri()));
        let err = client.generate("prompt", 0.3).await.unwrap_err();
        assert!(matches!(err, RagError::ModelService(_)));
    }

    #[tokio::test]
    async fn generate_extracts_the_first_candidate_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [
                    { "content": { "parts": [{ "text": "Paris." }] } }
                ]
            })))
            .mount(&server)
            .await;

        let client = GeminiClient::new(test_config(&server.uri()));
        let answer = client.generate("capital?", 0.3).await.unwrap();
        assert_eq!(answer, "Paris.");
    }

    #[tokio::test]
    async fn generate_with_no_candidates_is_a_model_service_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "candidates": [] })),
            )
            .mount(&server)
            .await;

        let client = GeminiClient::new(test_config(&server.uri()));
        let err = client.generate("prompt", 0.3).await.unwrap_err();
        assert!(matches!(err, RagError::ModelService(_)));
    }
}
