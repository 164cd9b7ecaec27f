pub mod answer;
pub mod chunking;
pub mod document;
pub mod embeddings;
pub mod error;
pub mod gemini;
pub mod index;
pub mod pipeline;
pub mod retrieval;
pub mod session;
