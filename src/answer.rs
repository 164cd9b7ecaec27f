use async_trait::async_trait;
use log::debug;

use crate::error::Result;

/// Sampling temperature for answer generation. Low, so the model favors
/// context-faithful phrasing over creative variation.
pub const ANSWER_TEMPERATURE: f32 = 0.3;

/// Capability interface for the answer-generating language model.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Generate a text completion for a single prompt.
    async fn generate(&self, prompt: &str, temperature: f32) -> Result<String>;
}

/// Join retrieved chunk texts, in retrieval order, into the grounding
/// context string handed to the model.
pub fn join_context(retrieved: &[String]) -> String {
    retrieved.join(" ")
}

/// Fill the fixed answering template with context and question.
///
/// The template instructs the model to answer strictly from the supplied
/// context and to format the answer for rendering in a document-display
/// surface.
pub fn build_prompt(context: &str, question: &str) -> String {
    format!(
        "Answer the question based only on the following context and provide response with proper formatting to be displayed in a webpage:\n\n{}\n\n---\n\nAnswer the question based on the above context: {}",
        context, question
    )
}

/// Answer a question from retrieved context.
///
/// The model's raw text response is returned unmodified; no post-validation
/// checks that the answer is actually grounded in the context. An empty
/// `retrieved` slice still reaches the model with an empty context string;
/// short-circuiting on empty retrieval is a caller policy, not applied here.
pub async fn answer<L: LanguageModel + ?Sized>(
    model: &L,
    question: &str,
    retrieved: &[String],
) -> Result<String> {
    let context = join_context(retrieved);
    let prompt = build_prompt(&context, question);
    debug!(
        "Answering from {} retrieved chunks ({} context characters)",
        retrieved.len(),
        context.chars().count()
    );
    model.generate(&prompt, ANSWER_TEMPERATURE).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    struct RecordingModel {
        prompts: Arc<Mutex<Vec<String>>>,
        temperatures: Arc<Mutex<Vec<f32>>>,
    }

    #[async_trait]
    impl LanguageModel for RecordingModel {
        async fn generate(&self, prompt: &str, temperature: f32) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.temperatures.lock().unwrap().push(temperature);
            Ok("canned answer".to_string())
        }
    }

    fn recording_model() -> (RecordingModel, Arc<Mutex<Vec<String>>>, Arc<Mutex<Vec<f32>>>) {
        let prompts = Arc::new(Mutex::new(Vec::new()));
        let temperatures = Arc::new(Mutex::new(Vec::new()));
        (
            RecordingModel {
                prompts: prompts.clone(),
                temperatures: temperatures.clone(),
            },
            prompts,
            temperatures,
        )
    }

    #[test]
    fn context_is_space_joined_in_retrieval_order() {
        let retrieved = vec!["first".to_string(), "second".to_string(), "third".to_string()];
        assert_eq!(join_context(&retrieved), "first second third");
    }

    #[test]
    fn prompt_embeds_context_and_question() {
        let prompt = build_prompt("some grounding text", "What is grounding?");
        assert!(prompt.contains("based only on the following context"));
        assert!(prompt.contains("some grounding text"));
        assert!(prompt.ends_with("Answer the question based on the above context: What is grounding?"));
    }

    #[tokio::test]
    async fn answer_uses_the_fixed_temperature() {
        let (model, _prompts, temperatures) = recording_model();
        let retrieved = vec!["context".to_string()];

        let text = answer(&model, "question?", &retrieved).await.unwrap();
        assert_eq!(text, "canned answer");
        assert_eq!(*temperatures.lock().unwrap(), vec![ANSWER_TEMPERATURE]);
    }

    #[tokio::test]
    async fn empty_retrieval_still_invokes_the_model() {
        let (model, prompts, _temperatures) = recording_model();

        answer(&model, "anything?", &[]).await.unwrap();

        let prompts = prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        // Empty context, question still present
        assert!(prompts[0].contains("webpage:\n\n\n\n---"));
        assert!(prompts[0].contains("anything?"));
    }
}
