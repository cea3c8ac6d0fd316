//! Generative model capability and the request it consumes.

use std::sync::Arc;

use async_trait::async_trait;

use crate::{DocumentChunk, Result, TurbulenceModel};

/// Type alias for a shared generative model.
pub type BoxedGenerativeModel = Arc<dyn GenerativeModel>;

/// A fully assembled generation request.
///
/// Produced by the prompt builder; owned by a single pipeline call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    /// Model whose parameters are requested.
    pub model: Arc<TurbulenceModel>,
    /// System-role instruction.
    pub system_prompt: String,
    /// User-role payload.
    pub user_prompt: String,
    /// JSON schema of the expected response.
    pub response_schema: serde_json::Value,
    /// Passages embedded in the user prompt, in prompt order.
    pub context: Vec<DocumentChunk>,
    pub temperature: f64,
    pub max_tokens: u64,
}

impl GenerationRequest {
    /// Returns true if any retrieved passage was placed in the prompt.
    pub fn context_used(&self) -> bool {
        !self.context.is_empty()
    }

    /// Returns the citation label of the passage at `index` (e.g. `S1`).
    pub fn label(index: usize) -> String {
        format!("S{}", index + 1)
    }

    /// Returns the labels of all passages in the prompt.
    pub fn labels(&self) -> Vec<String> {
        (0..self.context.len()).map(Self::label).collect()
    }

    /// Returns the mean relevance of the prompt passages, clamped to `[0, 1]`.
    pub fn mean_relevance(&self) -> f64 {
        if self.context.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.context.iter().map(|c| c.score.clamp(0.0, 1.0)).sum();
        sum / self.context.len() as f64
    }
}

/// A chat-style generative model.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Returns the model identifier.
    fn model_name(&self) -> &str;

    /// Sends the request and returns the raw response text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::GenerationService`] on transport or authentication
    /// failure. Interpreting the text is left to the caller.
    ///
    /// [`Error::GenerationService`]: crate::Error::GenerationService
    async fn generate(&self, request: &GenerationRequest) -> Result<String>;
}

#[async_trait]
impl<T: GenerativeModel + ?Sized> GenerativeModel for Arc<T> {
    fn model_name(&self) -> &str {
        (**self).model_name()
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        (**self).generate(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ModelRegistry;

    fn request(scores: &[f64]) -> GenerationRequest {
        GenerationRequest {
            model: ModelRegistry::global().get("k_epsilon").unwrap(),
            system_prompt: String::new(),
            user_prompt: String::new(),
            response_schema: serde_json::Value::Null,
            context: scores
                .iter()
                .enumerate()
                .map(|(i, &s)| DocumentChunk::new(i.to_string(), "text", "doc.pdf", s))
                .collect(),
            temperature: 0.1,
            max_tokens: 100,
        }
    }

    #[test]
    fn labels_are_one_based() {
        assert_eq!(request(&[0.9, 0.8]).labels(), ["S1", "S2"]);
    }

    #[test]
    fn mean_relevance_is_clamped() {
        assert!((request(&[1.5, 0.5]).mean_relevance() - 0.75).abs() < 1e-9);
        assert_eq!(request(&[]).mean_relevance(), 0.0);
    }
}
