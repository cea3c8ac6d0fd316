//! Mock embedder for testing.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use eddy_core::{Embedder, Error, Result};

/// Mock embedder for testing.
///
/// Produces a deterministic vector derived from the text bytes.
#[derive(Debug, Clone)]
pub struct MockEmbedder {
    dimensions: usize,
    failure: Option<String>,
    calls: Arc<AtomicUsize>,
}

impl MockEmbedder {
    /// Creates a mock embedder producing vectors of `dimensions` entries.
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            failure: None,
            calls: Arc::default(),
        }
    }

    /// Makes every call fail with a retrieval service error.
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    /// Returns the number of `embed` calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Embedder for MockEmbedder {
    fn model_name(&self) -> &str {
        "mock-embedding"
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.failure {
            return Err(Error::retrieval_service(message));
        }

        let mut vector = vec![0.0_f32; self.dimensions];
        if self.dimensions == 0 {
            return Ok(vector);
        }
        for (i, byte) in text.bytes().enumerate() {
            vector[i % self.dimensions] += f32::from(byte) / 255.0;
        }
        Ok(vector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn embeddings_are_deterministic() {
        let embedder = MockEmbedder::new(4);
        let a = embedder.embed("pipe flow").await.unwrap();
        let b = embedder.embed("pipe flow").await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 4);
        assert_eq!(embedder.calls(), 2);
    }

    #[tokio::test]
    async fn failing_embedder_counts_calls() {
        let embedder = MockEmbedder::new(4).failing("unauthorized");
        assert!(embedder.embed("x").await.is_err());
        assert_eq!(embedder.calls(), 1);
    }
}
