//! Text embedding capability.

use std::sync::Arc;

use async_trait::async_trait;

use crate::Result;

/// Type alias for a shared embedder.
pub type BoxedEmbedder = Arc<dyn Embedder>;

/// Turns text into a fixed-dimension vector.
///
/// Query embeddings must come from the same model (and dimension) that was
/// used to embed the indexed documents, otherwise similarity scores are
/// meaningless.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Returns the embedding model identifier.
    fn model_name(&self) -> &str;

    /// Returns the dimension of produced vectors.
    fn dimensions(&self) -> usize;

    /// Embeds a single text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RetrievalService`] on transport or authentication
    /// failure.
    ///
    /// [`Error::RetrievalService`]: crate::Error::RetrievalService
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

#[async_trait]
impl<T: Embedder + ?Sized> Embedder for Arc<T> {
    fn model_name(&self) -> &str {
        (**self).model_name()
    }

    fn dimensions(&self) -> usize {
        (**self).dimensions()
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        (**self).embed(text).await
    }
}
