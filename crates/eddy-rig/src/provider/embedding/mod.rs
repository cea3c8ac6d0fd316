//! Embedding provider.

mod model;
mod provider;

pub use self::model::{CohereEmbeddingModel, EmbeddingModel, OpenAiEmbeddingModel};
pub use self::provider::EmbeddingProvider;
