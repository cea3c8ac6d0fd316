//! rig-backed implementations of the generation and embedding capabilities.

mod completion;
mod credentials;
mod embedding;

pub use self::completion::{AnthropicModel, CompletionModel, CompletionProvider, OpenAiCompletionModel};
pub use self::credentials::{ApiKeyCredentials, Credentials};
pub use self::embedding::{
    CohereEmbeddingModel, EmbeddingModel, EmbeddingProvider, OpenAiEmbeddingModel,
};

/// Tracing target for provider operations.
pub const TRACING_TARGET: &str = "eddy_rig::provider";
