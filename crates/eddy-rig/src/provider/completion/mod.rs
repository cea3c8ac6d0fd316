//! Completion (generative model) provider.

mod model;
mod provider;

pub use self::model::{AnthropicModel, CompletionModel, OpenAiCompletionModel};
pub use self::provider::CompletionProvider;
