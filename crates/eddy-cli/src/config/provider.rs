//! Completion and embedding provider configuration.

use std::fmt;
use std::sync::Arc;

use anyhow::Context;
use clap::Args;
use eddy_core::{BoxedEmbedder, BoxedGenerativeModel};
use eddy_rig::provider::{
    ApiKeyCredentials, CompletionModel, CompletionProvider, Credentials, EmbeddingModel,
    EmbeddingProvider,
};

use crate::TRACING_TARGET_CONFIG;

/// Provider selection and credentials.
#[derive(Clone, Args)]
pub struct ProviderConfig {
    /// Generative model (gpt-4o, gpt-4o-mini, gpt-4-turbo, claude-sonnet-4-20250514, ...)
    #[arg(long, env = "EDDY_COMPLETION_MODEL", default_value = "gpt-4o")]
    pub completion_model: String,

    /// Embedding model; must match the model used to build the index
    #[arg(long, env = "EDDY_EMBEDDING_MODEL", default_value = "text-embedding-3-small")]
    pub embedding_model: String,

    /// OpenAI API key
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    /// Anthropic API key
    #[arg(long, env = "ANTHROPIC_API_KEY", hide_env_values = true)]
    pub anthropic_api_key: Option<String>,

    /// Cohere API key
    #[arg(long, env = "COHERE_API_KEY", hide_env_values = true)]
    pub cohere_api_key: Option<String>,
}

impl ProviderConfig {
    /// Returns the parsed completion model.
    pub fn completion(&self) -> anyhow::Result<CompletionModel> {
        CompletionModel::parse(&self.completion_model)
            .with_context(|| format!("unsupported completion model '{}'", self.completion_model))
    }

    /// Returns the parsed embedding model.
    pub fn embedding(&self) -> anyhow::Result<EmbeddingModel> {
        EmbeddingModel::parse(&self.embedding_model)
            .with_context(|| format!("unsupported embedding model '{}'", self.embedding_model))
    }

    /// Creates the generative model client.
    pub fn create_generative_model(&self) -> anyhow::Result<BoxedGenerativeModel> {
        let model = self.completion()?;
        let credentials = match &model {
            CompletionModel::OpenAi(_) => {
                Credentials::OpenAi(api_key(self.openai_api_key.as_deref(), "OPENAI_API_KEY")?)
            }
            CompletionModel::Anthropic(_) => Credentials::Anthropic(api_key(
                self.anthropic_api_key.as_deref(),
                "ANTHROPIC_API_KEY",
            )?),
        };
        let provider = CompletionProvider::new(model, credentials)
            .context("failed to create completion provider")?;
        Ok(Arc::new(provider))
    }

    /// Creates the query embedding client.
    pub fn create_embedder(&self) -> anyhow::Result<BoxedEmbedder> {
        let model = self.embedding()?;
        let credentials = match &model {
            EmbeddingModel::OpenAi(_) => {
                Credentials::OpenAi(api_key(self.openai_api_key.as_deref(), "OPENAI_API_KEY")?)
            }
            EmbeddingModel::Cohere(_) => {
                Credentials::Cohere(api_key(self.cohere_api_key.as_deref(), "COHERE_API_KEY")?)
            }
        };
        let provider = EmbeddingProvider::new(model, credentials)
            .context("failed to create embedding provider")?;
        Ok(Arc::new(provider))
    }

    /// Logs provider selection (never the keys).
    pub fn log(&self) {
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            completion_model = %self.completion_model,
            embedding_model = %self.embedding_model,
            openai_key = self.openai_api_key.is_some(),
            anthropic_key = self.anthropic_api_key.is_some(),
            cohere_key = self.cohere_api_key.is_some(),
            "Provider configuration"
        );
    }
}

fn api_key(key: Option<&str>, variable: &str) -> anyhow::Result<ApiKeyCredentials> {
    key.filter(|k| !k.trim().is_empty())
        .map(ApiKeyCredentials::new)
        .with_context(|| format!("{variable} is not set"))
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mask = |key: &Option<String>| key.as_ref().map(|_| "***");
        f.debug_struct("ProviderConfig")
            .field("completion_model", &self.completion_model)
            .field("embedding_model", &self.embedding_model)
            .field("openai_api_key", &mask(&self.openai_api_key))
            .field("anthropic_api_key", &mask(&self.anthropic_api_key))
            .field("cohere_api_key", &mask(&self.cohere_api_key))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(completion: &str, embedding: &str) -> ProviderConfig {
        ProviderConfig {
            completion_model: completion.into(),
            embedding_model: embedding.into(),
            openai_api_key: None,
            anthropic_api_key: Some("sk-ant".into()),
            cohere_api_key: None,
        }
    }

    #[test]
    fn missing_key_names_the_variable() {
        let error = config("gpt-4o", "text-embedding-3-small")
            .create_embedder()
            .err()
            .unwrap();
        assert!(error.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn unknown_model_is_rejected() {
        assert!(config("gpt-2", "text-embedding-3-small").completion().is_err());
    }

    #[test]
    fn debug_masks_keys() {
        let debug = format!("{:?}", config("gpt-4o", "text-embedding-3-small"));
        assert!(!debug.contains("sk-ant"));
    }
}
