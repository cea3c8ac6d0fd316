//! Embedding provider abstraction.

use std::sync::Arc;

use async_trait::async_trait;
use eddy_core::{Embedder, Error, Result};
use rig::embeddings::EmbeddingModel as RigEmbeddingModel;
use rig::prelude::EmbeddingsClient;
use rig::providers::{cohere, openai};

use super::model::EmbeddingModel;
use crate::provider::{Credentials, TRACING_TARGET};

/// Cohere input type for retrieval queries.
const COHERE_QUERY_INPUT_TYPE: &str = "search_query";

/// Embedding provider that wraps different rig embedding model implementations.
///
/// This is a cheaply cloneable wrapper around an `Arc<EmbeddingService>`.
#[derive(Clone)]
pub struct EmbeddingProvider(Arc<EmbeddingService>);

enum EmbeddingService {
    OpenAi {
        model: openai::EmbeddingModel,
        model_name: String,
    },
    Cohere {
        model: cohere::EmbeddingModel,
        model_name: String,
    },
}

impl EmbeddingProvider {
    /// Creates a provider for `model` authenticated with `credentials`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the credentials belong to a provider
    /// without embedding support or the API key is blank.
    pub fn new(model: EmbeddingModel, credentials: Credentials) -> Result<Self> {
        credentials.require_api_key()?;

        let inner = match (credentials, model) {
            (Credentials::OpenAi(c), EmbeddingModel::OpenAi(m)) => {
                let client = openai::Client::new(&c.api_key)
                    .map_err(|e| Error::config(format!("openai: {e}")))?;
                EmbeddingService::OpenAi {
                    model: client.embedding_model_with_ndims(m.as_ref(), m.dimensions()),
                    model_name: m.as_ref().to_string(),
                }
            }
            (Credentials::Cohere(c), EmbeddingModel::Cohere(m)) => {
                let client = cohere::Client::new(&c.api_key)
                    .map_err(|e| Error::config(format!("cohere: {e}")))?;
                EmbeddingService::Cohere {
                    model: client.embedding_model_with_ndims(
                        m.as_ref(),
                        COHERE_QUERY_INPUT_TYPE,
                        m.dimensions(),
                    ),
                    model_name: m.as_ref().to_string(),
                }
            }
            (credentials, model) => {
                return Err(Error::config(format!(
                    "{} credentials cannot be used with embedding model {}",
                    credentials.provider(),
                    model.as_str()
                )));
            }
        };

        Ok(Self(Arc::new(inner)))
    }

    /// Returns the provider name.
    pub fn provider_name(&self) -> &'static str {
        match self.0.as_ref() {
            EmbeddingService::OpenAi { .. } => "openai",
            EmbeddingService::Cohere { .. } => "cohere",
        }
    }
}

#[async_trait]
impl Embedder for EmbeddingProvider {
    fn model_name(&self) -> &str {
        match self.0.as_ref() {
            EmbeddingService::OpenAi { model_name, .. } => model_name,
            EmbeddingService::Cohere { model_name, .. } => model_name,
        }
    }

    fn dimensions(&self) -> usize {
        match self.0.as_ref() {
            EmbeddingService::OpenAi { model, .. } => model.ndims(),
            EmbeddingService::Cohere { model, .. } => model.ndims(),
        }
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        tracing::debug!(
            target: TRACING_TARGET,
            provider = self.provider_name(),
            model = self.model_name(),
            chars = text.len(),
            "Embedding query text"
        );

        let embedding = match self.0.as_ref() {
            EmbeddingService::OpenAi { model, .. } => model.embed_text(text).await,
            EmbeddingService::Cohere { model, .. } => model.embed_text(text).await,
        }
        .map_err(|e| {
            Error::retrieval_service(format!("{} embedding failed: {e}", self.provider_name()))
        })?;

        Ok(embedding.vec.iter().map(|&x| x as f32).collect())
    }
}

impl std::fmt::Debug for EmbeddingProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingProvider")
            .field("provider", &self.provider_name())
            .field("model", &self.model_name())
            .field("ndims", &self.dimensions())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ApiKeyCredentials;
    use crate::provider::embedding::model::OpenAiEmbeddingModel;

    #[test]
    fn anthropic_credentials_cannot_embed() {
        let error = EmbeddingProvider::new(
            EmbeddingModel::OpenAi(OpenAiEmbeddingModel::TextEmbedding3Small),
            Credentials::Anthropic(ApiKeyCredentials::new("key")),
        )
        .unwrap_err();

        assert!(matches!(error, Error::Config(_)));
    }
}
