//! Vector index configuration.

use std::fmt;
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, ValueEnum};
use eddy_core::BoxedVectorIndex;
use eddy_vector::{PineconeConfig, QdrantConfig, VectorStore, VectorStoreConfig};

use crate::TRACING_TARGET_CONFIG;

/// Supported vector index backends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum VectorBackend {
    #[default]
    Qdrant,
    Pinecone,
}

/// Vector index connection settings.
#[derive(Clone, Args)]
pub struct VectorConfig {
    /// Vector index backend
    #[arg(long, env = "EDDY_VECTOR_BACKEND", value_enum, default_value = "qdrant")]
    pub vector_backend: VectorBackend,

    /// Index dimension; defaults to the embedding model dimension
    #[arg(long, env = "EDDY_VECTOR_DIMENSIONS")]
    pub vector_dimensions: Option<usize>,

    /// Qdrant gRPC URL
    #[arg(long, env = "QDRANT_URL", default_value = "http://localhost:6334")]
    pub qdrant_url: String,

    /// Qdrant API key
    #[arg(long, env = "QDRANT_API_KEY", hide_env_values = true)]
    pub qdrant_api_key: Option<String>,

    /// Qdrant collection holding the literature chunks
    #[arg(long, env = "QDRANT_COLLECTION", default_value = "cfd_documents")]
    pub qdrant_collection: String,

    /// Pinecone API key
    #[arg(long, env = "PINECONE_API_KEY", hide_env_values = true)]
    pub pinecone_api_key: Option<String>,

    /// Pinecone index name
    #[arg(long, env = "PINECONE_INDEX", default_value = "cfd-knowledge-base")]
    pub pinecone_index: String,

    /// Pinecone index host; resolved through the control plane when unset
    #[arg(long, env = "PINECONE_HOST")]
    pub pinecone_host: Option<String>,
}

impl VectorConfig {
    /// Returns the backend configuration for an index of `dimensions`.
    pub fn store_config(&self, dimensions: usize) -> anyhow::Result<VectorStoreConfig> {
        let dimensions = self.vector_dimensions.unwrap_or(dimensions);
        let config = match self.vector_backend {
            VectorBackend::Qdrant => {
                let mut qdrant = QdrantConfig::new(&self.qdrant_url)
                    .with_collection(&self.qdrant_collection)
                    .with_dimensions(dimensions);
                if let Some(api_key) = &self.qdrant_api_key {
                    qdrant = qdrant.with_api_key(api_key);
                }
                VectorStoreConfig::Qdrant(qdrant)
            }
            VectorBackend::Pinecone => {
                let api_key = self
                    .pinecone_api_key
                    .as_deref()
                    .filter(|k| !k.trim().is_empty())
                    .context("PINECONE_API_KEY is not set")?;
                let mut pinecone =
                    PineconeConfig::new(api_key, &self.pinecone_index).with_dimensions(dimensions);
                if let Some(host) = &self.pinecone_host {
                    pinecone = pinecone.with_host(host);
                }
                VectorStoreConfig::Pinecone(pinecone)
            }
        };
        Ok(config)
    }

    /// Connects to the configured vector index.
    pub async fn connect(&self, dimensions: usize) -> anyhow::Result<BoxedVectorIndex> {
        let config = self.store_config(dimensions)?;
        let backend = config.backend_name();
        let store = VectorStore::new(config)
            .await
            .with_context(|| format!("failed to connect to {backend} vector index"))?;
        Ok(Arc::new(store))
    }

    /// Logs the index selection (never the keys).
    pub fn log(&self) {
        match self.vector_backend {
            VectorBackend::Qdrant => tracing::info!(
                target: TRACING_TARGET_CONFIG,
                backend = "qdrant",
                url = %self.qdrant_url,
                collection = %self.qdrant_collection,
                dimensions = ?self.vector_dimensions,
                "Vector index configuration"
            ),
            VectorBackend::Pinecone => tracing::info!(
                target: TRACING_TARGET_CONFIG,
                backend = "pinecone",
                index = %self.pinecone_index,
                host = ?self.pinecone_host,
                dimensions = ?self.vector_dimensions,
                "Vector index configuration"
            ),
        }
    }
}

impl fmt::Debug for VectorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VectorConfig")
            .field("vector_backend", &self.vector_backend)
            .field("vector_dimensions", &self.vector_dimensions)
            .field("qdrant_url", &self.qdrant_url)
            .field("qdrant_collection", &self.qdrant_collection)
            .field("pinecone_index", &self.pinecone_index)
            .field("pinecone_host", &self.pinecone_host)
            .finish_non_exhaustive()
    }
}
