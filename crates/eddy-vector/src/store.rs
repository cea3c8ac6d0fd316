//! Vector store trait and the unified store.

use std::collections::HashMap;

use async_trait::async_trait;
use eddy_core::{IndexMatch, IndexQuery, IndexStats, VectorIndex};
use serde::{Deserialize, Serialize};

use crate::TRACING_TARGET;
use crate::config::VectorStoreConfig;
use crate::error::{VectorError, VectorResult};
use crate::pinecone::PineconeBackend;
use crate::qdrant::QdrantBackend;

/// Payload key under which ingestion stores the passage text.
const TEXT_KEY: &str = "text";

/// Search result from a vector query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// Vector ID.
    pub id: String,
    /// Similarity score.
    pub score: f32,
    /// Associated metadata.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, serde_json::Value>,
}

/// Search options.
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    /// Drop matches scoring below this threshold.
    pub min_score: Option<f32>,
    /// Metadata filter (backend-specific JSON).
    pub filter: Option<serde_json::Value>,
    /// Namespace/partition (for backends that support it).
    pub namespace: Option<String>,
}

/// Collection statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectionStats {
    pub total_vectors: u64,
    pub dimensions: Option<usize>,
}

/// Trait for read-only vector store backends.
#[async_trait]
pub trait VectorStoreBackend: Send + Sync {
    /// Returns the backend name.
    fn name(&self) -> &'static str;

    /// Searches for similar vectors.
    async fn search(
        &self,
        query: Vec<f32>,
        limit: usize,
        options: SearchOptions,
    ) -> VectorResult<Vec<SearchResult>>;

    /// Returns collection statistics.
    async fn stats(&self) -> VectorResult<CollectionStats>;
}

/// Unified vector store that wraps backend implementations.
pub struct VectorStore {
    backend: Box<dyn VectorStoreBackend>,
    dimensions: Option<usize>,
}

impl VectorStore {
    /// Creates a new vector store from configuration.
    pub async fn new(config: VectorStoreConfig) -> VectorResult<Self> {
        let backend: Box<dyn VectorStoreBackend> = match &config {
            VectorStoreConfig::Qdrant(cfg) => Box::new(QdrantBackend::new(cfg).await?),
            VectorStoreConfig::Pinecone(cfg) => Box::new(PineconeBackend::new(cfg)?),
        };

        tracing::info!(
            target: TRACING_TARGET,
            backend = %config.backend_name(),
            dimensions = ?config.dimensions(),
            "Vector store initialized"
        );

        Ok(Self::from_backend(backend, config.dimensions()))
    }

    /// Wraps an already constructed backend.
    pub fn from_backend(backend: Box<dyn VectorStoreBackend>, dimensions: Option<usize>) -> Self {
        Self {
            backend,
            dimensions,
        }
    }

    /// Searches for similar vectors with options.
    pub async fn search(
        &self,
        query: Vec<f32>,
        limit: usize,
        options: SearchOptions,
    ) -> VectorResult<Vec<SearchResult>> {
        if let Some(expected) = self.dimensions
            && expected != query.len()
        {
            return Err(VectorError::dimension_mismatch(expected, query.len()));
        }

        tracing::debug!(
            target: TRACING_TARGET,
            backend = %self.backend.name(),
            limit = %limit,
            "Searching vectors"
        );
        self.backend.search(query, limit, options).await
    }

    /// Returns collection statistics.
    pub async fn stats(&self) -> VectorResult<CollectionStats> {
        self.backend.stats().await
    }
}

impl std::fmt::Debug for VectorStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VectorStore")
            .field("backend", &self.backend.name())
            .field("dimensions", &self.dimensions)
            .finish()
    }
}

impl From<SearchResult> for IndexMatch {
    fn from(mut result: SearchResult) -> Self {
        let text = match result.metadata.remove(TEXT_KEY) {
            Some(serde_json::Value::String(text)) => Some(text),
            Some(other) => {
                result.metadata.insert(TEXT_KEY.to_owned(), other);
                None
            }
            None => None,
        };

        IndexMatch {
            id: result.id,
            score: f64::from(result.score),
            text,
            metadata: result.metadata,
        }
    }
}

#[async_trait]
impl VectorIndex for VectorStore {
    fn backend_name(&self) -> &str {
        self.backend.name()
    }

    fn dimensions(&self) -> Option<usize> {
        self.dimensions
    }

    async fn query(&self, query: &IndexQuery) -> eddy_core::Result<Vec<IndexMatch>> {
        let options = SearchOptions {
            min_score: query.min_score.map(|s| s as f32),
            filter: query.filter.clone(),
            namespace: query.namespace.clone(),
        };

        let results = self.search(query.vector.clone(), query.top_k, options).await?;
        Ok(results.into_iter().map(IndexMatch::from).collect())
    }

    async fn stats(&self) -> eddy_core::Result<IndexStats> {
        let stats = VectorStore::stats(self).await?;
        Ok(IndexStats {
            total_vectors: stats.total_vectors,
            dimensions: stats.dimensions.or(self.dimensions),
        })
    }
}
