//! Nearest-neighbour search capability.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Result;

/// Type alias for a shared vector index.
pub type BoxedVectorIndex = Arc<dyn VectorIndex>;

/// A nearest-neighbour query.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexQuery {
    /// Query embedding.
    pub vector: Vec<f32>,
    /// Maximum number of matches to return.
    pub top_k: usize,
    /// Matches scoring below this are dropped by backends that support it.
    pub min_score: Option<f64>,
    /// Namespace or partition, for backends that support it.
    pub namespace: Option<String>,
    /// Backend-specific metadata filter.
    pub filter: Option<serde_json::Value>,
}

impl IndexQuery {
    /// Creates a query with no threshold, namespace or filter.
    pub fn new(vector: Vec<f32>, top_k: usize) -> Self {
        Self {
            vector,
            top_k,
            min_score: None,
            namespace: None,
            filter: None,
        }
    }

    /// Sets the minimum score.
    pub fn with_min_score(mut self, min_score: Option<f64>) -> Self {
        self.min_score = min_score;
        self
    }

    /// Sets the namespace.
    pub fn with_namespace(mut self, namespace: Option<String>) -> Self {
        self.namespace = namespace;
        self
    }
}

/// A raw match returned by a vector index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexMatch {
    /// Opaque identifier.
    pub id: String,
    /// Similarity score; higher is more relevant.
    pub score: f64,
    /// Stored passage text, if the backend keeps it outside the metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Stored payload.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl IndexMatch {
    /// Creates a match with empty metadata.
    pub fn new(id: impl Into<String>, score: f64) -> Self {
        Self {
            id: id.into(),
            score,
            text: None,
            metadata: HashMap::new(),
        }
    }

    /// Sets the passage text.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Adds a single metadata field.
    pub fn with_field(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}

/// Index statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
    /// Number of stored vectors.
    pub total_vectors: u64,
    /// Configured vector dimension, if known.
    pub dimensions: Option<usize>,
}

/// An externally owned vector index.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Returns the backend name (e.g. `qdrant`).
    fn backend_name(&self) -> &str;

    /// Returns the dimension the index was created with, if known up front.
    fn dimensions(&self) -> Option<usize>;

    /// Runs a nearest-neighbour query.
    ///
    /// An empty index yields an empty list, not an error.
    async fn query(&self, query: &IndexQuery) -> Result<Vec<IndexMatch>>;

    /// Returns index statistics.
    async fn stats(&self) -> Result<IndexStats>;
}

#[async_trait]
impl<T: VectorIndex + ?Sized> VectorIndex for Arc<T> {
    fn backend_name(&self) -> &str {
        (**self).backend_name()
    }

    fn dimensions(&self) -> Option<usize> {
        (**self).dimensions()
    }

    async fn query(&self, query: &IndexQuery) -> Result<Vec<IndexMatch>> {
        (**self).query(query).await
    }

    async fn stats(&self) -> Result<IndexStats> {
        (**self).stats().await
    }
}
