//! Qdrant configuration.

use serde::{Deserialize, Serialize};

/// Default collection holding the ingested CFD literature.
pub const DEFAULT_COLLECTION: &str = "cfd_documents";

/// Qdrant configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QdrantConfig {
    /// Qdrant server URL (e.g., "http://localhost:6334").
    pub url: String,
    /// API key for authentication.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Collection to search.
    #[serde(default = "default_collection")]
    pub collection: String,
    /// Vector dimensions the collection was created with.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<usize>,
}

fn default_collection() -> String {
    DEFAULT_COLLECTION.to_owned()
}

impl QdrantConfig {
    /// Creates a new Qdrant configuration.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: None,
            collection: default_collection(),
            dimensions: None,
        }
    }

    /// Sets the API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Sets the collection name.
    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    /// Sets the vector dimensions.
    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = Some(dimensions);
        self
    }
}
