//! Vector store configuration types.

use serde::{Deserialize, Serialize};

pub use crate::pinecone::PineconeConfig;
pub use crate::qdrant::QdrantConfig;

/// Vector store backend configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
#[non_exhaustive]
pub enum VectorStoreConfig {
    /// Qdrant vector database.
    Qdrant(QdrantConfig),
    /// Pinecone managed vector database.
    Pinecone(PineconeConfig),
}

impl VectorStoreConfig {
    /// Returns the backend name as a static string.
    pub fn backend_name(&self) -> &'static str {
        match self {
            Self::Qdrant(_) => "qdrant",
            Self::Pinecone(_) => "pinecone",
        }
    }

    /// Returns the configured vector dimension, if any.
    pub fn dimensions(&self) -> Option<usize> {
        match self {
            Self::Qdrant(cfg) => cfg.dimensions,
            Self::Pinecone(cfg) => cfg.dimensions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_tagged_backend() {
        let config: VectorStoreConfig = serde_json::from_str(
            r#"{"type":"pinecone","api_key":"k","index":"cfd-knowledge-base","dimensions":1536}"#,
        )
        .unwrap();

        assert_eq!(config.backend_name(), "pinecone");
        assert_eq!(config.dimensions(), Some(1536));
    }

    #[test]
    fn qdrant_defaults() {
        let config: VectorStoreConfig =
            serde_json::from_str(r#"{"type":"qdrant","url":"http://localhost:6334"}"#).unwrap();

        let VectorStoreConfig::Qdrant(qdrant) = config else {
            panic!("expected qdrant config");
        };
        assert_eq!(qdrant.collection, "cfd_documents");
        assert!(qdrant.api_key.is_none());
    }
}
