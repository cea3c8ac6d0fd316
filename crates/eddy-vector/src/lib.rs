#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

pub mod pinecone;
pub mod qdrant;

mod config;
mod error;
mod store;

pub use config::{PineconeConfig, QdrantConfig, VectorStoreConfig};
pub use error::{VectorError, VectorResult};
pub use store::{CollectionStats, SearchOptions, SearchResult, VectorStore, VectorStoreBackend};

/// Tracing target for vector store operations.
pub const TRACING_TARGET: &str = "eddy_vector";
