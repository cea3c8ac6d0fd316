//! Retrieval of literature passages.
//!
//! The [`Retriever`] embeds a query with an [`Embedder`], searches a
//! [`VectorIndex`] and maps the raw matches into [`DocumentChunk`]s sorted by
//! descending relevance. An empty result is a valid outcome; only embedding
//! or index service failures are reported as errors.
//!
//! [`Embedder`]: eddy_core::Embedder
//! [`VectorIndex`]: eddy_core::VectorIndex
//! [`DocumentChunk`]: eddy_core::DocumentChunk

mod config;
mod query;
mod retriever;

pub use self::config::RetrieverConfig;
pub use self::query::{RetrievalQuery, expand_synonyms};
pub use self::retriever::Retriever;

/// Tracing target for retrieval operations.
pub const TRACING_TARGET: &str = "eddy_rig::rag";
