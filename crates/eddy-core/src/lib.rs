#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod error;
mod export;

pub mod embedder;
pub mod generation;
pub mod index;
pub mod prelude;
pub mod registry;
pub mod types;

pub use embedder::{BoxedEmbedder, Embedder};
pub use error::{BoxedError, Error, Result};
pub use export::ExportFormat;
pub use generation::{BoxedGenerativeModel, GenerationRequest, GenerativeModel};
pub use index::{BoxedVectorIndex, IndexMatch, IndexQuery, IndexStats, VectorIndex};
pub use registry::{ModelRegistry, ParameterRange, ParameterSpec, Quantity, TurbulenceModel};
pub use types::{
    ChunkLocator, DocumentChunk, ParameterRecommendation, ParameterStatus, RecommendationResult,
    RecommendationStatus,
};

/// Tracing target for registry operations.
pub const TRACING_TARGET_REGISTRY: &str = "eddy_core::registry";
