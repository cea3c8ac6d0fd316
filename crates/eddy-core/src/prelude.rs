//! Convenience re-exports of the most commonly used eddy-core types.

pub use crate::embedder::Embedder;
pub use crate::error::{Error, Result};
pub use crate::export::ExportFormat;
pub use crate::generation::{GenerationRequest, GenerativeModel};
pub use crate::index::{IndexMatch, IndexQuery, IndexStats, VectorIndex};
pub use crate::registry::{ModelRegistry, ParameterRange, ParameterSpec, TurbulenceModel};
pub use crate::types::{
    DocumentChunk, ParameterRecommendation, ParameterStatus, RecommendationResult,
    RecommendationStatus,
};
