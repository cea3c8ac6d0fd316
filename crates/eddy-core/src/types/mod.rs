//! Data model shared across the recommendation pipeline.

mod chunk;
mod recommendation;

pub use self::chunk::{ChunkLocator, DocumentChunk};
pub use self::recommendation::{
    ParameterRecommendation, ParameterStatus, RecommendationResult, RecommendationStatus,
};
