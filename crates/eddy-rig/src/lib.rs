#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

pub mod generator;
pub mod pipeline;
pub mod prompt;
pub mod provider;
pub mod rag;

pub use eddy_core::{Error, Result};
pub use generator::{GeneratorConfig, RecommendationGenerator};
pub use pipeline::{PipelineConfig, PipelineStatus, RecommendationPipeline};
pub use prompt::{PromptBuilder, PromptConfig};
pub use rag::{RetrievalQuery, Retriever, RetrieverConfig};

/// Tracing target for the main library.
pub const TRACING_TARGET: &str = "eddy_rig";
