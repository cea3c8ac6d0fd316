//! End-to-end recommendation pipeline.
//!
//! Composes the [`Retriever`], [`PromptBuilder`] and
//! [`RecommendationGenerator`] into a single call:
//!
//! 1. resolve the model in the registry (unknown keys fail before any I/O);
//! 2. retrieve literature passages, continuing without context on failure;
//! 3. assemble the generation request;
//! 4. generate and validate, retrying transient service failures.
//!
//! [`Retriever`]: crate::rag::Retriever
//! [`PromptBuilder`]: crate::prompt::PromptBuilder
//! [`RecommendationGenerator`]: crate::generator::RecommendationGenerator

mod config;
mod service;
mod status;

pub use self::config::{PipelineConfig, RetryConfig};
pub use self::service::RecommendationPipeline;
pub use self::status::PipelineStatus;

/// Tracing target for pipeline operations.
pub const TRACING_TARGET: &str = "eddy_rig::pipeline";
