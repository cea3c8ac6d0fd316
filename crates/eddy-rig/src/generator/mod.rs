//! Recommendation generation and validation.
//!
//! The [`RecommendationGenerator`] sends a [`GenerationRequest`] to a
//! [`GenerativeModel`], parses the raw text into an intermediate record and
//! validates every field against the model schema. Field-level problems are
//! recorded on the individual recommendations; only service failures and
//! unparsable responses are returned as errors.
//!
//! [`GenerationRequest`]: eddy_core::GenerationRequest
//! [`GenerativeModel`]: eddy_core::GenerativeModel

mod citation;
mod config;
mod generator;
mod response;

pub use self::config::GeneratorConfig;
pub use self::generator::RecommendationGenerator;

/// Tracing target for generation operations.
pub const TRACING_TARGET: &str = "eddy_rig::generator";
