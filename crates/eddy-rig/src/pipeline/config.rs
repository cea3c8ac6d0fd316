//! Pipeline configuration.

use std::time::Duration;

#[cfg(feature = "config")]
use clap::Args;
use eddy_core::{Error, Result};
use serde::{Deserialize, Serialize};

use crate::generator::GeneratorConfig;
use crate::prompt::PromptConfig;
use crate::rag::RetrieverConfig;

/// Configuration for the [`RecommendationPipeline`].
///
/// [`RecommendationPipeline`]: crate::pipeline::RecommendationPipeline
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct PipelineConfig {
    #[cfg_attr(feature = "config", command(flatten))]
    #[serde(default)]
    pub retriever: RetrieverConfig,

    #[cfg_attr(feature = "config", command(flatten))]
    #[serde(default)]
    pub prompt: PromptConfig,

    #[cfg_attr(feature = "config", command(flatten))]
    #[serde(default)]
    pub generator: GeneratorConfig,

    #[cfg_attr(feature = "config", command(flatten))]
    #[serde(default)]
    pub retry: RetryConfig,
}

/// Retry policy for transient generation failures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct RetryConfig {
    /// Delay before the first retry, in milliseconds; doubled for each further retry
    #[cfg_attr(
        feature = "config",
        arg(
            long = "retry-backoff-ms",
            env = "RETRY_BACKOFF_MS",
            default_value = "1000"
        )
    )]
    pub retry_backoff_ms: u64,

    /// Total generation attempts, including the first
    #[cfg_attr(
        feature = "config",
        arg(
            long = "max-generation-attempts",
            env = "MAX_GENERATION_ATTEMPTS",
            default_value = "2"
        )
    )]
    pub max_generation_attempts: u32,
}

impl RetryConfig {
    /// Returns the delay before retry number `retry` (1-based).
    pub fn backoff(&self, retry: u32) -> Duration {
        let factor = 1u64 << retry.saturating_sub(1).min(16);
        Duration::from_millis(self.retry_backoff_ms.saturating_mul(factor))
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            retry_backoff_ms: 1000,
            max_generation_attempts: 2,
        }
    }
}

impl PipelineConfig {
    /// Validates the configuration and every nested section.
    pub fn validate(&self) -> Result<()> {
        self.retriever.validate()?;
        self.prompt.validate()?;
        self.generator.validate()?;
        if self.retry.max_generation_attempts == 0 {
            return Err(Error::config("at least one generation attempt is required"));
        }
        Ok(())
    }
}
