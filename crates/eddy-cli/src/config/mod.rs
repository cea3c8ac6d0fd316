//! CLI configuration management.
//!
//! This module defines the complete CLI configuration hierarchy:
//!
//! ```text
//! Cli
//! ├── command: Command             # recommend, models, search, status
//! ├── provider: ProviderConfig     # completion/embedding models and API keys
//! ├── vector: VectorConfig         # Qdrant or Pinecone connection
//! └── pipeline: PipelineConfig     # retrieval, prompt, generation, retry
//! ```
//!
//! All configuration can be provided via CLI arguments or environment variables.
//! Use `--help` to see all available options.

mod provider;
mod vector;

use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use eddy_core::ModelRegistry;
use eddy_rig::PipelineConfig;
pub use provider::ProviderConfig;
pub use vector::{VectorBackend, VectorConfig};

use crate::command::Command;
use crate::telemetry::LogFormat;
use crate::{TRACING_TARGET_CONFIG, TRACING_TARGET_STARTUP};

/// Complete CLI configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "eddy")]
#[command(about = "Literature-grounded turbulence model parameter recommendations")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log line format
    #[arg(long, env = "EDDY_LOG_FORMAT", value_enum, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// JSON file with additional turbulence model definitions
    #[arg(long, env = "EDDY_MODELS_FILE", global = true)]
    pub models_file: Option<PathBuf>,

    /// Completion and embedding provider configuration.
    #[command(flatten)]
    pub provider: ProviderConfig,

    /// Vector index configuration.
    #[command(flatten)]
    pub vector: VectorConfig,

    /// Retrieval, prompt, generation and retry configuration.
    #[command(flatten)]
    pub pipeline: PipelineConfig,
}

impl Cli {
    /// Loads environment variables from .env file (if enabled) and parses CLI arguments.
    ///
    /// The .env file is loaded before clap parses arguments, so its variables
    /// act as defaults for the `env` bindings.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    /// Loads environment variables from .env file if the dotenv feature is enabled.
    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    /// No-op when dotenv feature is disabled.
    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Validates all configuration values.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.pipeline
            .validate()
            .context("invalid pipeline configuration")?;
        Ok(())
    }

    /// Builds the model registry, including models from `--models-file`.
    pub fn registry(&self) -> anyhow::Result<Arc<ModelRegistry>> {
        let mut registry = ModelRegistry::builtin();
        if let Some(path) = &self.models_file {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read models file {}", path.display()))?;
            let added = registry
                .register_json(&json)
                .with_context(|| format!("invalid models file {}", path.display()))?;
            tracing::info!(
                target: TRACING_TARGET_CONFIG,
                path = %path.display(),
                added,
                "Registered additional turbulence models"
            );
        }
        Ok(Arc::new(registry))
    }

    /// Logs configuration at debug level (no sensitive information).
    pub fn log(&self) {
        tracing::debug!(
            target: TRACING_TARGET_STARTUP,
            version = env!("CARGO_PKG_VERSION"),
            pid = process::id(),
            arch = std::env::consts::ARCH,
            os = std::env::consts::OS,
            features = ?Self::enabled_features(),
            "Build information"
        );

        self.provider.log();
        self.vector.log();

        let pipeline = &self.pipeline;
        tracing::debug!(
            target: TRACING_TARGET_CONFIG,
            top_k = pipeline.retriever.top_k,
            min_score = ?pipeline.retriever.min_score,
            retrieval_timeout_secs = pipeline.retriever.timeout_secs,
            max_context_chars = pipeline.prompt.max_context_chars,
            temperature = pipeline.prompt.temperature,
            generation_timeout_secs = pipeline.generator.timeout_secs,
            out_of_range_ceiling = pipeline.generator.out_of_range_ceiling,
            max_generation_attempts = pipeline.retry.max_generation_attempts,
            "Pipeline configuration"
        );
    }

    /// Returns a list of enabled compile-time features.
    fn enabled_features() -> Vec<&'static str> {
        [cfg!(feature = "dotenv").then_some("dotenv")]
            .into_iter()
            .flatten()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_recommend_with_defaults() {
        let cli = Cli::try_parse_from([
            "eddy",
            "recommend",
            "--model",
            "k_epsilon",
            "--description",
            "pipe flow",
        ])
        .unwrap();

        assert_eq!(cli.pipeline.retriever.top_k, 5);
        assert_eq!(cli.pipeline.prompt.max_context_chars, 4000);
        assert_eq!(cli.pipeline.retry.max_generation_attempts, 2);
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn registry_includes_models_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(
            &mut file,
            br#"{"key": "spalart_custom", "name": "Custom SA",
                 "parameters": [{"name": "cb1", "symbol": "c_b1", "default": 0.1355}]}"#,
        )
        .unwrap();

        let path = file.path().to_str().unwrap();
        let cli = Cli::try_parse_from(["eddy", "models", "--models-file", path]).unwrap();
        let registry = cli.registry().unwrap();

        assert!(registry.contains("spalart_custom"));
        assert!(registry.contains("k_epsilon"));
    }

    #[test]
    fn missing_models_file_is_reported() {
        let cli =
            Cli::try_parse_from(["eddy", "models", "--models-file", "/nonexistent/models.json"])
                .unwrap();
        let error = cli.registry().unwrap_err();
        assert!(error.to_string().contains("failed to read models file"));
    }
}
