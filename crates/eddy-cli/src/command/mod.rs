//! Subcommands and their execution.

mod models;
mod recommend;
mod search;
mod status;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Subcommand;
use eddy_core::{ExportFormat, ModelRegistry};
use eddy_rig::RecommendationPipeline;

use crate::TRACING_TARGET_COMMAND;
use crate::config::Cli;

/// Available subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Recommends parameter values for a turbulence model.
    Recommend {
        /// Registry key of the turbulence model (e.g. `k_epsilon`)
        #[arg(long, short = 'm')]
        model: String,

        /// Free-text description of the flow problem
        #[arg(long, short = 'd')]
        description: String,

        /// Optional aspect to emphasize (e.g. "near-wall behavior")
        #[arg(long)]
        focus: Option<String>,

        /// Output format
        #[arg(long, short = 'f', value_enum, default_value = "json")]
        format: ExportFormat,

        /// Writes the report to this file instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Lists supported turbulence models.
    Models {
        /// Prints the full definition of a single model
        #[arg(long)]
        key: Option<String>,
    },

    /// Searches the literature index directly.
    Search {
        /// Query text
        query: String,

        /// Number of passages to return
        #[arg(long, default_value_t = 5)]
        top_k: usize,
    },

    /// Reports the health of the configured services.
    Status,
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Self::Recommend { .. } => "recommend",
            Self::Models { .. } => "models",
            Self::Search { .. } => "search",
            Self::Status => "status",
        }
    }
}

/// Runs the parsed subcommand.
pub async fn execute(cli: Cli) -> anyhow::Result<()> {
    tracing::debug!(
        target: TRACING_TARGET_COMMAND,
        command = cli.command.name(),
        "Executing command"
    );

    match cli.command.clone() {
        Command::Models { key } => models::run(&cli, key.as_deref()),
        Command::Recommend {
            model,
            description,
            focus,
            format,
            output,
        } => {
            let registry = cli.registry()?;
            registry.get(&model)?;
            let pipeline = build_pipeline(&cli, registry).await?;
            let args = recommend::RecommendArgs {
                model: &model,
                description: &description,
                focus: focus.as_deref(),
                format,
                output: output.as_deref(),
            };
            recommend::run(&pipeline, args).await
        }
        Command::Search { query, top_k } => {
            let pipeline = build_pipeline(&cli, cli.registry()?).await?;
            search::run(&pipeline, &query, top_k).await
        }
        Command::Status => {
            let pipeline = build_pipeline(&cli, cli.registry()?).await?;
            status::run(&pipeline).await
        }
    }
}

/// Connects every external service and assembles the pipeline.
async fn build_pipeline(
    cli: &Cli,
    registry: Arc<ModelRegistry>,
) -> anyhow::Result<RecommendationPipeline> {
    let embedder = cli.provider.create_embedder()?;
    let index = cli.vector.connect(embedder.dimensions()).await?;
    let model = cli.provider.create_generative_model()?;

    let pipeline =
        RecommendationPipeline::new(registry, embedder, index, model, cli.pipeline.clone())
            .context("failed to create recommendation pipeline")?;
    Ok(pipeline)
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn parses_search_arguments() {
        let cli = Cli::try_parse_from(["eddy", "search", "wall functions", "--top-k", "3"]).unwrap();
        match cli.command {
            Command::Search { query, top_k } => {
                assert_eq!(query, "wall functions");
                assert_eq!(top_k, 3);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn recommend_format_defaults_to_json() {
        let cli = Cli::try_parse_from([
            "eddy",
            "recommend",
            "-m",
            "k_omega_sst",
            "-d",
            "backward-facing step",
            "--format",
            "markdown",
        ])
        .unwrap();
        let Command::Recommend { format, focus, .. } = cli.command else {
            panic!("expected recommend");
        };
        assert_eq!(format, ExportFormat::Markdown);
        assert!(focus.is_none());
    }

    #[tokio::test]
    async fn unknown_model_fails_before_connecting() {
        let cli = Cli::try_parse_from([
            "eddy",
            "recommend",
            "-m",
            "invalid_model_xyz",
            "-d",
            "pipe flow",
            "--vector-backend",
            "pinecone",
        ])
        .unwrap();

        let error = execute(cli).await.unwrap_err();
        assert!(matches!(
            error.downcast_ref::<eddy_core::Error>(),
            Some(eddy_core::Error::UnknownModel { .. })
        ));
    }

    #[test]
    fn recommend_requires_description() {
        assert!(Cli::try_parse_from(["eddy", "recommend", "-m", "k_epsilon"]).is_err());
    }
}
