//! `eddy recommend`

use std::path::Path;

use anyhow::Context;
use eddy_core::{ExportFormat, RecommendationResult};
use eddy_rig::RecommendationPipeline;

use crate::TRACING_TARGET_COMMAND;

pub struct RecommendArgs<'a> {
    pub model: &'a str,
    pub description: &'a str,
    pub focus: Option<&'a str>,
    pub format: ExportFormat,
    pub output: Option<&'a Path>,
}

pub async fn run(pipeline: &RecommendationPipeline, args: RecommendArgs<'_>) -> anyhow::Result<()> {
    let outcome = pipeline
        .generate_recommendations(args.model, args.description, args.focus)
        .await;

    match outcome {
        Ok(result) => {
            tracing::info!(
                target: TRACING_TARGET_COMMAND,
                status = %result.status,
                confidence = result.overall_confidence,
                documents = result.documents_used(),
                "Recommendation complete"
            );
            write_report(&result, args.format, args.output)
        }
        Err(error) => {
            if let Some(result) = error.partial_result() {
                write_report(result, args.format, args.output)?;
            }
            Err(error).context("recommendation failed")
        }
    }
}

fn write_report(
    result: &RecommendationResult,
    format: ExportFormat,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let report = result.export(format)?;
    match output {
        Some(path) => {
            std::fs::write(path, report)
                .with_context(|| format!("failed to write report to {}", path.display()))?;
            tracing::info!(
                target: TRACING_TARGET_COMMAND,
                path = %path.display(),
                format = %format,
                "Report written"
            );
        }
        None => println!("{report}"),
    }
    Ok(())
}
