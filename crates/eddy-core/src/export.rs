//! Rendering of recommendation results.

use std::fmt::Write as _;

#[cfg(feature = "config")]
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::{RecommendationResult, Result};

/// Output format of [`RecommendationResult::export`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[derive(AsRefStr, Display, EnumString)]
#[cfg_attr(feature = "config", derive(ValueEnum))]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ExportFormat {
    #[default]
    Json,
    Markdown,
    Csv,
}

impl RecommendationResult {
    /// Renders the result in the given format.
    pub fn export(&self, format: ExportFormat) -> Result<String> {
        match format {
            ExportFormat::Json => Ok(serde_json::to_string_pretty(self)?),
            ExportFormat::Markdown => Ok(self.to_markdown()),
            ExportFormat::Csv => Ok(self.to_csv()),
        }
    }

    /// Renders a Markdown report.
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "# Parameter Recommendations: {}", self.model_name);
        let _ = writeln!(out, "**Status**: {}", self.status);
        let _ = writeln!(out, "**Overall Confidence**: {:.2}", self.overall_confidence);
        let _ = writeln!(
            out,
            "**Documents Used**: {} (average relevance {:.2})",
            self.documents_used(),
            self.average_relevance()
        );
        out.push('\n');

        out.push_str("## Recommended Parameters\n");
        for r in &self.recommendations {
            let _ = writeln!(out, "### {} ({})", r.name, r.symbol);
            match r.value {
                Some(value) => {
                    let _ = writeln!(out, "- **Value**: {value}");
                }
                None => out.push_str("- **Value**: N/A\n"),
            }
            let _ = writeln!(out, "- **Confidence**: {:.2}", r.confidence);
            let _ = writeln!(out, "- **Status**: {}", r.status);
            if !r.rationale.is_empty() {
                let _ = writeln!(out, "- **Rationale**: {}", r.rationale);
            }
            for note in &r.notes {
                let _ = writeln!(out, "- **Warning**: {note}");
            }
            out.push('\n');
        }

        let sections = [
            ("Key Considerations", &self.key_considerations),
            ("Sensitivity Warnings", &self.sensitivity_warnings),
            ("Validation Recommendations", &self.validation_recommendations),
            ("Warnings", &self.warnings),
        ];
        for (title, items) in sections {
            if items.is_empty() {
                continue;
            }
            let _ = writeln!(out, "## {title}");
            for item in items {
                let _ = writeln!(out, "- {item}");
            }
            out.push('\n');
        }

        if !self.citations.is_empty() {
            out.push_str("## Sources\n");
            for (i, chunk) in self.citations.iter().enumerate() {
                let _ = writeln!(
                    out,
                    "- [S{}] {} (relevance {:.3})",
                    i + 1,
                    chunk.reference(),
                    chunk.score
                );
            }
        }

        out
    }

    /// Renders one CSV row per parameter.
    pub fn to_csv(&self) -> String {
        let mut out = String::from("Parameter,Value,Confidence,Status,Rationale\n");
        for r in &self.recommendations {
            let value = r.value.map(|v| v.to_string()).unwrap_or_default();
            let _ = writeln!(
                out,
                "{},{},{},{},{}",
                csv_field(&r.name),
                value,
                r.confidence,
                r.status,
                csv_field(&r.rationale)
            );
        }
        out
    }
}

fn csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_owned()
    }
}
