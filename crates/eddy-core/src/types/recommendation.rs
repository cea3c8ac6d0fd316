//! Recommendation records and the aggregate result.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use super::DocumentChunk;

/// Validation outcome of a single recommended parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(AsRefStr, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ParameterStatus {
    /// Numeric and inside the valid range.
    Valid,
    /// Numeric but outside the valid range; kept with capped confidence.
    OutOfRange,
    /// Present but not a number.
    Unparsable,
    /// Absent from the generator output.
    Missing,
}

/// Overall outcome of a recommendation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(AsRefStr, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RecommendationStatus {
    /// Every parameter validated cleanly.
    Complete,
    /// Some, but not all, parameters validated cleanly.
    Partial,
    /// No parameter validated, or the generation call itself failed.
    Failed,
}

impl RecommendationStatus {
    /// Derives the status from the number of cleanly validated parameters.
    pub fn from_tally(clean: usize, total: usize) -> Self {
        match clean {
            0 => Self::Failed,
            n if n >= total => Self::Complete,
            _ => Self::Partial,
        }
    }
}

/// One recommended parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterRecommendation {
    /// Canonical parameter name from the model schema.
    pub name: String,
    /// Mathematical symbol from the model schema.
    pub symbol: String,
    /// Recommended value; absent when missing or unparsable.
    pub value: Option<f64>,
    /// Estimated reliability in `[0, 1]`.
    pub confidence: f64,
    /// Why this value was chosen.
    pub rationale: String,
    pub status: ParameterStatus,
    /// Validation notes attached while checking the generator output.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
    /// Labels of the passages the rationale cites (e.g. `S1`).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub citations: Vec<String>,
}

impl ParameterRecommendation {
    /// Creates an entry for a parameter the generator did not provide.
    pub fn missing(name: impl Into<String>, symbol: impl Into<String>, note: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            value: None,
            confidence: 0.0,
            rationale: String::new(),
            status: ParameterStatus::Missing,
            notes: vec![note.into()],
            citations: Vec::new(),
        }
    }

    /// Returns true if the entry counts towards a complete result.
    pub fn is_clean(&self) -> bool {
        self.status == ParameterStatus::Valid
    }
}

/// Aggregate answer of one pipeline call.
///
/// Built once per call and not mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationResult {
    /// Registry key of the selected model.
    pub model_key: String,
    /// Display name of the selected model.
    pub model_name: String,
    /// One entry per schema parameter, in schema order.
    pub recommendations: Vec<ParameterRecommendation>,
    /// Passages placed in the generation prompt.
    pub citations: Vec<DocumentChunk>,
    pub status: RecommendationStatus,
    /// Human-readable one-line summary.
    pub summary: String,
    /// Whether retrieved context was given to the generator.
    pub context_used: bool,
    /// Overall confidence reported by the generator, or the mean of the
    /// per-parameter confidences.
    pub overall_confidence: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub key_considerations: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sensitivity_warnings: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub validation_recommendations: Vec<String>,
    /// Degradation and validation warnings for the whole call.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    pub generated_at: Timestamp,
}

impl RecommendationResult {
    /// Returns the recommendation for `name`, if present.
    pub fn recommendation(&self, name: &str) -> Option<&ParameterRecommendation> {
        self.recommendations.iter().find(|r| r.name == name)
    }

    /// Returns the number of cleanly validated parameters.
    pub fn clean_count(&self) -> usize {
        self.recommendations.iter().filter(|r| r.is_clean()).count()
    }

    /// Returns the number of passages used as context.
    pub fn documents_used(&self) -> usize {
        self.citations.len()
    }

    /// Returns the mean relevance score of the cited passages, or zero.
    pub fn average_relevance(&self) -> f64 {
        if self.citations.is_empty() {
            return 0.0;
        }
        self.citations.iter().map(|c| c.score).sum::<f64>() / self.citations.len() as f64
    }

    /// Builds the one-line summary for the current content.
    pub fn headline(&self) -> String {
        match self.status {
            RecommendationStatus::Failed => format!(
                "Failed to generate parameters for {} ({}/{} valid, documents: {})",
                self.model_name,
                self.clean_count(),
                self.recommendations.len(),
                self.documents_used(),
            ),
            _ => format!(
                "Generated {}/{} parameters for {} (confidence: {:.2}, documents: {})",
                self.clean_count(),
                self.recommendations.len(),
                self.model_name,
                self.overall_confidence,
                self.documents_used(),
            ),
        }
    }
}
