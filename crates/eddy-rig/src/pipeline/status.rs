//! Pipeline health report.

use eddy_core::IndexStats;
use serde::{Deserialize, Serialize};

/// Snapshot of the pipeline's external dependencies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineStatus {
    /// Vector index backend name.
    pub index_backend: String,
    /// Index statistics, when the index answered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_stats: Option<IndexStats>,
    /// Why the statistics are unavailable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_error: Option<String>,
    pub embedding_model: String,
    pub embedding_dimensions: usize,
    pub generation_model: String,
    /// Registry keys of the supported turbulence models.
    pub models: Vec<String>,
}

impl PipelineStatus {
    /// Returns whether the query embedding dimension matches the index.
    ///
    /// `None` when the index dimension is unknown.
    pub fn dimensions_consistent(&self) -> Option<bool> {
        let dimensions = self.index_stats.as_ref()?.dimensions?;
        Some(dimensions == self.embedding_dimensions)
    }

    /// Returns true if the index answered and can serve queries.
    pub fn is_ready(&self) -> bool {
        self.index_error.is_none() && self.dimensions_consistent() != Some(false)
    }
}
