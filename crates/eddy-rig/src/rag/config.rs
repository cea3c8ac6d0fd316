//! Retriever configuration.

use std::time::Duration;

#[cfg(feature = "config")]
use clap::Args;
use eddy_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Default number of passages returned per query.
const DEFAULT_TOP_K: usize = 5;

/// Default bound on one embed-and-search round trip.
const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// Default cap on the constructed search query.
const DEFAULT_MAX_QUERY_CHARS: usize = 500;

/// Configuration for the [`Retriever`].
///
/// [`Retriever`]: crate::rag::Retriever
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct RetrieverConfig {
    /// Maximum passages returned per query
    #[cfg_attr(
        feature = "config",
        arg(long = "retrieval-top-k", env = "RETRIEVAL_TOP_K", default_value = "5")
    )]
    pub top_k: usize,

    /// Minimum similarity score; passages below it are excluded
    #[cfg_attr(
        feature = "config",
        arg(long = "retrieval-min-score", env = "RETRIEVAL_MIN_SCORE")
    )]
    pub min_score: Option<f64>,

    /// Timeout for embedding plus index search, in seconds
    #[cfg_attr(
        feature = "config",
        arg(
            id = "retrieval_timeout_secs",
            long = "retrieval-timeout-secs",
            env = "RETRIEVAL_TIMEOUT_SECS",
            default_value = "20"
        )
    )]
    pub timeout_secs: u64,

    /// Maximum length of the constructed search query, in characters
    #[cfg_attr(
        feature = "config",
        arg(
            long = "retrieval-max-query-chars",
            env = "RETRIEVAL_MAX_QUERY_CHARS",
            default_value = "500"
        )
    )]
    pub max_query_chars: usize,

    /// Expand turbulence terminology with common synonyms
    #[cfg_attr(
        feature = "config",
        arg(long = "retrieval-expand-synonyms", env = "RETRIEVAL_EXPAND_SYNONYMS")
    )]
    pub expand_synonyms: bool,

    /// Vector index namespace, for backends that support it
    #[cfg_attr(
        feature = "config",
        arg(long = "retrieval-namespace", env = "RETRIEVAL_NAMESPACE")
    )]
    pub namespace: Option<String>,
}

impl RetrieverConfig {
    /// Returns the retrieval timeout as a Duration.
    #[inline]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Sets the number of passages returned per query.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Sets the minimum similarity score.
    pub fn with_min_score(mut self, min_score: f64) -> Self {
        self.min_score = Some(min_score);
        self
    }

    /// Enables synonym expansion of constructed queries.
    pub fn with_synonyms(mut self) -> Self {
        self.expand_synonyms = true;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.top_k == 0 {
            return Err(Error::config("retrieval top-k must be at least 1"));
        }
        if self.timeout_secs == 0 {
            return Err(Error::config("retrieval timeout must be non-zero"));
        }
        if self.max_query_chars == 0 {
            return Err(Error::config("retrieval query length must be non-zero"));
        }
        if let Some(min_score) = self.min_score
            && !min_score.is_finite()
        {
            return Err(Error::config("retrieval min score must be finite"));
        }
        Ok(())
    }
}

impl Default for RetrieverConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            min_score: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_query_chars: DEFAULT_MAX_QUERY_CHARS,
            expand_synonyms: false,
            namespace: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let config = RetrieverConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.timeout(), Duration::from_secs(20));
    }

    #[test]
    fn zero_top_k_is_rejected() {
        let config = RetrieverConfig::default().with_top_k(0);
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }
}
