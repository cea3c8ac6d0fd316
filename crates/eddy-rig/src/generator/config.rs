//! Generator configuration.

use std::time::Duration;

#[cfg(feature = "config")]
use clap::Args;
use eddy_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Configuration for the [`RecommendationGenerator`].
///
/// [`RecommendationGenerator`]: crate::generator::RecommendationGenerator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct GeneratorConfig {
    /// Timeout for one generation call, in seconds
    #[cfg_attr(
        feature = "config",
        arg(
            id = "generation_timeout_secs",
            long = "generation-timeout-secs",
            env = "GENERATION_TIMEOUT_SECS",
            default_value = "60"
        )
    )]
    pub timeout_secs: u64,

    /// Out-of-range values get a confidence strictly below this ceiling
    #[cfg_attr(
        feature = "config",
        arg(
            long = "out-of-range-ceiling",
            env = "OUT_OF_RANGE_CEILING",
            default_value = "0.3"
        )
    )]
    pub out_of_range_ceiling: f64,

    /// Confidence assigned when none is reported and no context was used
    #[cfg_attr(
        feature = "config",
        arg(
            long = "no-context-confidence",
            env = "NO_CONTEXT_CONFIDENCE",
            default_value = "0.35"
        )
    )]
    pub no_context_confidence: f64,

    /// Lowest confidence assigned when none is reported but context was used
    #[cfg_attr(
        feature = "config",
        arg(
            long = "context-confidence-floor",
            env = "CONTEXT_CONFIDENCE_FLOOR",
            default_value = "0.5"
        )
    )]
    pub context_confidence_floor: f64,
}

/// Margin kept between capped confidences and the out-of-range ceiling.
pub(super) const CEILING_MARGIN: f64 = 0.01;

/// Share of the remaining confidence that full context relevance can add.
const RELEVANCE_WEIGHT: f64 = 0.6;

impl GeneratorConfig {
    /// Returns the generation timeout as a Duration.
    #[inline]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Returns the highest confidence an out-of-range value may carry.
    pub fn out_of_range_cap(&self) -> f64 {
        (self.out_of_range_ceiling - CEILING_MARGIN).max(0.0)
    }

    /// Returns the confidence used when the generator reports none.
    ///
    /// Without context this is a fixed value; with context it grows with the
    /// mean relevance of the passages that were in the prompt.
    pub fn derived_confidence(&self, context_used: bool, mean_relevance: f64) -> f64 {
        if !context_used {
            return self.no_context_confidence;
        }
        let floor = self.context_confidence_floor;
        floor + (1.0 - floor) * mean_relevance.clamp(0.0, 1.0) * RELEVANCE_WEIGHT
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(Error::config("generation timeout must be non-zero"));
        }
        if !(self.out_of_range_ceiling > CEILING_MARGIN && self.out_of_range_ceiling <= 1.0) {
            return Err(Error::config(format!(
                "out-of-range ceiling {} outside ({CEILING_MARGIN}, 1]",
                self.out_of_range_ceiling
            )));
        }
        for (name, value) in [
            ("no-context confidence", self.no_context_confidence),
            ("context confidence floor", self.context_confidence_floor),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::config(format!("{name} {value} outside [0, 1]")));
            }
        }
        Ok(())
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 60,
            out_of_range_ceiling: 0.3,
            no_context_confidence: 0.35,
            context_confidence_floor: 0.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_confidence_follows_context() {
        let config = GeneratorConfig::default();
        assert_eq!(config.derived_confidence(false, 0.9), 0.35);
        assert!((config.derived_confidence(true, 1.0) - 0.8).abs() < 1e-9);
        assert!((config.derived_confidence(true, 0.0) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn cap_is_below_ceiling() {
        let config = GeneratorConfig::default();
        assert!(config.out_of_range_cap() < config.out_of_range_ceiling);
    }

    #[test]
    fn invalid_ceiling_is_rejected() {
        let config = GeneratorConfig {
            out_of_range_ceiling: 1.5,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));
        assert!(GeneratorConfig::default().validate().is_ok());
    }
}
